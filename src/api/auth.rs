use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
    Extension,
};
use tracing::debug;
use crate::api::AppState;
use crate::db::Database;
use crate::errors::GatewayError;

/// Identity resolved from a bearer token, attached to request extensions.
#[derive(Debug, Clone)]
pub struct Caller {
    pub token: String,
    pub is_admin: bool,
}

pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let header = headers.get("Authorization")?.to_str().ok()?;
    let token = header.strip_prefix("Bearer ")?.trim();
    if token.is_empty() { None } else { Some(token) }
}

/// Resolve the caller behind a request's bearer token.
pub fn authenticate(db: &Database, headers: &HeaderMap) -> Result<Caller, GatewayError> {
    let token = bearer_token(headers)
        .ok_or_else(|| GatewayError::Authentication("Not authenticated".into()))?;

    let record = db.get_token(token)?
        .ok_or_else(|| GatewayError::Authentication("Invalid or expired token".into()))?;

    Ok(Caller { token: record.token, is_admin: record.is_admin })
}

pub async fn require_token(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, GatewayError> {
    let caller = authenticate(&state.db, request.headers())?;
    debug!(admin = caller.is_admin, path = %request.uri().path(), "Authenticated request");
    request.extensions_mut().insert(caller);
    Ok(next.run(request).await)
}

/// Must be layered inside `require_token`.
pub async fn require_admin(
    Extension(caller): Extension<Caller>,
    request: Request,
    next: Next,
) -> Result<Response, GatewayError> {
    if !caller.is_admin {
        return Err(GatewayError::Permission("Admin privileges required".into()));
    }
    Ok(next.run(request).await)
}
