use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    Extension, Json,
};
use tracing::{info, warn};
use crate::api::auth::{authenticate, Caller};
use crate::api::models::MessageResponse;
use crate::api::AppState;
use crate::errors::GatewayError;
use crate::models::{ApiToken, TokenCreate};

/// Open while the token store is empty so the first token can be minted;
/// afterwards only admins may create tokens.
pub async fn create_token(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<TokenCreate>,
) -> Result<(StatusCode, Json<ApiToken>), GatewayError> {
    if let Some(token) = state.db.create_bootstrap_token(req.is_admin)? {
        if !token.is_admin {
            warn!("Bootstrap token is not an admin; further tokens must be created with the CLI");
        }
        info!(admin = token.is_admin, "Created bootstrap token");
        return Ok((StatusCode::CREATED, Json(token)));
    }

    let caller = authenticate(&state.db, &headers)?;
    if !caller.is_admin {
        return Err(GatewayError::Permission("Admin privileges required".into()));
    }
    state.log_usage(&caller.token, "/auth/tokens");

    let token = state.db.create_token(req.is_admin)?;
    info!(admin = token.is_admin, "Created API token");
    Ok((StatusCode::CREATED, Json(token)))
}

pub async fn list_tokens(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
) -> Result<Json<Vec<ApiToken>>, GatewayError> {
    state.log_usage(&caller.token, "/auth/tokens");
    Ok(Json(state.db.list_tokens()?))
}

pub async fn delete_token(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(token): Path<String>,
) -> Result<Json<MessageResponse>, GatewayError> {
    state.log_usage(&caller.token, format!("/auth/tokens/{}", token));
    if state.db.delete_token(&token)? {
        info!("Deleted API token");
        Ok(Json(MessageResponse::new("Token deleted successfully")))
    } else {
        Err(GatewayError::NotFound("Token not found".into()))
    }
}
