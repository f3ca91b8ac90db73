use axum::{
    extract::{Path, State},
    Extension, Json,
};
use crate::api::auth::Caller;
use crate::api::AppState;
use crate::errors::GatewayError;
use crate::models::UsageRecord;

pub async fn usage_by_token(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(token_id): Path<String>,
) -> Result<Json<Vec<UsageRecord>>, GatewayError> {
    state.log_usage(&caller.token, format!("/auth/usage/token/{}", token_id));
    Ok(Json(state.db.list_usages_by_token(&token_id)?))
}

pub async fn usage_by_endpoint(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(endpoint): Path<String>,
) -> Result<Json<Vec<UsageRecord>>, GatewayError> {
    let endpoint = normalize_endpoint(&endpoint);
    state.log_usage(&caller.token, format!("/auth/usage/endpoint{}", endpoint));
    Ok(Json(state.db.list_usages_by_endpoint(&endpoint)?))
}

pub async fn my_usage(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
) -> Result<Json<Vec<UsageRecord>>, GatewayError> {
    state.log_usage(&caller.token, "/auth/usage/my-usage");
    Ok(Json(state.db.list_usages_by_token(&caller.token)?))
}

/// Endpoints are stored with a single leading slash ("/moderate").
fn normalize_endpoint(raw: &str) -> String {
    format!("/{}", raw.trim_start_matches('/'))
}
