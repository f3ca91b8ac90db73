use axum::{extract::State, Json};
use crate::api::models::{HealthResponse, MessageResponse};
use crate::api::AppState;

pub async fn root() -> Json<MessageResponse> {
    Json(MessageResponse::new("Welcome to Image Moderation API"))
}

pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "modgate",
        version: env!("CARGO_PKG_VERSION"),
        git_hash: option_env!("GIT_HASH"),
        provider: state.engine.provider_name().to_string(),
    })
}
