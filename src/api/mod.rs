pub mod routes;
pub mod models;
pub mod errors;
pub mod auth;
pub mod usage_log;

use std::sync::Arc;
use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    middleware,
    routing::{delete, get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, warn};
use crate::config::GatewayConfig;
use crate::db::Database;
use crate::errors::GatewayError;
use crate::moderation::{create_classifier, ModerationEngine, ThresholdTable};
use usage_log::UsageLog;

/// Largest accepted multipart body on the moderation route.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub engine: ModerationEngine,
    pub usage: UsageLog,
    pub cors_origins: Arc<Vec<String>>,
}

impl AppState {
    /// Starts the usage writer, so this needs a tokio runtime.
    pub fn new(db: Database, engine: ModerationEngine) -> Self {
        let usage = UsageLog::spawn(db.clone());
        Self { db, engine, usage, cors_origins: Arc::new(Vec::new()) }
    }

    /// Record a call without holding up the response.
    pub fn log_usage(&self, token: &str, endpoint: impl Into<String>) {
        self.usage.record(token, endpoint);
    }
}

pub async fn create_app_state(config: &GatewayConfig, db_path: &str) -> Result<AppState, GatewayError> {
    let db = Database::new(db_path)?;
    let thresholds = ThresholdTable::with_overrides(&config.thresholds.clone().unwrap_or_default())?;
    for (category, threshold) in thresholds.iter() {
        debug!(category = %category, threshold, "Category threshold");
    }
    let classifier = create_classifier(&config.classifier())?;
    let engine = ModerationEngine::new(classifier, Arc::new(thresholds));
    Ok(AppState {
        cors_origins: Arc::new(config.cors_origins()),
        ..AppState::new(db, engine)
    })
}

pub fn build_router(state: AppState) -> Router {
    let auth = middleware::from_fn_with_state(state.clone(), auth::require_token);
    let admin = middleware::from_fn(auth::require_admin);
    let cors = cors_layer(&state.cors_origins);

    Router::new()
        .route("/", get(routes::health::root))
        .route("/api/health", get(routes::health::health_check))
        .route(
            "/api/auth/tokens",
            post(routes::tokens::create_token)
                .merge(get(routes::tokens::list_tokens).route_layer(admin.clone()).route_layer(auth.clone())),
        )
        .route(
            "/api/auth/tokens/{token}",
            delete(routes::tokens::delete_token).route_layer(admin.clone()).route_layer(auth.clone()),
        )
        .route(
            "/api/moderate",
            post(routes::moderate::moderate_image)
                .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
                .route_layer(auth.clone()),
        )
        .route(
            "/api/auth/usage/token/{token_id}",
            get(routes::usage::usage_by_token).route_layer(admin.clone()).route_layer(auth.clone()),
        )
        .route(
            "/api/auth/usage/endpoint/{*endpoint}",
            get(routes::usage::usage_by_endpoint).route_layer(admin).route_layer(auth.clone()),
        )
        .route(
            "/api/auth/usage/my-usage",
            get(routes::usage::my_usage).route_layer(auth),
        )
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        return layer.allow_origin(Any);
    }

    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(v) => Some(v),
            Err(_) => {
                warn!(origin = %o, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    layer.allow_origin(parsed)
}
