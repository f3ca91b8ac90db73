use std::path::Path;
use crate::cli::commands::ServeArgs;
use crate::config::load_config;
use crate::errors::GatewayError;
use crate::api;
use tracing::info;

pub async fn handle_serve(args: ServeArgs) -> Result<(), GatewayError> {
    let config = load_config(args.config.as_deref().map(Path::new)).await?;
    let host = args.host.unwrap_or_else(|| config.host());
    let port = args.port.unwrap_or_else(|| config.port());
    let db_path = args.db.unwrap_or_else(|| config.db_path());

    info!(host = %host, port, db = %db_path, "Starting API server");

    let state = api::create_app_state(&config, &db_path).await?;
    info!(provider = state.engine.provider_name(), "Classifier ready");
    let usage = state.usage.clone();
    let app = api::build_router(state);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| GatewayError::Internal(format!("Server error: {}", e)))?;

    usage.flush().await;
    info!("Server stopped, usage records flushed");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received");
    }
}
