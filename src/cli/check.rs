use std::path::Path;
use std::sync::Arc;
use crate::cli::commands::CheckArgs;
use crate::config::load_config;
use crate::errors::GatewayError;
use crate::moderation::{create_classifier, ImageUpload, ModerationEngine, ThresholdTable};
use tracing::info;

pub async fn handle_check(args: CheckArgs) -> Result<(), GatewayError> {
    let config = load_config(args.config.as_deref().map(Path::new)).await?;
    let thresholds = ThresholdTable::with_overrides(&config.thresholds.clone().unwrap_or_default())?;
    let engine = ModerationEngine::new(create_classifier(&config.classifier())?, Arc::new(thresholds));

    let path = Path::new(&args.file);
    let bytes = tokio::fs::read(path).await?;
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| args.file.clone());

    info!(file = %args.file, bytes = bytes.len(), provider = engine.provider_name(), "Moderating local file");
    let verdict = engine.moderate(&ImageUpload::new(bytes, filename)).await?;
    println!("{}", serde_json::to_string_pretty(&verdict)?);
    Ok(())
}
