use std::path::Path;
use crate::errors::GatewayError;
use crate::moderation::ThresholdTable;
use super::types::{GatewayConfig, ProviderKind};
use super::schema::CONFIG_SCHEMA;
use tracing::warn;

/// Load the config file if one was given, otherwise fall back to defaults.
pub async fn load_config(path: Option<&Path>) -> Result<GatewayConfig, GatewayError> {
    match path {
        Some(p) => parse_config(p).await,
        None => Ok(GatewayConfig::default()),
    }
}

pub async fn parse_config(path: &Path) -> Result<GatewayConfig, GatewayError> {
    if !path.exists() {
        return Err(GatewayError::Config(format!("Config file not found: {}", path.display())));
    }

    let metadata = tokio::fs::metadata(path).await?;
    if metadata.len() > 1_048_576 {
        return Err(GatewayError::Config("Config file exceeds 1MB limit".into()));
    }

    let content = tokio::fs::read_to_string(path).await?;
    parse_config_str(&content)
}

pub fn parse_config_str(content: &str) -> Result<GatewayConfig, GatewayError> {
    let yaml: serde_yaml::Value = serde_yaml::from_str(content)?;
    if yaml.is_null() {
        return Ok(GatewayConfig::default());
    }

    // JSON Schema validation
    validate_schema(&yaml)?;

    // Parse into typed config
    let config: GatewayConfig = serde_yaml::from_value(yaml)?;

    validate_semantics(&config)?;

    Ok(config)
}

/// Validate config against the JSON schema for structural correctness.
fn validate_schema(yaml: &serde_yaml::Value) -> Result<(), GatewayError> {
    let json_value = serde_json::to_value(yaml)
        .map_err(|e| GatewayError::Config(format!("Config conversion error: {}", e)))?;

    let compiled = jsonschema::JSONSchema::compile(&CONFIG_SCHEMA)
        .map_err(|e| GatewayError::Config(format!("Schema compilation error: {}", e)))?;

    let result = compiled.validate(&json_value);
    if let Err(errors) = result {
        // Advisory only; typed parsing and semantic checks below are authoritative.
        for e in errors {
            warn!(validation_error = %format!("{} at {}", e, e.instance_path), "Config schema warning");
        }
    }

    Ok(())
}

fn validate_semantics(config: &GatewayConfig) -> Result<(), GatewayError> {
    if let Some(overrides) = &config.thresholds {
        ThresholdTable::with_overrides(overrides)?;
    }

    if let Some(classifier) = &config.classifier {
        if classifier.timeout_secs == Some(0) {
            return Err(GatewayError::Config("classifier.timeout_secs must be at least 1".into()));
        }
        if classifier.provider == ProviderKind::GoogleVision && classifier.models.is_some() {
            warn!("classifier.models is ignored by the google_vision provider");
        }
    }

    Ok(())
}
