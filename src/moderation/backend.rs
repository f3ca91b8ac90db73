use std::sync::Arc;
use std::time::Duration;
use crate::config::credentials::resolve_credential;
use crate::config::{ClassifierConfig, ProviderKind, DEFAULT_TIMEOUT_SECS};
use crate::errors::GatewayError;
use super::classifier::Classifier;
use super::sightengine::SightengineClassifier;
use super::vision::VisionClassifier;

pub fn create_classifier(config: &ClassifierConfig) -> Result<Arc<dyn Classifier>, GatewayError> {
    let defaults = ClassifierConfig::default();
    let timeout = Duration::from_secs(config.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS));
    let api_url = config.api_url.as_deref();

    match config.provider {
        ProviderKind::Sightengine => {
            let api_user = credential("api_user", config.api_user.as_ref().or(defaults.api_user.as_ref()))?;
            let api_secret = credential("api_secret", config.api_secret.as_ref().or(defaults.api_secret.as_ref()))?;
            let models = config.models.clone().unwrap_or_default();
            Ok(Arc::new(SightengineClassifier::new(&api_user, &api_secret, &models, api_url, timeout)?))
        }
        ProviderKind::GoogleVision => {
            let api_key = credential("api_key", config.api_key.as_ref().or(defaults.api_key.as_ref()))?;
            Ok(Arc::new(VisionClassifier::new(&api_key, api_url, timeout)?))
        }
    }
}

fn credential(field: &str, value: Option<&String>) -> Result<String, GatewayError> {
    value
        .and_then(|v| resolve_credential(v))
        .ok_or_else(|| GatewayError::Config(format!(
            "classifier.{} is not set (set it in the config file or via its environment variable)",
            field
        )))
}
