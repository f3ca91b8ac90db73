use std::time::Duration;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, warn};
use crate::errors::GatewayError;
use super::classifier::{Classifier, ClassifierOutcome};
use super::report::{ClassificationReport, ImageUpload};
use super::rules::{CategoryRule, SIGHTENGINE_RULES};

pub const DEFAULT_API_URL: &str = "https://api.sightengine.com/1.0/check.json";
pub const DEFAULT_MODELS: &[&str] = &[
    "nudity-2.1",
    "weapon",
    "alcohol",
    "recreational_drug",
    "medical",
    "offensive-2.0",
    "gore-2.0",
    "tobacco",
    "violence",
    "self-harm",
];
const FALLBACK_ERROR: &str = "Unknown error";

pub struct SightengineClassifier {
    client: Client,
    api_url: String,
    api_user: String,
    api_secret: String,
    models: String,
}

impl SightengineClassifier {
    pub fn new(
        api_user: &str,
        api_secret: &str,
        models: &[String],
        api_url: Option<&str>,
        timeout: Duration,
    ) -> Result<Self, GatewayError> {
        let client = Client::builder().timeout(timeout).build()?;
        let models = if models.is_empty() {
            DEFAULT_MODELS.join(",")
        } else {
            models.join(",")
        };
        Ok(Self {
            client,
            api_url: api_url.unwrap_or(DEFAULT_API_URL).to_string(),
            api_user: api_user.to_string(),
            api_secret: api_secret.to_string(),
            models,
        })
    }
}

#[async_trait]
impl Classifier for SightengineClassifier {
    async fn classify(&self, upload: &ImageUpload) -> Result<ClassifierOutcome, GatewayError> {
        let media = Part::stream_with_length(upload.bytes.clone(), upload.bytes.len() as u64)
            .file_name(upload.filename.clone());
        let form = Form::new()
            .text("models", self.models.clone())
            .text("api_user", self.api_user.clone())
            .text("api_secret", self.api_secret.clone())
            .part("media", media);

        let resp = self.client
            .post(&self.api_url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| GatewayError::Network(format!("Sightengine request failed: {}", e)))?;

        // Rejections arrive as 4xx with a JSON body, so parse regardless of status.
        let http_status = resp.status();
        let body = resp.text().await?;
        let data: Value = serde_json::from_str(&body).map_err(|e| {
            GatewayError::Classifier(format!(
                "Failed to parse Sightengine response (HTTP {}): {}",
                http_status.as_u16(),
                e
            ))
        })?;
        let report = ClassificationReport::from_value(data)?;

        if report.raw()["status"] != "success" {
            let message = report.raw()["error"]["message"]
                .as_str()
                .unwrap_or(FALLBACK_ERROR)
                .to_string();
            warn!(http_status = http_status.as_u16(), error = %message, "Sightengine rejected image");
            return Ok(ClassifierOutcome::Rejected { message });
        }

        debug!(request_id = ?report.raw()["request"]["id"].as_str(), "Sightengine classification complete");
        Ok(ClassifierOutcome::Report(report))
    }

    fn rules(&self) -> &'static [CategoryRule] {
        SIGHTENGINE_RULES
    }

    fn provider_name(&self) -> &str { "sightengine" }
}
