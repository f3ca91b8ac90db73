//! Alternate backend built on a vision-annotation API (safe-search
//! likelihoods, OCR, object and label detection).
//!
//! Likelihood enums are mapped onto the probability scale so the shared
//! resolver can apply ordinary thresholds, and OCR text is scanned for hate
//! keywords to produce a `hate_speech` signal.

use std::time::Duration;
use async_trait::async_trait;
use data_encoding::BASE64;
use reqwest::Client;
use serde_json::{json, Map, Value};
use tracing::{debug, warn};
use crate::config::credentials::redact_credentials;
use crate::errors::GatewayError;
use super::classifier::{Classifier, ClassifierOutcome};
use super::report::{ClassificationReport, Enrichment, ImageUpload};
use super::rules::{CategoryRule, VISION_RULES};

pub const DEFAULT_API_URL: &str = "https://vision.googleapis.com/v1/images:annotate";
const SAFE_SEARCH_FIELDS: &[&str] = &["adult", "violence", "medical", "spoof", "racy"];
const HATE_KEYWORDS: &[&str] = &["hate", "extremist", "terrorist", "nazi", "racist"];
const FALLBACK_ERROR: &str = "Unknown error";

pub struct VisionClassifier {
    client: Client,
    api_url: String,
    api_key: String,
}

impl VisionClassifier {
    pub fn new(api_key: &str, api_url: Option<&str>, timeout: Duration) -> Result<Self, GatewayError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_url: api_url.unwrap_or(DEFAULT_API_URL).to_string(),
            api_key: api_key.to_string(),
        })
    }
}

#[async_trait]
impl Classifier for VisionClassifier {
    async fn classify(&self, upload: &ImageUpload) -> Result<ClassifierOutcome, GatewayError> {
        let body = json!({
            "requests": [{
                "image": { "content": BASE64.encode(&upload.bytes) },
                "features": [
                    { "type": "SAFE_SEARCH_DETECTION" },
                    { "type": "TEXT_DETECTION" },
                    { "type": "OBJECT_LOCALIZATION" },
                    { "type": "LABEL_DETECTION" },
                ],
            }],
        });

        let resp = self.client
            .post(&self.api_url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                let message = redact_credentials(&e.to_string(), &[&self.api_key]);
                GatewayError::Network(format!("Vision request failed: {}", message))
            })?;

        let data: Value = resp.json().await
            .map_err(|e| GatewayError::Classifier(format!("Failed to parse Vision response: {}", e)))?;

        if let Some(message) = error_message(&data) {
            warn!(error = %message, "Vision API rejected request");
            return Ok(ClassifierOutcome::Rejected { message });
        }
        let annotation = &data["responses"][0];
        if let Some(message) = error_message(annotation) {
            warn!(error = %message, "Vision API rejected image");
            return Ok(ClassifierOutcome::Rejected { message });
        }
        // Without safe-search data nothing was checked; never read that as safe.
        if !annotation["safeSearchAnnotation"].is_object() {
            return Err(GatewayError::Classifier(
                "Vision response missing responses[0].safeSearchAnnotation".into(),
            ));
        }

        let report = normalize(annotation)?;
        debug!("Vision classification complete");
        Ok(ClassifierOutcome::Report(report))
    }

    fn rules(&self) -> &'static [CategoryRule] {
        VISION_RULES
    }

    fn provider_name(&self) -> &str { "google_vision" }
}

fn error_message(value: &Value) -> Option<String> {
    let error = value.get("error")?;
    Some(error["message"].as_str().unwrap_or(FALLBACK_ERROR).to_string())
}

/// Probability equivalent of a safe-search likelihood name.
pub fn likelihood_probability(name: &str) -> f64 {
    match name {
        "VERY_UNLIKELY" => 0.2,
        "UNLIKELY" => 0.4,
        "POSSIBLE" => 0.6,
        "LIKELY" => 0.8,
        "VERY_LIKELY" => 1.0,
        _ => 0.0,
    }
}

pub fn hate_keywords_in(text: &str) -> Vec<&'static str> {
    let lowered = text.to_lowercase();
    HATE_KEYWORDS.iter().copied().filter(|word| lowered.contains(word)).collect()
}

/// Build the report the `VISION_RULES` table reads from one annotate response.
pub fn normalize(annotation: &Value) -> Result<ClassificationReport, GatewayError> {
    let mut raw = Map::new();

    let safe_search = &annotation["safeSearchAnnotation"];
    for field in SAFE_SEARCH_FIELDS {
        let likelihood = safe_search[*field].as_str().unwrap_or("UNKNOWN");
        raw.insert(field.to_string(), json!({
            "likelihood": likelihood,
            "prob": likelihood_probability(likelihood),
        }));
    }

    let detected_text = annotation["textAnnotations"][0]["description"]
        .as_str()
        .filter(|t| !t.is_empty())
        .map(str::to_string);
    let matched = detected_text.as_deref().map(hate_keywords_in).unwrap_or_default();
    raw.insert("text".to_string(), json!({
        "hate_keyword_match": if matched.is_empty() { 0.0 } else { 1.0 },
        "matched_keywords": matched,
    }));

    let names = |key: &str, field: &str| -> Vec<String> {
        annotation[key]
            .as_array()
            .map(|items| items.iter().filter_map(|i| i[field].as_str().map(str::to_string)).collect())
            .unwrap_or_default()
    };
    let enrichment = Enrichment {
        detected_text,
        detected_objects: names("localizedObjectAnnotations", "name"),
        detected_labels: names("labelAnnotations", "description"),
    };

    Ok(ClassificationReport::from_value(Value::Object(raw))?.with_enrichment(enrichment))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_likelihood_scale_is_monotonic() {
        let order = ["UNKNOWN", "VERY_UNLIKELY", "UNLIKELY", "POSSIBLE", "LIKELY", "VERY_LIKELY"];
        for pair in order.windows(2) {
            assert!(likelihood_probability(pair[0]) < likelihood_probability(pair[1]));
        }
        assert_eq!(likelihood_probability("garbage"), 0.0);
    }

    #[test]
    fn test_only_possible_and_above_exceed_default_threshold() {
        assert!(likelihood_probability("UNLIKELY") <= 0.5);
        assert!(likelihood_probability("POSSIBLE") > 0.5);
    }

    #[test]
    fn test_hate_keywords_case_insensitive() {
        assert_eq!(hate_keywords_in("Nazi rally, TERRORIST flag"), vec!["terrorist", "nazi"]);
        assert!(hate_keywords_in("a sunny beach").is_empty());
    }

    #[test]
    fn test_normalize_full_annotation() {
        let annotation = json!({
            "safeSearchAnnotation": {
                "adult": "VERY_UNLIKELY",
                "spoof": "UNLIKELY",
                "medical": "UNLIKELY",
                "violence": "LIKELY",
                "racy": "POSSIBLE"
            },
            "textAnnotations": [{"description": "Stop the hate"}],
            "localizedObjectAnnotations": [{"name": "Person"}, {"name": "Sign"}],
            "labelAnnotations": [{"description": "Crowd"}]
        });
        let report = normalize(&annotation).unwrap();
        assert_eq!(report.score(&["violence", "prob"]), 0.8);
        assert_eq!(report.raw()["violence"]["likelihood"], "LIKELY");
        assert_eq!(report.score(&["text", "hate_keyword_match"]), 1.0);

        let extra = report.enrichment().unwrap();
        assert_eq!(extra.detected_text.as_deref(), Some("Stop the hate"));
        assert_eq!(extra.detected_objects, vec!["Person", "Sign"]);
        assert_eq!(extra.detected_labels, vec!["Crowd"]);
    }

    #[test]
    fn test_normalize_empty_annotation() {
        let report = normalize(&json!({})).unwrap();
        assert_eq!(report.score(&["adult", "prob"]), 0.0);
        assert_eq!(report.score(&["text", "hate_keyword_match"]), 0.0);
        let extra = report.enrichment().unwrap();
        assert!(extra.detected_text.is_none());
        assert!(extra.detected_objects.is_empty());
    }

    #[test]
    fn test_error_message_extraction() {
        assert_eq!(error_message(&json!({"error": {"message": "API key not valid"}})).as_deref(), Some("API key not valid"));
        assert_eq!(error_message(&json!({"error": {}})).as_deref(), Some(FALLBACK_ERROR));
        assert!(error_message(&json!({"responses": []})).is_none());
    }
}
