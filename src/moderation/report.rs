use bytes::Bytes;
use serde_json::Value;
use crate::errors::GatewayError;

/// An uploaded payload as received from the caller. The filename is only
/// forwarded to the classifier and never used for type detection.
/// Cloning shares the buffer.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub bytes: Bytes,
    pub filename: String,
}

impl ImageUpload {
    pub fn new(bytes: impl Into<Bytes>, filename: impl Into<String>) -> Self {
        Self { bytes: bytes.into(), filename: filename.into() }
    }
}

/// Extra findings some backends return alongside their scores.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Enrichment {
    pub detected_text: Option<String>,
    pub detected_objects: Vec<String>,
    pub detected_labels: Vec<String>,
}

/// Raw per-category scores from a classifier, kept verbatim for audit.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationReport {
    raw: Value,
    enrichment: Option<Enrichment>,
}

impl ClassificationReport {
    pub fn from_value(raw: Value) -> Result<Self, GatewayError> {
        if !raw.is_object() {
            return Err(GatewayError::Classifier(format!(
                "expected a JSON object from classifier, got {}",
                type_name(&raw)
            )));
        }
        Ok(Self { raw, enrichment: None })
    }

    pub fn with_enrichment(mut self, enrichment: Enrichment) -> Self {
        self.enrichment = Some(enrichment);
        self
    }

    pub fn raw(&self) -> &Value {
        &self.raw
    }

    pub fn enrichment(&self) -> Option<&Enrichment> {
        self.enrichment.as_ref()
    }

    /// Probability at `path`. Missing keys and non-numeric values read as 0.
    pub fn score(&self, path: &[&str]) -> f64 {
        let mut node = &self.raw;
        for key in path {
            match node.get(key) {
                Some(next) => node = next,
                None => return 0.0,
            }
        }
        node.as_f64().unwrap_or(0.0)
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
