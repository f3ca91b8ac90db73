pub mod backend;
pub mod category;
pub mod classifier;
pub mod report;
pub mod resolver;
pub mod rules;
pub mod sightengine;
pub mod thresholds;
pub mod validator;
pub mod verdict;
pub mod vision;

use std::sync::Arc;
use tracing::{info, warn};
use crate::errors::GatewayError;

pub use backend::create_classifier;
pub use category::Category;
pub use classifier::{Classifier, ClassifierOutcome};
pub use report::{ClassificationReport, Enrichment, ImageUpload};
pub use thresholds::ThresholdTable;
pub use verdict::ModerationVerdict;

/// Validates an upload, classifies it and resolves the verdict.
#[derive(Clone)]
pub struct ModerationEngine {
    classifier: Arc<dyn Classifier>,
    thresholds: Arc<ThresholdTable>,
}

impl ModerationEngine {
    pub fn new(classifier: Arc<dyn Classifier>, thresholds: Arc<ThresholdTable>) -> Self {
        Self { classifier, thresholds }
    }

    pub fn provider_name(&self) -> &str {
        self.classifier.provider_name()
    }

    pub async fn moderate(&self, upload: &ImageUpload) -> Result<ModerationVerdict, GatewayError> {
        let inspection = validator::inspect(&upload.bytes);
        if !inspection.is_image {
            info!(mime = %inspection.mime_type, filename = %upload.filename, "Rejected non-image upload");
            return Ok(ModerationVerdict::invalid_image());
        }

        match self.classifier.classify(upload).await? {
            ClassifierOutcome::Rejected { message } => {
                warn!(provider = self.classifier.provider_name(), error = %message, "Classification rejected");
                Ok(ModerationVerdict::provider_error(message))
            }
            ClassifierOutcome::Report(report) => {
                let verdict = resolver::resolve(&report, self.classifier.rules(), &self.thresholds);
                info!(
                    provider = self.classifier.provider_name(),
                    mime = %inspection.mime_type,
                    is_safe = verdict.is_safe,
                    violations = verdict.violations().len(),
                    "Image moderated"
                );
                Ok(verdict)
            }
        }
    }
}
