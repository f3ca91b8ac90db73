use async_trait::async_trait;
use crate::errors::GatewayError;
use super::report::{ClassificationReport, ImageUpload};
use super::rules::CategoryRule;

/// What came back from a classification call that reached the provider.
#[derive(Debug, Clone, PartialEq)]
pub enum ClassifierOutcome {
    Report(ClassificationReport),
    /// The provider answered but declined to classify (bad credentials,
    /// unsupported media, quota...). Not a service fault.
    Rejected { message: String },
}

#[async_trait]
pub trait Classifier: Send + Sync {
    /// Submit image bytes for classification. Transport failures and
    /// unreadable responses come back as `Err`.
    async fn classify(&self, upload: &ImageUpload) -> Result<ClassifierOutcome, GatewayError>;

    /// Rule table that maps this provider's report onto categories
    fn rules(&self) -> &'static [CategoryRule];

    /// Provider name for logging
    fn provider_name(&self) -> &str;
}
