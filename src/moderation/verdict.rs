use serde::Serialize;
use serde_json::Value;
use super::category::Category;

pub const MSG_SAFE: &str = "Image is safe";
pub const MSG_UNSAFE: &str = "Image contains inappropriate content";
pub const MSG_INVALID_IMAGE: &str = "File is not a valid image";
pub const MSG_ANALYSIS_ERROR: &str = "Error analyzing image";
pub const ERR_INVALID_FILE_TYPE: &str = "Invalid file type";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModerationVerdict {
    pub is_safe: bool,
    pub message: String,
    pub details: VerdictDetails,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct VerdictDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub violations: Option<Vec<Category>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_analysis: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detected_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detected_objects: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detected_labels: Option<Vec<String>>,
}

impl ModerationVerdict {
    pub fn invalid_image() -> Self {
        Self {
            is_safe: false,
            message: MSG_INVALID_IMAGE.to_string(),
            details: VerdictDetails {
                error: Some(ERR_INVALID_FILE_TYPE.to_string()),
                ..Default::default()
            },
        }
    }

    pub fn provider_error(message: impl Into<String>) -> Self {
        Self {
            is_safe: false,
            message: MSG_ANALYSIS_ERROR.to_string(),
            details: VerdictDetails {
                error: Some(message.into()),
                ..Default::default()
            },
        }
    }

    pub fn violations(&self) -> &[Category] {
        self.details.violations.as_deref().unwrap_or(&[])
    }
}
