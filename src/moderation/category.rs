use serde::{Deserialize, Serialize};

/// A content-risk dimension reported in a verdict's violation list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "nudity")]
    Nudity,
    #[serde(rename = "weapon")]
    Weapon,
    #[serde(rename = "alcohol")]
    Alcohol,
    #[serde(rename = "drugs")]
    Drugs,
    #[serde(rename = "offensive")]
    Offensive,
    #[serde(rename = "gore")]
    Gore,
    #[serde(rename = "tobacco")]
    Tobacco,
    #[serde(rename = "violence")]
    Violence,
    #[serde(rename = "self-harm")]
    SelfHarm,
    #[serde(rename = "adult")]
    Adult,
    #[serde(rename = "medical")]
    Medical,
    #[serde(rename = "spoof")]
    Spoof,
    #[serde(rename = "racy")]
    Racy,
    #[serde(rename = "hate_speech")]
    HateSpeech,
}

impl Category {
    pub fn all() -> &'static [Category] {
        &[
            Category::Nudity,
            Category::Weapon,
            Category::Alcohol,
            Category::Drugs,
            Category::Offensive,
            Category::Gore,
            Category::Tobacco,
            Category::Violence,
            Category::SelfHarm,
            Category::Adult,
            Category::Medical,
            Category::Spoof,
            Category::Racy,
            Category::HateSpeech,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Nudity => "nudity",
            Self::Weapon => "weapon",
            Self::Alcohol => "alcohol",
            Self::Drugs => "drugs",
            Self::Offensive => "offensive",
            Self::Gore => "gore",
            Self::Tobacco => "tobacco",
            Self::Violence => "violence",
            Self::SelfHarm => "self-harm",
            Self::Adult => "adult",
            Self::Medical => "medical",
            Self::Spoof => "spoof",
            Self::Racy => "racy",
            Self::HateSpeech => "hate_speech",
        }
    }

    pub fn from_name(name: &str) -> Option<Category> {
        Self::all().iter().copied().find(|c| c.as_str() == name)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
