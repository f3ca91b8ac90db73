use super::category::Category;

/// Where a category's probability lives in a classification report.
#[derive(Debug, Clone, Copy)]
pub enum Signal {
    /// One probability at a fixed path.
    Scalar(&'static [&'static str]),
    /// Several independent probabilities; any one above threshold triggers.
    AnyOf(&'static [&'static [&'static str]]),
}

#[derive(Debug, Clone, Copy)]
pub struct CategoryRule {
    pub category: Category,
    pub signal: Signal,
}

/// Rule table for the Sightengine `check.json` response. Order here is the
/// order violations are reported in.
pub static SIGHTENGINE_RULES: &[CategoryRule] = &[
    CategoryRule {
        category: Category::Nudity,
        signal: Signal::AnyOf(&[
            &["nudity", "sexual_activity"],
            &["nudity", "sexual_display"],
            &["nudity", "erotica"],
            &["nudity", "suggestive"],
        ]),
    },
    CategoryRule {
        category: Category::Weapon,
        signal: Signal::AnyOf(&[
            &["weapon", "classes", "firearm"],
            &["weapon", "classes", "knife"],
        ]),
    },
    CategoryRule { category: Category::Alcohol, signal: Signal::Scalar(&["alcohol", "prob"]) },
    CategoryRule { category: Category::Drugs, signal: Signal::Scalar(&["recreational_drug", "prob"]) },
    CategoryRule {
        category: Category::Offensive,
        signal: Signal::AnyOf(&[
            &["offensive", "nazi"],
            &["offensive", "supremacist"],
            &["offensive", "terrorist"],
        ]),
    },
    CategoryRule { category: Category::Gore, signal: Signal::Scalar(&["gore", "prob"]) },
    CategoryRule { category: Category::Tobacco, signal: Signal::Scalar(&["tobacco", "prob"]) },
    CategoryRule { category: Category::Violence, signal: Signal::Scalar(&["violence", "prob"]) },
    CategoryRule { category: Category::SelfHarm, signal: Signal::Scalar(&["self-harm", "prob"]) },
];

/// Rule table for the normalized report built from a Vision `images:annotate`
/// response (see `vision::normalize`).
pub static VISION_RULES: &[CategoryRule] = &[
    CategoryRule { category: Category::Adult, signal: Signal::Scalar(&["adult", "prob"]) },
    CategoryRule { category: Category::Violence, signal: Signal::Scalar(&["violence", "prob"]) },
    CategoryRule { category: Category::Medical, signal: Signal::Scalar(&["medical", "prob"]) },
    CategoryRule { category: Category::Spoof, signal: Signal::Scalar(&["spoof", "prob"]) },
    CategoryRule { category: Category::Racy, signal: Signal::Scalar(&["racy", "prob"]) },
    CategoryRule { category: Category::HateSpeech, signal: Signal::Scalar(&["text", "hate_keyword_match"]) },
];
