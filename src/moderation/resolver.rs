//! Reduces a classification report to a violation list and a verdict.
//!
//! Resolution is a pure function of the report, the rule table and the
//! threshold table: the same inputs always yield the same verdict.

use tracing::debug;
use super::report::ClassificationReport;
use super::rules::{CategoryRule, Signal};
use super::thresholds::ThresholdTable;
use super::verdict::{ModerationVerdict, VerdictDetails, MSG_SAFE, MSG_UNSAFE};
use super::category::Category;

/// Whether `rule` fires for `report`. Comparison is strictly greater-than.
pub fn evaluate(report: &ClassificationReport, rule: &CategoryRule, thresholds: &ThresholdTable) -> bool {
    let threshold = thresholds.get(rule.category);
    match rule.signal {
        Signal::Scalar(path) => report.score(path) > threshold,
        Signal::AnyOf(paths) => paths.iter().any(|path| report.score(path) > threshold),
    }
}

pub fn violations(report: &ClassificationReport, rules: &[CategoryRule], thresholds: &ThresholdTable) -> Vec<Category> {
    rules
        .iter()
        .filter(|rule| evaluate(report, rule, thresholds))
        .map(|rule| rule.category)
        .collect()
}

pub fn resolve(report: &ClassificationReport, rules: &[CategoryRule], thresholds: &ThresholdTable) -> ModerationVerdict {
    let violations = violations(report, rules, thresholds);
    let is_safe = violations.is_empty();
    debug!(is_safe, violations = ?violations, "Resolved classification report");

    let mut details = VerdictDetails {
        violations: Some(violations),
        content_analysis: Some(report.raw().clone()),
        ..Default::default()
    };
    if let Some(extra) = report.enrichment() {
        details.detected_text = extra.detected_text.clone();
        details.detected_objects = Some(extra.detected_objects.clone());
        details.detected_labels = Some(extra.detected_labels.clone());
    }

    ModerationVerdict {
        is_safe,
        message: if is_safe { MSG_SAFE } else { MSG_UNSAFE }.to_string(),
        details,
    }
}
