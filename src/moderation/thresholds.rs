use std::collections::{BTreeMap, HashMap};
use crate::errors::GatewayError;
use super::category::Category;

pub const DEFAULT_THRESHOLD: f64 = 0.5;

/// Per-category cutoff probabilities. Built once at startup and shared
/// read-only afterwards; every known category has exactly one entry.
#[derive(Debug, Clone, PartialEq)]
pub struct ThresholdTable {
    entries: BTreeMap<Category, f64>,
}

impl Default for ThresholdTable {
    fn default() -> Self {
        Self {
            entries: Category::all().iter().map(|c| (*c, DEFAULT_THRESHOLD)).collect(),
        }
    }
}

impl ThresholdTable {
    /// Apply overrides keyed by wire category name on top of the defaults.
    pub fn with_overrides(overrides: &HashMap<String, f64>) -> Result<Self, GatewayError> {
        let mut table = Self::default();
        for (name, value) in overrides {
            let category = Category::from_name(name).ok_or_else(|| {
                GatewayError::Config(format!("Unknown threshold category '{}'", name))
            })?;
            if !(*value > 0.0 && *value < 1.0) {
                return Err(GatewayError::Config(format!(
                    "Threshold for '{}' must be strictly between 0 and 1, got {}",
                    name, value
                )));
            }
            table.entries.insert(category, *value);
        }
        Ok(table)
    }

    pub fn get(&self, category: Category) -> f64 {
        self.entries.get(&category).copied().unwrap_or(DEFAULT_THRESHOLD)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, f64)> + '_ {
        self.entries.iter().map(|(c, t)| (*c, *t))
    }
}
