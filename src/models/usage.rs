use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One authenticated API call, kept for audit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageRecord {
    pub token: String,
    pub endpoint: String,
    pub timestamp: DateTime<Utc>,
}
