use std::collections::HashMap;
use serde::{Deserialize, Serialize};

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_DB_PATH: &str = "./data/modgate.db";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct GatewayConfig {
    pub server: Option<ServerConfig>,
    pub database: Option<DatabaseConfig>,
    pub classifier: Option<ClassifierConfig>,
    /// Per-category overrides, keyed by wire category name
    pub thresholds: Option<HashMap<String, f64>>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct ServerConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub cors_origins: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct DatabaseConfig {
    pub path: Option<String>,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    #[default]
    Sightengine,
    GoogleVision,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sightengine => "sightengine",
            Self::GoogleVision => "google_vision",
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClassifierConfig {
    #[serde(default)]
    pub provider: ProviderKind,
    pub api_url: Option<String>,
    pub api_user: Option<String>,
    pub api_secret: Option<String>,
    pub api_key: Option<String>,
    pub models: Option<Vec<String>>,
    pub timeout_secs: Option<u64>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::Sightengine,
            api_url: None,
            api_user: Some("$SIGHTENGINE_API_USER".to_string()),
            api_secret: Some("$SIGHTENGINE_API_SECRET".to_string()),
            api_key: Some("$GOOGLE_VISION_API_KEY".to_string()),
            models: None,
            timeout_secs: Some(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl GatewayConfig {
    pub fn host(&self) -> String {
        self.server.as_ref().and_then(|s| s.host.clone()).unwrap_or_else(|| DEFAULT_HOST.to_string())
    }

    pub fn port(&self) -> u16 {
        self.server.as_ref().and_then(|s| s.port).unwrap_or(DEFAULT_PORT)
    }

    pub fn db_path(&self) -> String {
        self.database.as_ref().and_then(|d| d.path.clone()).unwrap_or_else(|| DEFAULT_DB_PATH.to_string())
    }

    pub fn classifier(&self) -> ClassifierConfig {
        self.classifier.clone().unwrap_or_default()
    }

    pub fn cors_origins(&self) -> Vec<String> {
        self.server.as_ref().and_then(|s| s.cors_origins.clone()).unwrap_or_default()
    }
}
