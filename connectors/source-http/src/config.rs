//! HTTP source connector configuration.

use conveyor_sdk::errors::ConnectorError;
use serde::Deserialize;

/// Connector config from the orchestrator-supplied JSON file.
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    /// API key authenticating every request.
    #[serde(rename = "apiKey")]
    pub api_key: String,
    /// Base URL of the upstream API.
    #[serde(rename = "baseUrl", default = "default_base_url")]
    pub base_url: String,
}

fn default_base_url() -> String {
    "https://api.example.com".to_string()
}

impl HttpConfig {
    pub fn validate(&self) -> Result<(), ConnectorError> {
        if self.api_key.is_empty() {
            return Err(ConnectorError::config(
                "MISSING_API_KEY",
                "apiKey must not be empty",
            ));
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ConnectorError::config(
                "INVALID_BASE_URL",
                format!("baseUrl '{}' is not an http(s) URL", self.base_url),
            ));
        }
        Ok(())
    }
}

/// Sync cursor persisted by the orchestrator between runs.
#[derive(Debug, Clone, Copy, serde::Serialize, Deserialize)]
pub struct LastSyncTime {
    /// Epoch milliseconds of the last successful sync.
    pub timestamp: i64,
}
