//! Backend API configuration.

use super::defaults::{default_base_url, default_request_timeout_secs, default_user_agent};
use serde::{Deserialize, Serialize};

/// Settings for the REST client.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Scheme and host (optionally a path prefix) of the backend
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout (seconds)
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// User-Agent header sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

impl ApiConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        let parsed = url::Url::parse(&self.base_url)
            .map_err(|e| anyhow::anyhow!("api.base_url '{}' is not a valid URL: {e}", self.base_url))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            anyhow::bail!(
                "api.base_url must use http or https (configured scheme: {})",
                parsed.scheme()
            );
        }
        if !(1..=300).contains(&self.request_timeout_secs) {
            anyhow::bail!(
                "api.request_timeout_secs must be between 1 and 300 seconds (configured: {})",
                self.request_timeout_secs
            );
        }
        Ok(())
    }
}
