//! Outbound HTTP configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use crate::adapters::StarkBankConfig;

/// Outbound HTTP settings shared by the provider client and the webhook source
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    /// Request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Override of the provider API base URL (testing only)
    pub api_base_url: Option<String>,
}

impl HttpConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Provider adapter settings derived from this section.
    pub fn provider_config(&self) -> StarkBankConfig {
        let config = StarkBankConfig::default().with_timeout(self.request_timeout());
        match &self.api_base_url {
            Some(url) => config.with_base_url(url.clone()),
            None => config,
        }
    }

    /// Validate HTTP configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.request_timeout_secs == 0 || self.request_timeout_secs > 300 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: default_request_timeout(),
            api_base_url: None,
        }
    }
}

fn default_request_timeout() -> u64 {
    30
}
