//! Webhook polling configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use crate::application::WebhookConfig;
use crate::domain::foundation::ConfigurationError;

/// Webhook polling parameters
#[derive(Debug, Clone, Deserialize)]
pub struct PollingConfig {
    /// Sleep between poll cycles in seconds
    #[serde(default = "default_repetition_time")]
    pub repetition_time_secs: u64,

    /// Total run time in seconds
    #[serde(default = "default_duration_time")]
    pub duration_time_secs: u64,

    /// Skip events already settled by this process
    #[serde(default)]
    pub deduplicate_events: bool,
}

impl PollingConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.repetition_time_secs)
    }

    pub fn budget(&self) -> Duration {
        Duration::from_secs(self.duration_time_secs)
    }

    /// Combine with the engine's endpoint into a validated webhook config.
    pub fn webhook_config(&self, webhook_url: &str) -> Result<WebhookConfig, ConfigurationError> {
        WebhookConfig::new(webhook_url, self.interval(), self.budget())
    }

    /// Validate polling configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.repetition_time_secs == 0 {
            return Err(ConfigurationError::ZeroDuration("polling.repetition_time_secs").into());
        }
        if self.duration_time_secs == 0 {
            return Err(ConfigurationError::ZeroDuration("polling.duration_time_secs").into());
        }
        Ok(())
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            repetition_time_secs: default_repetition_time(),
            duration_time_secs: default_duration_time(),
            deduplicate_events: false,
        }
    }
}

fn default_repetition_time() -> u64 {
    5
}

fn default_duration_time() -> u64 {
    24 * 60 * 60
}
