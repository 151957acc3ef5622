//! Engine configuration (provider credentials and webhook endpoint)

use serde::Deserialize;
use std::path::PathBuf;

use super::error::ValidationError;

/// Engine configuration
///
/// Environment, account type and URL are kept as raw strings here; the
/// components that consume them parse and reject bad values.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// `sandbox` or `production` (case-insensitive)
    #[serde(default = "default_environment")]
    pub environment: String,

    /// Project or organization id
    #[serde(default)]
    pub id: String,

    /// PEM file holding the secp256k1 private key
    #[serde(default = "default_private_key_path")]
    pub private_key_path: PathBuf,

    /// `project` or `organization` (case-insensitive)
    #[serde(default = "default_auth_type")]
    pub auth_type: String,

    /// Endpoint polled for webhook events
    #[serde(default)]
    pub webhook_url: String,
}

impl EngineConfig {
    /// Validate engine configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id.trim().is_empty() {
            return Err(ValidationError::MissingRequired("engine.id"));
        }
        if self.webhook_url.trim().is_empty() {
            return Err(ValidationError::MissingRequired("engine.webhook_url"));
        }
        if self.private_key_path.as_os_str().is_empty() {
            return Err(ValidationError::MissingRequired("engine.private_key_path"));
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            environment: default_environment(),
            id: String::new(),
            private_key_path: default_private_key_path(),
            auth_type: default_auth_type(),
            webhook_url: String::new(),
        }
    }
}

fn default_environment() -> String {
    "sandbox".to_string()
}

fn default_private_key_path() -> PathBuf {
    PathBuf::from("input/credentials/private-key.pem")
}

fn default_auth_type() -> String {
    "project".to_string()
}
