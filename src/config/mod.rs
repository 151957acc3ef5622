//! Application configuration module
//!
//! Configuration is layered with the `config` and `dotenvy` crates: built-in
//! defaults, then an optional TOML/YAML/JSON file, then environment variables
//! with the `WEBHOOK_SETTLEMENT` prefix. Nested values use `__` as separator.
//!
//! # Example
//!
//! ```no_run
//! use webhook_settlement::config::AppConfig;
//!
//! let config = AppConfig::load(None).expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Polling {}", config.engine.webhook_url);
//! ```

mod engine;
mod error;
mod http;
mod issuance;
mod logging;
mod polling;

pub use engine::EngineConfig;
pub use error::{ConfigError, ValidationError};
pub use http::HttpConfig;
pub use issuance::IssuanceConfig;
pub use logging::{LogFormat, LoggingConfig};
pub use polling::PollingConfig;

use serde::Deserialize;
use std::path::Path;

use crate::domain::settlement::SettlementAccount;

/// Root application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Provider credentials and webhook endpoint
    #[serde(default)]
    pub engine: EngineConfig,

    /// Invoice issuance loop
    #[serde(default)]
    pub issuance: IssuanceConfig,

    /// Webhook polling loop
    #[serde(default)]
    pub polling: PollingConfig,

    /// Destination account for settlement transfers
    #[serde(default)]
    pub settlement: SettlementAccount,

    #[serde(default)]
    pub http: HttpConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from an optional file and environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads `path` if given; the format follows the file extension
    /// 3. Reads environment variables with `WEBHOOK_SETTLEMENT` prefix
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `WEBHOOK_SETTLEMENT__ENGINE__ID=...` -> `engine.id = ...`
    /// - `WEBHOOK_SETTLEMENT__ISSUANCE__QUANTITY_INTERVAL=8,12` -> `issuance.quantity_interval = [8, 12]`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be read or values cannot be
    /// parsed into the expected types.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        }

        let config = builder
            .add_source(
                config::Environment::default()
                    .prefix("WEBHOOK_SETTLEMENT")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("issuance.quantity_interval"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// Checks the same invariants the components enforce on construction so
    /// a bad file fails before any network call.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.engine.validate()?;
        self.issuance.validate()?;
        self.polling.validate()?;
        self.polling.webhook_config(&self.engine.webhook_url)?;
        self.settlement.validate()?;
        self.http.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}
