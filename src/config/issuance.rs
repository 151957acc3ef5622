//! Invoice issuance configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use crate::application::IssuanceSchedule;
use crate::domain::foundation::ConfigurationError;
use crate::domain::invoice::InvoicePolicy;

/// Invoice issuance parameters
#[derive(Debug, Clone, Deserialize)]
pub struct IssuanceConfig {
    /// Batch size range `[min, max]` per outer cycle
    #[serde(default = "default_quantity_interval")]
    pub quantity_interval: [u32; 2],

    /// Length of one outer cycle in seconds
    #[serde(default = "default_repetition_time")]
    pub repetition_time_secs: u64,

    /// Total run time in seconds
    #[serde(default = "default_duration_time")]
    pub duration_time_secs: u64,

    /// Smallest invoice amount (minor units)
    #[serde(default = "default_amount_min")]
    pub amount_min: i64,

    /// Largest invoice amount (minor units)
    #[serde(default = "default_amount_max")]
    pub amount_max: i64,
}

impl IssuanceConfig {
    pub fn schedule(&self) -> Result<IssuanceSchedule, ConfigurationError> {
        let [min, max] = self.quantity_interval;
        IssuanceSchedule::new(
            min,
            max,
            Duration::from_secs(self.repetition_time_secs),
            Duration::from_secs(self.duration_time_secs),
        )
    }

    pub fn policy(&self) -> Result<InvoicePolicy, ConfigurationError> {
        InvoicePolicy::new(self.amount_min, self.amount_max)
    }

    /// Validate issuance configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.schedule()?;
        self.policy()?;
        Ok(())
    }
}

impl Default for IssuanceConfig {
    fn default() -> Self {
        Self {
            quantity_interval: default_quantity_interval(),
            repetition_time_secs: default_repetition_time(),
            duration_time_secs: default_duration_time(),
            amount_min: default_amount_min(),
            amount_max: default_amount_max(),
        }
    }
}

fn default_quantity_interval() -> [u32; 2] {
    [8, 12]
}

fn default_repetition_time() -> u64 {
    3 * 60 * 60
}

fn default_duration_time() -> u64 {
    24 * 60 * 60
}

fn default_amount_min() -> i64 {
    100
}

fn default_amount_max() -> i64 {
    100_000
}
