//! Error types for static configuration.

use thiserror::Error;

/// Invalid static parameters.
///
/// Raised by constructors before any network interaction takes place. These
/// errors are fail-fast and never retried: the owning loop does not start.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("Invalid environment '{0}'. Use sandbox, production.")]
    InvalidEnvironment(String),

    #[error("Invalid authentication type '{0}'. Use project, organization.")]
    InvalidAccountType(String),

    #[error("Identity cannot be empty")]
    EmptyIdentity,

    #[error("Invalid private key: {0}")]
    InvalidPrivateKey(String),

    #[error("Invalid webhook_url '{0}'. Please provide a valid URL.")]
    InvalidWebhookUrl(String),

    #[error("Invalid quantity interval [{min}, {max}]: min must be at least 1 and not exceed max")]
    InvalidQuantityInterval { min: u32, max: u32 },

    #[error("Invalid amount range [{min}, {max}]")]
    InvalidAmountRange { min: i64, max: i64 },

    #[error("{0} must be greater than zero")]
    ZeroDuration(&'static str),

    #[error("Missing settlement field: {0}")]
    MissingSettlementField(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_environment_names_the_allowed_values() {
        let err = ConfigurationError::InvalidEnvironment("staging".to_string());
        assert_eq!(
            err.to_string(),
            "Invalid environment 'staging'. Use sandbox, production."
        );
    }

    #[test]
    fn invalid_quantity_interval_displays_bounds() {
        let err = ConfigurationError::InvalidQuantityInterval { min: 5, max: 2 };
        assert!(err.to_string().contains("[5, 2]"));
    }

    #[test]
    fn zero_duration_names_the_field() {
        let err = ConfigurationError::ZeroDuration("poll_interval");
        assert_eq!(err.to_string(), "poll_interval must be greater than zero");
    }
}
