//! Account type used to build the access id.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ConfigurationError;

/// Kind of provider account the identity belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    Project,
    Organization,
}

impl AccountType {
    /// Parses an account type, ignoring case.
    pub fn parse(value: &str) -> Result<Self, ConfigurationError> {
        match value.to_lowercase().as_str() {
            "project" => Ok(AccountType::Project),
            "organization" => Ok(AccountType::Organization),
            _ => Err(ConfigurationError::InvalidAccountType(value.to_string())),
        }
    }

    /// Lower-case canonical name, also the access id prefix.
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::Project => "project",
            AccountType::Organization => "organization",
        }
    }
}

impl FromStr for AccountType {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AccountType::parse(s)
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
