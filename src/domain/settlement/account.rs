//! Settlement destination.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::ConfigurationError;

/// The one account every compensating transfer goes to.
///
/// Fixed configuration; nothing in an event can redirect a transfer.
/// Missing fields deserialize to the provider's designated account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettlementAccount {
    pub bank_code: String,
    pub branch_code: String,
    pub account_number: String,
    pub account_type: String,
    pub name: String,
    pub tax_id: String,
}

impl SettlementAccount {
    /// Checks that every field is filled in.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        let fields = [
            (&self.bank_code, "bank_code"),
            (&self.branch_code, "branch_code"),
            (&self.account_number, "account_number"),
            (&self.account_type, "account_type"),
            (&self.name, "name"),
            (&self.tax_id, "tax_id"),
        ];

        for (value, field) in fields {
            if value.trim().is_empty() {
                return Err(ConfigurationError::MissingSettlementField(field));
            }
        }

        Ok(())
    }
}

impl Default for SettlementAccount {
    fn default() -> Self {
        Self {
            bank_code: "20018183".to_string(),
            branch_code: "0001".to_string(),
            account_number: "6341320293482496".to_string(),
            account_type: "payment".to_string(),
            name: "Stark Bank S.A.".to_string(),
            tax_id: "20.018.183/0001-80".to_string(),
        }
    }
}
