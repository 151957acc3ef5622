//! Invoice issuance error types.

use thiserror::Error;

/// Failure to issue one invoice of a batch.
///
/// Cycle-scoped: the issuance loop logs it, counts it and moves on to the
/// next invoice.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IssuanceError {
    /// The provider refused the invoice (signature or field validation).
    #[error("Invoice rejected (amount {amount}): {message}")]
    InvoiceRejected { amount: i64, message: String },

    /// The provider could not be reached or failed on its side.
    #[error("Invoice not issued (amount {amount}): provider unavailable: {message}")]
    ProviderUnavailable { amount: i64, message: String },
}

impl IssuanceError {
    pub fn amount(&self) -> i64 {
        match self {
            IssuanceError::InvoiceRejected { amount, .. }
            | IssuanceError::ProviderUnavailable { amount, .. } => *amount,
        }
    }

    pub fn is_rejection(&self) -> bool {
        matches!(self, IssuanceError::InvoiceRejected { .. })
    }
}
