//! Settlement error types.

use thiserror::Error;

/// Failures while issuing a compensating transfer.
///
/// Neither variant is retried and the triggering event is not re-queued; the
/// error goes to the log so an operator sees the missed transfer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettlementError {
    /// The provider refused the transfer (signature or business rule).
    #[error("Transfer rejected for event {event_id}: {message}")]
    TransferRejected { event_id: String, message: String },

    /// The provider could not be reached or failed on its side.
    #[error("Transfer not issued for event {event_id}: provider unavailable: {message}")]
    ProviderUnavailable { event_id: String, message: String },
}

impl SettlementError {
    pub fn event_id(&self) -> &str {
        match self {
            SettlementError::TransferRejected { event_id, .. }
            | SettlementError::ProviderUnavailable { event_id, .. } => event_id,
        }
    }
}
