//! Webhook source port - One poll against the configured endpoint.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::webhook::RawEventEnvelope;

/// Port for pulling webhook events.
///
/// This is a poll, not a push receiver: each call performs exactly one fetch
/// and returns at most one envelope.
#[async_trait]
pub trait WebhookSource: Send + Sync {
    /// Fetch the next pending event.
    ///
    /// `Ok(None)` means the endpoint answered but had nothing to deliver.
    async fn fetch(&self) -> Result<Option<RawEventEnvelope>, FetchError>;
}

/// Cycle-scoped fetch failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Connection, timeout or body read failure.
    #[error("Webhook fetch failed: {0}")]
    Transport(String),

    /// Endpoint answered with a non-2xx status.
    #[error("Webhook endpoint returned status {0}")]
    UnexpectedStatus(u16),

    /// A body arrived without the signature header.
    #[error("Webhook response is missing the signature header")]
    MissingSignature,
}
