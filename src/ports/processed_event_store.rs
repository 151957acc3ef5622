//! ProcessedEventStore port - Interface for tracking settled events.
//!
//! Enables optional de-duplication of redelivered webhook events across poll
//! cycles. When enabled, the reactor records an event after its transfer was
//! issued and skips any later delivery carrying the same event id.

use async_trait::async_trait;
use thiserror::Error;

/// Port for tracking which events have already been settled.
///
/// # Example
///
/// ```ignore
/// if store.contains(&event.id).await? {
///     return Ok(false); // Skip duplicate
/// }
///
/// // Issue transfer...
///
/// store.mark_processed(&event.id).await?;
/// ```
#[async_trait]
pub trait ProcessedEventStore: Send + Sync {
    /// Check if an event has been settled.
    async fn contains(&self, event_id: &str) -> Result<bool, StoreError>;

    /// Mark an event as settled.
    ///
    /// Call this AFTER the transfer was issued.
    async fn mark_processed(&self, event_id: &str) -> Result<(), StoreError>;
}

/// Store backend failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Processed event store error: {0}")]
pub struct StoreError(pub String);
