//! In-memory processed event store.
//!
//! Process-local: the record is lost on restart, which matches the
//! stateless-across-runs scope of the poll loop.

use std::collections::HashSet;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::ports::{ProcessedEventStore, StoreError};

/// Settled event ids kept in a `HashSet`.
#[derive(Default)]
pub struct InMemoryProcessedEventStore {
    processed: RwLock<HashSet<String>>,
}

impl InMemoryProcessedEventStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of recorded events.
    pub async fn len(&self) -> usize {
        self.processed.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.processed.read().await.is_empty()
    }
}

#[async_trait]
impl ProcessedEventStore for InMemoryProcessedEventStore {
    async fn contains(&self, event_id: &str) -> Result<bool, StoreError> {
        Ok(self.processed.read().await.contains(event_id))
    }

    async fn mark_processed(&self, event_id: &str) -> Result<(), StoreError> {
        self.processed.write().await.insert(event_id.to_string());
        Ok(())
    }
}
