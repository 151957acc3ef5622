//! Event tracking adapters.
//!
//! - `InMemoryProcessedEventStore` - Process-local de-duplication record

mod in_memory_processed_store;

pub use in_memory_processed_store::InMemoryProcessedEventStore;
