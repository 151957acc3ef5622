//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `starkbank` - Signed provider API client (and its mock)
//! - `webhook` - Webhook endpoint polling (HTTP and scripted)
//! - `events` - Processed event tracking (in-memory)

pub mod events;
pub mod starkbank;
pub mod webhook;

pub use events::InMemoryProcessedEventStore;
pub use starkbank::{MockBankingProvider, StarkBankAdapter, StarkBankConfig};
pub use webhook::{HttpWebhookSource, ScriptedWebhookSource};
