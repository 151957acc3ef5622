//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Provider Ports
//!
//! - `BankingProvider` - Signed provider API (probe, invoices, transfers, public key)
//!
//! ## Webhook Ports
//!
//! - `WebhookSource` - One poll against the webhook endpoint
//! - `ProcessedEventStore` - Optional cross-cycle de-duplication

mod banking_provider;
mod processed_event_store;
mod webhook_source;

pub use banking_provider::{
    BankingProvider, IssuedInvoice, IssuedTransfer, ProviderError, ProviderErrorCode,
};
pub use processed_event_store::{ProcessedEventStore, StoreError};
pub use webhook_source::{FetchError, WebhookSource};
