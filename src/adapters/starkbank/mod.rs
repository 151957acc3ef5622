//! Banking provider adapter.
//!
//! Implements the `BankingProvider` port against the provider's REST API:
//! - Signed requests (secp256k1 ECDSA over access id, time and body)
//! - Invoice and transfer issuance
//! - Retrieval of the key used to sign webhook events
//! - Classification of HTTP failures into provider error codes
//!
//! `MockBankingProvider` is the in-process stand-in used by tests.

mod adapter;
mod mock_banking_provider;
mod wire;

pub use adapter::{StarkBankAdapter, StarkBankConfig};
pub use mock_banking_provider::{MethodCall, MockBankingProvider};
