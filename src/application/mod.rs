//! Application layer - The components that drive the provider.
//!
//! - `Authenticator` - Validates credentials and produces a signed `Session`
//! - `EventVerifier` - Verifies and decodes webhook payloads
//! - `SettlementReactor` - Issues compensating transfers for paid invoices
//! - `PollLoop` - Fetch, verify, react on a fixed cadence
//! - `IssuanceLoop` - Randomized invoice batches on a fixed repetition
//!
//! Both loops take an explicit `Session` and a `ShutdownSignal`; they share
//! nothing else and can run side by side in one process.

mod authenticator;
mod issuance_loop;
mod poll_loop;
mod reactor;
mod shutdown;
mod verifier;

pub use authenticator::{Authenticator, PRIVATE_KEY_FILE, PUBLIC_KEY_FILE};
pub use issuance_loop::{IssuanceLoop, IssuanceReport, IssuanceSchedule};
pub use poll_loop::{parse_endpoint, CycleOutcome, PollLoop, PollPhase, PollReport, WebhookConfig};
pub use reactor::SettlementReactor;
pub use shutdown::{ShutdownSignal, Termination};
pub use verifier::EventVerifier;
