//! Settlement module - When and how much to send back.
//!
//! - `account` - The single designated settlement destination
//! - `decision` - Pure decision rule over a decoded event
//! - `transfer` - Compensating transfer request
//! - `errors` - Action-level failures (cycle-scoped)

mod account;
mod decision;
mod errors;
mod transfer;

pub use account::SettlementAccount;
pub use decision::{decide, SettlementDecision};
pub use errors::SettlementError;
pub use transfer::TransferRequest;
