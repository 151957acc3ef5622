//! Webhook module - Signed event payloads and their decoded form.
//!
//! - `event` - Raw envelope, decoded event, subscription and invoice log types
//! - `signature` - Detached ECDSA signature checks over raw bodies
//! - `errors` - Event-level failures (cycle-scoped)

mod errors;
mod event;
mod signature;

pub use errors::VerificationError;
pub use event::{
    DecodedEvent, EventLog, InvoiceLog, InvoiceLogStatus, RawEventEnvelope, Subscription,
    SIGNATURE_HEADER,
};
pub use signature::{parse_public_key, verify_digital_signature};

#[cfg(test)]
pub(crate) use signature::{public_key_pem, sign_body};
