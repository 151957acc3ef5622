//! Event-level error types.

use thiserror::Error;

/// Failures while turning a raw webhook body into a trusted event.
///
/// Signature failures and malformed bodies are deliberately distinct: the
/// first points at tampering or a key mismatch, the second at schema drift.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerificationError {
    /// The signature does not match the body under the provider key.
    #[error("Invalid signature")]
    InvalidSignature,

    /// Signature is valid but the body does not have the expected shape.
    #[error("Malformed event: {0}")]
    MalformedEvent(String),

    /// The provider public key could not be obtained or parsed.
    #[error("Provider public key unavailable: {0}")]
    PublicKeyUnavailable(String),
}
