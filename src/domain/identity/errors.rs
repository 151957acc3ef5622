//! Authentication error types.

use std::fmt;
use thiserror::Error;

/// Why authentication (or key creation) failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFailureKind {
    /// The key does not match the identity.
    InvalidSignature,

    /// Identity or environment accepted locally but rejected remotely.
    InputRejected,

    /// The provider failed on its side or could not be reached.
    ServiceUnavailable,

    /// Anything else.
    Unknown,
}

impl AuthFailureKind {
    fn label(&self) -> &'static str {
        match self {
            AuthFailureKind::InvalidSignature => "Invalid signature",
            AuthFailureKind::InputRejected => "Input errors",
            AuthFailureKind::ServiceUnavailable => "Internal server error",
            AuthFailureKind::Unknown => "An unexpected error occurred",
        }
    }
}

impl fmt::Display for AuthFailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Single error type surfaced by authentication.
///
/// Carries the original failure kind and message; the transport error type
/// never leaks past this boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct AuthenticationError {
    kind: AuthFailureKind,
    message: String,
}

impl AuthenticationError {
    pub fn new(kind: AuthFailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> AuthFailureKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_starts_with_kind_label() {
        let err = AuthenticationError::new(AuthFailureKind::InvalidSignature, "bad key");
        assert_eq!(err.to_string(), "Invalid signature: bad key");

        let err = AuthenticationError::new(AuthFailureKind::InputRejected, "unknown id");
        assert!(err.to_string().starts_with("Input errors"));
    }

    #[test]
    fn keeps_kind_and_message() {
        let err = AuthenticationError::new(AuthFailureKind::ServiceUnavailable, "503");
        assert_eq!(err.kind(), AuthFailureKind::ServiceUnavailable);
        assert_eq!(err.message(), "503");
    }
}
