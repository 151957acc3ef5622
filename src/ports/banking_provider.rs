//! Banking provider port for the signed provider API.
//!
//! Defines the contract for the provider calls this crate needs: a session
//! probe, invoice issuance, transfer issuance and retrieval of the key used
//! to sign webhook events. Every call is signed with the given [`Session`];
//! no ambient "current user" exists.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::identity::{AuthFailureKind, AuthenticationError, Session};
use crate::domain::invoice::InvoiceRequest;
use crate::domain::settlement::TransferRequest;

/// Port for the banking provider API.
#[async_trait]
pub trait BankingProvider: Send + Sync {
    /// Issue a cheap signed read to prove the session is accepted remotely.
    async fn probe(&self, session: &Session) -> Result<(), ProviderError>;

    /// Create one invoice.
    async fn create_invoice(
        &self,
        session: &Session,
        invoice: &InvoiceRequest,
    ) -> Result<IssuedInvoice, ProviderError>;

    /// Create one transfer.
    async fn create_transfer(
        &self,
        session: &Session,
        transfer: &TransferRequest,
    ) -> Result<IssuedTransfer, ProviderError>;

    /// Fetch the PEM public key the provider signs webhook events with.
    async fn fetch_public_key(&self, session: &Session) -> Result<String, ProviderError>;
}

/// Invoice as acknowledged by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuedInvoice {
    pub id: String,
    pub amount: i64,
    pub status: String,
}

/// Transfer as acknowledged by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuedTransfer {
    pub id: String,
    pub amount: i64,
    pub status: String,
}

/// Errors from provider operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderError {
    /// Error code for categorization.
    pub code: ProviderErrorCode,
    /// Human-readable message.
    pub message: String,
    /// Provider's own error code (if available), e.g. `invalidSignature`.
    pub provider_code: Option<String>,
}

impl ProviderError {
    pub fn new(code: ProviderErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            provider_code: None,
        }
    }

    pub fn with_provider_code(mut self, code: impl Into<String>) -> Self {
        self.provider_code = Some(code.into());
        self
    }

    pub fn invalid_signature(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::InvalidSignature, message)
    }

    pub fn input_rejected(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::InputRejected, message)
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::ServiceUnavailable, message)
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::Network, message)
    }

    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::Unknown, message)
    }
}

impl std::fmt::Display for ProviderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for ProviderError {}

impl From<ProviderError> for AuthenticationError {
    fn from(err: ProviderError) -> Self {
        let kind = match err.code {
            ProviderErrorCode::InvalidSignature => AuthFailureKind::InvalidSignature,
            ProviderErrorCode::InputRejected => AuthFailureKind::InputRejected,
            ProviderErrorCode::ServiceUnavailable | ProviderErrorCode::Network => {
                AuthFailureKind::ServiceUnavailable
            }
            ProviderErrorCode::Unknown => AuthFailureKind::Unknown,
        };

        AuthenticationError::new(kind, err.message)
    }
}

/// Provider error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderErrorCode {
    /// Request signature or credentials rejected.
    InvalidSignature,

    /// Request understood but refused (validation, business rule).
    InputRejected,

    /// Provider-side failure (5xx).
    ServiceUnavailable,

    /// Connectivity or timeout; no response received.
    Network,

    /// Unknown error.
    Unknown,
}

impl ProviderErrorCode {
    /// True when the remote side answered and refused the request.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            ProviderErrorCode::InvalidSignature | ProviderErrorCode::InputRejected
        )
    }
}

impl std::fmt::Display for ProviderErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ProviderErrorCode::InvalidSignature => "invalid_signature",
            ProviderErrorCode::InputRejected => "input_rejected",
            ProviderErrorCode::ServiceUnavailable => "service_unavailable",
            ProviderErrorCode::Network => "network_error",
            ProviderErrorCode::Unknown => "unknown",
        };
        write!(f, "{}", s)
    }
}
