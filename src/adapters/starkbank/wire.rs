//! Provider wire types and HTTP failure classification.

use serde::{Deserialize, Serialize};

use crate::domain::invoice::InvoiceRequest;
use crate::domain::settlement::TransferRequest;
use crate::ports::{IssuedInvoice, IssuedTransfer, ProviderError};

/// Error codes the provider uses for signature/credential rejection.
const SIGNATURE_ERROR_CODES: &[&str] = &[
    "invalidSignature",
    "invalidAccessSignature",
    "invalidCredentials",
];

#[derive(Debug, Serialize)]
pub(crate) struct InvoiceBatch<'a> {
    pub invoices: [&'a InvoiceRequest; 1],
}

#[derive(Debug, Serialize)]
pub(crate) struct TransferBatch<'a> {
    pub transfers: [&'a TransferRequest; 1],
}

#[derive(Debug, Deserialize)]
pub(crate) struct InvoiceBatchResponse {
    #[serde(default)]
    pub invoices: Vec<WireResource>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TransferBatchResponse {
    #[serde(default)]
    pub transfers: Vec<WireResource>,
}

/// The fields this crate reads back from a created invoice or transfer.
#[derive(Debug, Deserialize)]
pub(crate) struct WireResource {
    pub id: String,
    pub amount: i64,
    #[serde(default)]
    pub status: String,
}

impl From<WireResource> for IssuedInvoice {
    fn from(r: WireResource) -> Self {
        IssuedInvoice {
            id: r.id,
            amount: r.amount,
            status: r.status,
        }
    }
}

impl From<WireResource> for IssuedTransfer {
    fn from(r: WireResource) -> Self {
        IssuedTransfer {
            id: r.id,
            amount: r.amount,
            status: r.status,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PublicKeyResponse {
    #[serde(default)]
    pub public_keys: Vec<WirePublicKey>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WirePublicKey {
    pub content: String,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    errors: Vec<WireError>,
}

#[derive(Debug, Deserialize)]
struct WireError {
    code: String,
    #[serde(default)]
    message: String,
}

/// Maps a non-2xx response to a [`ProviderError`].
///
/// - 400 carrying a signature/credential code -> `InvalidSignature`
/// - other 4xx -> `InputRejected`
/// - 5xx -> `ServiceUnavailable`
/// - anything else -> `Unknown`
pub(crate) fn classify_failure(status: u16, body: &str) -> ProviderError {
    let parsed: ErrorResponse = serde_json::from_str(body).unwrap_or_default();

    let message = if parsed.errors.is_empty() {
        format!("HTTP {}: {}", status, body.trim())
    } else {
        parsed
            .errors
            .iter()
            .map(|e| format!("{}: {}", e.code, e.message))
            .collect::<Vec<_>>()
            .join("; ")
    };
    let first_code = parsed.errors.first().map(|e| e.code.clone());

    let error = match status {
        400 if parsed
            .errors
            .iter()
            .any(|e| SIGNATURE_ERROR_CODES.contains(&e.code.as_str())) =>
        {
            ProviderError::invalid_signature(message)
        }
        400..=499 => ProviderError::input_rejected(message),
        500..=599 => ProviderError::service_unavailable(message),
        _ => ProviderError::unknown(message),
    };

    match first_code {
        Some(code) => error.with_provider_code(code),
        None => error,
    }
}
