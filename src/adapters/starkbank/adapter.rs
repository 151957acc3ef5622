//! Signed HTTP adapter for the banking provider.
//!
//! Implements the `BankingProvider` trait against the provider's v2 REST API.
//!
//! # Request signing
//!
//! Every request carries three headers:
//! - `Access-Id`: `project/<id>` or `organization/<id>`
//! - `Access-Time`: unix seconds
//! - `Access-Signature`: base64 DER ECDSA over `"<access-id>:<access-time>:<body>"`
//!
//! # Configuration
//!
//! ```ignore
//! let config = StarkBankConfig::default().with_timeout(Duration::from_secs(30));
//! let adapter = StarkBankAdapter::new(config)?;
//! ```

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Method;
use serde::de::DeserializeOwned;

use crate::domain::identity::Session;
use crate::domain::invoice::InvoiceRequest;
use crate::domain::settlement::TransferRequest;
use crate::ports::{BankingProvider, IssuedInvoice, IssuedTransfer, ProviderError};

use super::wire::{
    classify_failure, InvoiceBatch, InvoiceBatchResponse, PublicKeyResponse, TransferBatch,
    TransferBatchResponse,
};

const USER_AGENT: &str = concat!("webhook-settlement/", env!("CARGO_PKG_VERSION"));

/// Provider API configuration.
#[derive(Debug, Clone)]
pub struct StarkBankConfig {
    /// Overrides the per-environment base URL (for testing).
    base_url: Option<String>,

    /// Per-request timeout.
    timeout: Duration,
}

impl Default for StarkBankConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout: Duration::from_secs(30),
        }
    }
}

impl StarkBankConfig {
    /// Set a custom API base URL (for testing). Must end with `/`.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn base_url<'a>(&'a self, session: &Session) -> &'a str {
        self.base_url
            .as_deref()
            .unwrap_or_else(|| session.environment().api_base_url())
    }
}

/// Banking provider adapter.
pub struct StarkBankAdapter {
    config: StarkBankConfig,
    http_client: reqwest::Client,
}

impl StarkBankAdapter {
    pub fn new(config: StarkBankConfig) -> Result<Self, ProviderError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| ProviderError::unknown(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            config,
            http_client,
        })
    }

    /// Sends one signed request and decodes a successful JSON response.
    async fn signed_request<T: DeserializeOwned>(
        &self,
        session: &Session,
        method: Method,
        path: &str,
        body: Option<String>,
    ) -> Result<T, ProviderError> {
        let url = format!("{}{}", self.config.base_url(session), path);
        let body = body.unwrap_or_default();
        let access_time = chrono::Utc::now().timestamp().to_string();
        let signature = session.sign_request(&access_time, &body);

        let mut request = self
            .http_client
            .request(method.clone(), &url)
            .header("Access-Id", session.access_id())
            .header("Access-Time", &access_time)
            .header("Access-Signature", signature)
            .header("Content-Type", "application/json");

        if !body.is_empty() {
            request = request.body(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ProviderError::network(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ProviderError::network(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            let error = classify_failure(status.as_u16(), &text);
            tracing::warn!(
                method = %method,
                path,
                status = status.as_u16(),
                code = %error.code,
                error = %error.message,
                "Provider request failed"
            );
            return Err(error);
        }

        serde_json::from_str(&text).map_err(|e| {
            ProviderError::unknown(format!("Failed to parse provider response: {}", e))
        })
    }
}

#[async_trait]
impl BankingProvider for StarkBankAdapter {
    async fn probe(&self, session: &Session) -> Result<(), ProviderError> {
        let _: serde_json::Value = self
            .signed_request(session, Method::GET, "balance", None)
            .await?;
        Ok(())
    }

    async fn create_invoice(
        &self,
        session: &Session,
        invoice: &InvoiceRequest,
    ) -> Result<IssuedInvoice, ProviderError> {
        let body = serde_json::to_string(&InvoiceBatch {
            invoices: [invoice],
        })
        .map_err(|e| ProviderError::unknown(format!("Failed to encode invoice: {}", e)))?;

        let response: InvoiceBatchResponse = self
            .signed_request(session, Method::POST, "invoice", Some(body))
            .await?;

        response
            .invoices
            .into_iter()
            .next()
            .map(IssuedInvoice::from)
            .ok_or_else(|| ProviderError::unknown("Provider returned no invoice"))
    }

    async fn create_transfer(
        &self,
        session: &Session,
        transfer: &TransferRequest,
    ) -> Result<IssuedTransfer, ProviderError> {
        let body = serde_json::to_string(&TransferBatch {
            transfers: [transfer],
        })
        .map_err(|e| ProviderError::unknown(format!("Failed to encode transfer: {}", e)))?;

        let response: TransferBatchResponse = self
            .signed_request(session, Method::POST, "transfer", Some(body))
            .await?;

        response
            .transfers
            .into_iter()
            .next()
            .map(IssuedTransfer::from)
            .ok_or_else(|| ProviderError::unknown("Provider returned no transfer"))
    }

    async fn fetch_public_key(&self, session: &Session) -> Result<String, ProviderError> {
        let response: PublicKeyResponse = self
            .signed_request(session, Method::GET, "public-key?limit=1", None)
            .await?;

        response
            .public_keys
            .into_iter()
            .next()
            .map(|key| key.content)
            .ok_or_else(|| ProviderError::unknown("Provider returned no public key"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::identity::{AccountType, Environment};
    use k256::ecdsa::SigningKey;
    use rand::rngs::OsRng;

    fn session(environment: Environment) -> Session {
        Session::new(
            environment,
            "5656565656565656",
            AccountType::Project,
            SigningKey::random(&mut OsRng),
        )
    }

    #[test]
    fn base_url_follows_session_environment() {
        let config = StarkBankConfig::default();
        assert_eq!(
            config.base_url(&session(Environment::Sandbox)),
            "https://sandbox.api.starkbank.com/v2/"
        );
        assert_eq!(
            config.base_url(&session(Environment::Production)),
            "https://api.starkbank.com/v2/"
        );
    }

    #[test]
    fn base_url_override_wins() {
        let config = StarkBankConfig::default().with_base_url("http://127.0.0.1:9/v2/");
        assert_eq!(
            config.base_url(&session(Environment::Production)),
            "http://127.0.0.1:9/v2/"
        );
    }

    #[test]
    fn adapter_builds_with_custom_timeout() {
        let config = StarkBankConfig::default().with_timeout(Duration::from_secs(5));
        assert!(StarkBankAdapter::new(config).is_ok());
    }

    #[tokio::test]
    async fn unreachable_host_is_a_network_error() {
        let config = StarkBankConfig::default()
            .with_base_url("http://127.0.0.1:1/v2/")
            .with_timeout(Duration::from_secs(2));
        let adapter = StarkBankAdapter::new(config).unwrap();

        let err = adapter
            .probe(&session(Environment::Sandbox))
            .await
            .unwrap_err();
        assert_eq!(err.code, crate::ports::ProviderErrorCode::Network);
    }
}
