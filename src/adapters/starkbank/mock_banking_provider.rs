//! Mock banking provider for testing.
//!
//! Provides a configurable mock implementation of `BankingProvider` for unit
//! and integration tests. Supports:
//! - Provider public key rotation
//! - Error injection (next call, per method, per invoice call number)
//! - Call tracking
//! - Capture of issued invoices and transfers

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::identity::Session;
use crate::domain::invoice::InvoiceRequest;
use crate::domain::settlement::TransferRequest;
use crate::ports::{BankingProvider, IssuedInvoice, IssuedTransfer, ProviderError};

/// Mock banking provider for testing.
///
/// # Example
///
/// ```ignore
/// let mock = MockBankingProvider::with_public_key(pem);
///
/// // Inject errors
/// mock.set_method_error("create_transfer", ProviderError::input_rejected("x"));
///
/// // Assert
/// assert_eq!(mock.issued_transfers().len(), 1);
/// ```
#[derive(Default)]
pub struct MockBankingProvider {
    inner: Arc<Mutex<MockState>>,
}

#[derive(Default)]
struct MockState {
    /// Public keys served by `fetch_public_key`. The front key is served;
    /// each fetch advances to the next one while more are queued.
    public_keys: VecDeque<String>,

    /// Error to return on next call.
    next_error: Option<ProviderError>,

    /// Specific errors by method name.
    method_errors: HashMap<String, ProviderError>,

    /// 1-based `create_invoice` call numbers that fail.
    failing_invoice_calls: HashSet<usize>,

    invoice_calls: usize,

    invoices: Vec<InvoiceRequest>,

    transfers: Vec<TransferRequest>,

    /// Track method calls for assertions.
    call_log: Vec<MethodCall>,
}

/// Recorded method call for assertions.
#[derive(Debug, Clone)]
pub struct MethodCall {
    pub method: String,
    pub args: Vec<String>,
}

impl MockBankingProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock that serves `pem` as the provider's event signing key.
    pub fn with_public_key(pem: impl Into<String>) -> Self {
        let mock = Self::new();
        mock.push_public_key(pem);
        mock
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Configuration Methods
    // ════════════════════════════════════════════════════════════════════════════

    /// Queue a public key; served after the ones already queued.
    pub fn push_public_key(&self, pem: impl Into<String>) {
        self.state().public_keys.push_back(pem.into());
    }

    /// Set an error to return on the next call to any method.
    pub fn set_error(&self, error: ProviderError) {
        self.state().next_error = Some(error);
    }

    /// Set an error for a specific method.
    pub fn set_method_error(&self, method: &str, error: ProviderError) {
        self.state()
            .method_errors
            .insert(method.to_string(), error);
    }

    /// Fail the `n`th call (1-based) to `create_invoice`.
    pub fn fail_invoice_call(&self, n: usize) {
        self.state().failing_invoice_calls.insert(n);
    }

    /// Clear all configured errors.
    pub fn clear_errors(&self) {
        let mut state = self.state();
        state.next_error = None;
        state.method_errors.clear();
        state.failing_invoice_calls.clear();
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Call Tracking
    // ════════════════════════════════════════════════════════════════════════════

    pub fn calls(&self) -> Vec<MethodCall> {
        self.state().call_log.clone()
    }

    pub fn was_called(&self, method: &str) -> bool {
        self.state().call_log.iter().any(|c| c.method == method)
    }

    pub fn call_count(&self, method: &str) -> usize {
        self.state()
            .call_log
            .iter()
            .filter(|c| c.method == method)
            .count()
    }

    /// Invoices accepted by the mock, in order.
    pub fn issued_invoices(&self) -> Vec<InvoiceRequest> {
        self.state().invoices.clone()
    }

    /// Transfers accepted by the mock, in order.
    pub fn issued_transfers(&self) -> Vec<TransferRequest> {
        self.state().transfers.clone()
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Internal Helpers
    // ════════════════════════════════════════════════════════════════════════════

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn record_call(&self, method: &str, args: Vec<String>) {
        self.state().call_log.push(MethodCall {
            method: method.to_string(),
            args,
        });
    }

    fn check_error(&self, method: &str) -> Result<(), ProviderError> {
        let mut state = self.state();

        if let Some(error) = state.method_errors.get(method) {
            return Err(error.clone());
        }

        if let Some(error) = state.next_error.take() {
            return Err(error);
        }

        Ok(())
    }
}

impl Clone for MockBankingProvider {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

#[async_trait]
impl BankingProvider for MockBankingProvider {
    async fn probe(&self, session: &Session) -> Result<(), ProviderError> {
        self.record_call("probe", vec![session.access_id()]);
        self.check_error("probe")
    }

    async fn create_invoice(
        &self,
        session: &Session,
        invoice: &InvoiceRequest,
    ) -> Result<IssuedInvoice, ProviderError> {
        self.record_call(
            "create_invoice",
            vec![session.access_id(), invoice.amount.to_string()],
        );

        let call_number = {
            let mut state = self.state();
            state.invoice_calls += 1;
            state.invoice_calls
        };

        self.check_error("create_invoice")?;

        let mut state = self.state();
        if state.failing_invoice_calls.contains(&call_number) {
            return Err(ProviderError::service_unavailable(format!(
                "Injected failure on invoice call {}",
                call_number
            )));
        }

        state.invoices.push(invoice.clone());

        Ok(IssuedInvoice {
            id: format!("inv_mock_{}", call_number),
            amount: invoice.amount,
            status: "created".to_string(),
        })
    }

    async fn create_transfer(
        &self,
        session: &Session,
        transfer: &TransferRequest,
    ) -> Result<IssuedTransfer, ProviderError> {
        self.record_call(
            "create_transfer",
            vec![
                session.access_id(),
                transfer.amount.to_string(),
                transfer.external_id.clone(),
            ],
        );
        self.check_error("create_transfer")?;

        let mut state = self.state();
        state.transfers.push(transfer.clone());

        Ok(IssuedTransfer {
            id: format!("tr_mock_{}", state.transfers.len()),
            amount: transfer.amount,
            status: "created".to_string(),
        })
    }

    async fn fetch_public_key(&self, session: &Session) -> Result<String, ProviderError> {
        self.record_call("fetch_public_key", vec![session.access_id()]);
        self.check_error("fetch_public_key")?;

        let mut state = self.state();
        let key = if state.public_keys.len() > 1 {
            state.public_keys.pop_front()
        } else {
            state.public_keys.front().cloned()
        };

        key.ok_or_else(|| ProviderError::unknown("No public key configured"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::identity::{AccountType, Environment};
    use crate::domain::settlement::SettlementAccount;
    use crate::ports::ProviderErrorCode;
    use k256::ecdsa::SigningKey;
    use rand::rngs::OsRng;

    fn session() -> Session {
        Session::new(
            Environment::Sandbox,
            "123",
            AccountType::Project,
            SigningKey::random(&mut OsRng),
        )
    }

    fn invoice(amount: i64) -> InvoiceRequest {
        InvoiceRequest::new(amount, "529.982.247-25", "Ada Lovelace")
    }

    #[tokio::test]
    async fn create_invoice_records_request() {
        let mock = MockBankingProvider::new();
        let issued = mock.create_invoice(&session(), &invoice(1500)).await.unwrap();

        assert_eq!(issued.amount, 1500);
        assert_eq!(mock.issued_invoices().len(), 1);
        assert_eq!(mock.call_count("create_invoice"), 1);
    }

    #[tokio::test]
    async fn create_transfer_records_request() {
        let mock = MockBankingProvider::new();
        let transfer = TransferRequest::settlement(&SettlementAccount::default(), 980, "evt");

        mock.create_transfer(&session(), &transfer).await.unwrap();

        assert_eq!(mock.issued_transfers(), vec![transfer]);
        assert!(mock.was_called("create_transfer"));
    }

    #[tokio::test]
    async fn set_error_applies_once() {
        let mock = MockBankingProvider::new();
        mock.set_error(ProviderError::network("down"));

        assert!(mock.probe(&session()).await.is_err());
        assert!(mock.probe(&session()).await.is_ok());
    }

    #[tokio::test]
    async fn set_method_error_only_affects_method() {
        let mock = MockBankingProvider::new();
        mock.set_method_error("create_transfer", ProviderError::input_rejected("nope"));

        assert!(mock.probe(&session()).await.is_ok());
        let transfer = TransferRequest::settlement(&SettlementAccount::default(), 1, "e");
        let err = mock.create_transfer(&session(), &transfer).await.unwrap_err();
        assert_eq!(err.code, ProviderErrorCode::InputRejected);
        assert!(mock.issued_transfers().is_empty());
    }

    #[tokio::test]
    async fn failing_invoice_call_only_fails_that_call() {
        let mock = MockBankingProvider::new();
        mock.fail_invoice_call(2);

        assert!(mock.create_invoice(&session(), &invoice(1)).await.is_ok());
        assert!(mock.create_invoice(&session(), &invoice(2)).await.is_err());
        assert!(mock.create_invoice(&session(), &invoice(3)).await.is_ok());

        assert_eq!(mock.issued_invoices().len(), 2);
        assert_eq!(mock.call_count("create_invoice"), 3);
    }

    #[tokio::test]
    async fn public_keys_rotate_then_stick() {
        let mock = MockBankingProvider::with_public_key("old");
        mock.push_public_key("new");

        assert_eq!(mock.fetch_public_key(&session()).await.unwrap(), "old");
        assert_eq!(mock.fetch_public_key(&session()).await.unwrap(), "new");
        assert_eq!(mock.fetch_public_key(&session()).await.unwrap(), "new");
    }

    #[tokio::test]
    async fn missing_public_key_is_an_error() {
        let mock = MockBankingProvider::new();
        assert!(mock.fetch_public_key(&session()).await.is_err());
    }

    #[test]
    fn clones_share_state() {
        let mock = MockBankingProvider::new();
        let clone = mock.clone();
        clone.set_error(ProviderError::unknown("x"));
        assert!(mock.state().next_error.is_some());
    }
}
