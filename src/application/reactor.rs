//! SettlementReactor - Sends the compensating transfer for paid invoices.

use std::sync::Arc;

use crate::domain::identity::Session;
use crate::domain::settlement::{
    decide, SettlementAccount, SettlementDecision, SettlementError, TransferRequest,
};
use crate::domain::webhook::{DecodedEvent, InvoiceLogStatus};
use crate::ports::{BankingProvider, ProcessedEventStore, ProviderError};

/// Applies the settlement rule to decoded events and issues transfers.
///
/// Every transfer goes to the configured [`SettlementAccount`]. Without a
/// [`ProcessedEventStore`] the reactor keeps no state between calls, so a
/// redelivered event is settled again (the provider still sees the same
/// `externalId`).
pub struct SettlementReactor {
    provider: Arc<dyn BankingProvider>,
    account: SettlementAccount,
    processed: Option<Arc<dyn ProcessedEventStore>>,
}

impl SettlementReactor {
    pub fn new(provider: Arc<dyn BankingProvider>, account: SettlementAccount) -> Self {
        Self {
            provider,
            account,
            processed: None,
        }
    }

    /// Skip events already settled by this process.
    pub fn with_deduplication(mut self, store: Arc<dyn ProcessedEventStore>) -> Self {
        self.processed = Some(store);
        self
    }

    pub fn account(&self) -> &SettlementAccount {
        &self.account
    }

    /// Reacts to one event. Returns whether a transfer was issued.
    ///
    /// Non-invoice events and any status other than `paid` are no-ops.
    pub async fn react(
        &self,
        session: &Session,
        event: &DecodedEvent,
    ) -> Result<bool, SettlementError> {
        let amount = match decide(event) {
            SettlementDecision::Settle { amount } => amount,
            SettlementDecision::NotInvoice => {
                tracing::debug!(
                    event_id = %event.id,
                    subscription = %event.subscription,
                    "Event ignored: not an invoice"
                );
                return Ok(false);
            }
            SettlementDecision::StatusNotPaid => {
                if let Some(log) = event.invoice_log() {
                    if let InvoiceLogStatus::Unrecognized(status) = &log.status {
                        tracing::warn!(
                            event_id = %event.id,
                            status = %status,
                            "Unrecognized invoice status, no transfer issued"
                        );
                    } else {
                        tracing::debug!(
                            event_id = %event.id,
                            status = %log.status.as_str(),
                            "Invoice not paid, no transfer issued"
                        );
                    }
                }
                return Ok(false);
            }
            SettlementDecision::NothingToSettle { amount, fee } => {
                tracing::warn!(
                    event_id = %event.id,
                    amount,
                    fee,
                    "Paid invoice leaves nothing to settle"
                );
                return Ok(false);
            }
        };

        if self.already_settled(&event.id).await {
            tracing::info!(event_id = %event.id, "Event already settled, skipping");
            return Ok(false);
        }

        let transfer = TransferRequest::settlement(&self.account, amount, &event.id);
        let issued = self
            .provider
            .create_transfer(session, &transfer)
            .await
            .map_err(|e| settlement_error(&event.id, e))?;

        tracing::info!(
            event_id = %event.id,
            transfer_id = %issued.id,
            transfer_amount = amount,
            external_id = %transfer.external_id,
            "Compensating transfer issued"
        );

        if let Some(store) = &self.processed {
            if let Err(e) = store.mark_processed(&event.id).await {
                tracing::warn!(event_id = %event.id, error = %e, "Failed to record settled event");
            }
        }

        Ok(true)
    }

    async fn already_settled(&self, event_id: &str) -> bool {
        let Some(store) = &self.processed else {
            return false;
        };

        match store.contains(event_id).await {
            Ok(seen) => seen,
            Err(e) => {
                tracing::warn!(event_id, error = %e, "Processed event lookup failed, settling anyway");
                false
            }
        }
    }
}

fn settlement_error(event_id: &str, err: ProviderError) -> SettlementError {
    if err.code.is_rejection() {
        SettlementError::TransferRejected {
            event_id: event_id.to_string(),
            message: err.to_string(),
        }
    } else {
        SettlementError::ProviderUnavailable {
            event_id: event_id.to_string(),
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{InMemoryProcessedEventStore, MockBankingProvider};
    use crate::domain::identity::{AccountType, Environment};
    use crate::domain::webhook::{InvoiceLog, Subscription};
    use k256::ecdsa::SigningKey;
    use rand::rngs::OsRng;

    fn session() -> Session {
        Session::new(
            Environment::Sandbox,
            "1",
            AccountType::Project,
            SigningKey::random(&mut OsRng),
        )
    }

    fn paid(id: &str, amount: i64, fee: i64) -> DecodedEvent {
        DecodedEvent::invoice(id, InvoiceLog::new("inv", InvoiceLogStatus::Paid, amount, fee))
    }

    fn reactor(mock: &MockBankingProvider) -> SettlementReactor {
        SettlementReactor::new(Arc::new(mock.clone()), SettlementAccount::default())
    }

    #[tokio::test]
    async fn paid_invoice_issues_net_transfer() {
        let mock = MockBankingProvider::new();

        let issued = reactor(&mock).react(&session(), &paid("evt-1", 1000, 20)).await.unwrap();

        assert!(issued);
        let transfers = mock.issued_transfers();
        assert_eq!(transfers.len(), 1);
        assert_eq!(transfers[0].amount, 980);
        assert_eq!(transfers[0].external_id, "settlement-evt-1");
        assert_eq!(transfers[0].bank_code, SettlementAccount::default().bank_code);
    }

    #[tokio::test]
    async fn unpaid_statuses_issue_nothing() {
        let mock = MockBankingProvider::new();
        let reactor = reactor(&mock);

        for status in ["created", "canceled", "expired", "pending"] {
            let event = DecodedEvent::invoice(
                "evt",
                InvoiceLog::new("inv", InvoiceLogStatus::from_wire(status), 1000, 20),
            );
            assert!(!reactor.react(&session(), &event).await.unwrap());
        }
        assert!(!mock.was_called("create_transfer"));
    }

    #[tokio::test]
    async fn other_subscriptions_issue_nothing() {
        let mock = MockBankingProvider::new();
        let event = DecodedEvent::other("evt", Subscription::Deposit, serde_json::json!({}));

        assert!(!reactor(&mock).react(&session(), &event).await.unwrap());
        assert!(!mock.was_called("create_transfer"));
    }

    #[tokio::test]
    async fn zero_net_amount_issues_nothing() {
        let mock = MockBankingProvider::new();

        assert!(!reactor(&mock).react(&session(), &paid("evt", 20, 20)).await.unwrap());
        assert!(!mock.was_called("create_transfer"));
    }

    #[tokio::test]
    async fn rejection_surfaces_as_transfer_rejected() {
        let mock = MockBankingProvider::new();
        mock.set_method_error("create_transfer", ProviderError::invalid_signature("bad"));

        let err = reactor(&mock).react(&session(), &paid("evt-2", 1000, 20)).await.unwrap_err();

        assert!(matches!(err, SettlementError::TransferRejected { .. }));
        assert_eq!(err.event_id(), "evt-2");
    }

    #[tokio::test]
    async fn outage_surfaces_as_provider_unavailable() {
        let mock = MockBankingProvider::new();
        mock.set_method_error("create_transfer", ProviderError::service_unavailable("503"));

        let err = reactor(&mock).react(&session(), &paid("evt-3", 1000, 20)).await.unwrap_err();

        assert!(matches!(err, SettlementError::ProviderUnavailable { .. }));
    }

    #[tokio::test]
    async fn redelivery_settles_again_without_store() {
        let mock = MockBankingProvider::new();
        let reactor = reactor(&mock);
        let event = paid("evt-4", 1000, 20);

        assert!(reactor.react(&session(), &event).await.unwrap());
        assert!(reactor.react(&session(), &event).await.unwrap());
        assert_eq!(mock.issued_transfers().len(), 2);
    }

    #[tokio::test]
    async fn deduplication_skips_redelivery() {
        let mock = MockBankingProvider::new();
        let reactor = reactor(&mock).with_deduplication(Arc::new(InMemoryProcessedEventStore::new()));
        let event = paid("evt-5", 1000, 20);

        assert!(reactor.react(&session(), &event).await.unwrap());
        assert!(!reactor.react(&session(), &event).await.unwrap());
        assert_eq!(mock.issued_transfers().len(), 1);
    }

    #[tokio::test]
    async fn failed_transfer_is_not_recorded_as_settled() {
        let mock = MockBankingProvider::new();
        let reactor = reactor(&mock).with_deduplication(Arc::new(InMemoryProcessedEventStore::new()));
        let event = paid("evt-6", 1000, 20);

        mock.set_error(ProviderError::network("timeout"));
        assert!(reactor.react(&session(), &event).await.is_err());
        assert!(reactor.react(&session(), &event).await.unwrap());
    }
}
