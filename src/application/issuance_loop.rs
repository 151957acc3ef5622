//! IssuanceLoop - Randomized invoice batches on a fixed repetition.
//!
//! Each outer cycle draws a batch size in `[min, max]`, issues that many
//! invoices `repetition / batch_size` apart, then sleeps out whatever is left
//! of the repetition interval. A failed invoice is logged and counted; the
//! batch and the loop carry on.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::time::Instant;

use super::shutdown::{ShutdownSignal, Termination};
use crate::domain::foundation::ConfigurationError;
use crate::domain::identity::Session;
use crate::domain::invoice::{InvoicePolicy, InvoiceRequest, IssuanceError};
use crate::ports::{BankingProvider, IssuedInvoice};

/// Batch size range and timing of the issuance loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IssuanceSchedule {
    quantity_min: u32,
    quantity_max: u32,
    repetition: Duration,
    duration: Duration,
}

impl IssuanceSchedule {
    pub fn new(
        quantity_min: u32,
        quantity_max: u32,
        repetition: Duration,
        duration: Duration,
    ) -> Result<Self, ConfigurationError> {
        if quantity_min < 1 || quantity_min > quantity_max {
            return Err(ConfigurationError::InvalidQuantityInterval {
                min: quantity_min,
                max: quantity_max,
            });
        }
        if repetition.is_zero() {
            return Err(ConfigurationError::ZeroDuration("repetition_time"));
        }
        if duration.is_zero() {
            return Err(ConfigurationError::ZeroDuration("duration_time"));
        }

        Ok(Self {
            quantity_min,
            quantity_max,
            repetition,
            duration,
        })
    }

    pub fn quantity_interval(&self) -> (u32, u32) {
        (self.quantity_min, self.quantity_max)
    }

    pub fn repetition(&self) -> Duration {
        self.repetition
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Gap between two issuances in a batch of `batch_size`.
    pub fn spacing(&self, batch_size: u32) -> Duration {
        self.repetition / batch_size.max(1)
    }
}

/// Counters for one `run`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuanceReport {
    pub cycles: u64,
    pub invoices_issued: u64,
    pub issuance_failures: u64,
    pub terminated_by: Termination,
}

pub struct IssuanceLoop {
    provider: Arc<dyn BankingProvider>,
    policy: InvoicePolicy,
    schedule: IssuanceSchedule,
    rng: Mutex<StdRng>,
}

impl IssuanceLoop {
    pub fn new(
        provider: Arc<dyn BankingProvider>,
        policy: InvoicePolicy,
        schedule: IssuanceSchedule,
    ) -> Self {
        Self {
            provider,
            policy,
            schedule,
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Deterministic randomness, for tests and reproducible runs.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Mutex::new(StdRng::seed_from_u64(seed));
        self
    }

    pub fn schedule(&self) -> &IssuanceSchedule {
        &self.schedule
    }

    /// Runs outer cycles until the duration is spent or shutdown is requested.
    pub async fn run(&self, session: &Session, mut shutdown: ShutdownSignal) -> IssuanceReport {
        let start = Instant::now();
        let mut report = IssuanceReport {
            cycles: 0,
            invoices_issued: 0,
            issuance_failures: 0,
            terminated_by: Termination::BudgetExhausted,
        };

        tracing::info!(
            quantity_min = self.schedule.quantity_min,
            quantity_max = self.schedule.quantity_max,
            repetition_secs = self.schedule.repetition.as_secs_f64(),
            duration_secs = self.schedule.duration.as_secs_f64(),
            "Issuance loop started"
        );

        'outer: loop {
            if shutdown.is_requested() {
                report.terminated_by = Termination::ShutdownRequested;
                break;
            }
            if start.elapsed() >= self.schedule.duration {
                report.terminated_by = Termination::BudgetExhausted;
                break;
            }

            report.cycles += 1;
            let cycle_start = Instant::now();
            let batch_size = self.draw_batch_size();
            let spacing = self.schedule.spacing(batch_size);
            let batch_tag = format!("batch-{}", uuid::Uuid::new_v4());

            tracing::info!(
                cycle = report.cycles,
                batch_size,
                batch_tag = %batch_tag,
                "Issuing invoice batch"
            );

            for index in 0..batch_size {
                let invoice = self.next_invoice(&batch_tag);

                match self.issue(session, &invoice).await {
                    Ok(issued) => {
                        report.invoices_issued += 1;
                        tracing::debug!(
                            cycle = report.cycles,
                            invoice_id = %issued.id,
                            amount = invoice.amount,
                            optional_fields = invoice.optional_field_count(),
                            "Invoice issued"
                        );
                    }
                    Err(e) => {
                        report.issuance_failures += 1;
                        tracing::warn!(
                            cycle = report.cycles,
                            amount = e.amount(),
                            rejected = e.is_rejection(),
                            error = %e,
                            "Invoice issuance failed"
                        );
                    }
                }

                if index + 1 < batch_size && shutdown.sleep(spacing).await {
                    report.terminated_by = Termination::ShutdownRequested;
                    break 'outer;
                }
            }

            let remaining = self.schedule.repetition.saturating_sub(cycle_start.elapsed());
            if shutdown.sleep(remaining).await {
                report.terminated_by = Termination::ShutdownRequested;
                break;
            }
        }

        tracing::info!(
            cycles = report.cycles,
            invoices_issued = report.invoices_issued,
            issuance_failures = report.issuance_failures,
            terminated_by = ?report.terminated_by,
            "Issuance loop terminated"
        );

        report
    }

    /// Issues one invoice, classifying a provider failure.
    pub async fn issue(
        &self,
        session: &Session,
        invoice: &InvoiceRequest,
    ) -> Result<IssuedInvoice, IssuanceError> {
        self.provider
            .create_invoice(session, invoice)
            .await
            .map_err(|err| {
                let message = err.to_string();
                if err.code.is_rejection() {
                    IssuanceError::InvoiceRejected {
                        amount: invoice.amount,
                        message,
                    }
                } else {
                    IssuanceError::ProviderUnavailable {
                        amount: invoice.amount,
                        message,
                    }
                }
            })
    }

    fn draw_batch_size(&self) -> u32 {
        self.rng()
            .gen_range(self.schedule.quantity_min..=self.schedule.quantity_max)
    }

    fn next_invoice(&self, batch_tag: &str) -> InvoiceRequest {
        let mut rng = self.rng();
        self.policy.generate(&mut *rng, chrono::Utc::now(), batch_tag)
    }

    fn rng(&self) -> MutexGuard<'_, StdRng> {
        self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MockBankingProvider;
    use crate::domain::identity::{AccountType, Environment};
    use crate::domain::invoice::is_valid_cpf;
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

    fn issuance_loop(mock: &MockBankingProvider, min: u32, max: u32) -> IssuanceLoop {
        IssuanceLoop::new(
            Arc::new(mock.clone()),
            InvoicePolicy::new(100, 10_000).unwrap(),
            IssuanceSchedule::new(min, max, Duration::from_secs(60), Duration::from_secs(180))
                .unwrap(),
        )
        .with_seed(17)
    }

    // ════════════════════════════════════════════════════════════════════════
    // Schedule
    // ════════════════════════════════════════════════════════════════════════

    #[test]
    fn schedule_rejects_inverted_interval() {
        assert_eq!(
            IssuanceSchedule::new(5, 2, Duration::from_secs(1), Duration::from_secs(1)),
            Err(ConfigurationError::InvalidQuantityInterval { min: 5, max: 2 })
        );
    }

    #[test]
    fn schedule_rejects_zero_minimum() {
        assert!(IssuanceSchedule::new(0, 2, Duration::from_secs(1), Duration::from_secs(1)).is_err());
    }

    #[test]
    fn schedule_rejects_zero_durations() {
        assert_eq!(
            IssuanceSchedule::new(1, 1, Duration::ZERO, Duration::from_secs(1)),
            Err(ConfigurationError::ZeroDuration("repetition_time"))
        );
        assert_eq!(
            IssuanceSchedule::new(1, 1, Duration::from_secs(1), Duration::ZERO),
            Err(ConfigurationError::ZeroDuration("duration_time"))
        );
    }

    #[test]
    fn spacing_divides_repetition() {
        let schedule =
            IssuanceSchedule::new(1, 4, Duration::from_secs(60), Duration::from_secs(60)).unwrap();
        assert_eq!(schedule.spacing(4), Duration::from_secs(15));
        assert_eq!(schedule.spacing(1), Duration::from_secs(60));
    }

    // ════════════════════════════════════════════════════════════════════════
    // Run
    // ════════════════════════════════════════════════════════════════════════

    #[tokio::test(start_paused = true)]
    async fn single_invoice_per_cycle() {
        let mock = MockBankingProvider::new();

        let report = issuance_loop(&mock, 1, 1).run(&session(), ShutdownSignal::never()).await;

        assert_eq!(report.cycles, 3);
        assert_eq!(report.invoices_issued, 3);
        assert_eq!(report.terminated_by, Termination::BudgetExhausted);
        for invoice in mock.issued_invoices() {
            assert!(invoice.amount >= 100);
            assert!(is_valid_cpf(&invoice.tax_id));
            assert!(!invoice.name.is_empty());
        }
    }

    #[tokio::test(start_paused = true)]
    async fn batch_sizes_stay_in_range() {
        let mock = MockBankingProvider::new();

        let report = issuance_loop(&mock, 2, 4).run(&session(), ShutdownSignal::never()).await;

        assert_eq!(report.cycles, 3);
        assert!((6..=12).contains(&report.invoices_issued));
    }

    #[tokio::test(start_paused = true)]
    async fn invoices_are_spaced_within_cycle() {
        let mock = MockBankingProvider::new();
        let lp = IssuanceLoop::new(
            Arc::new(mock.clone()),
            InvoicePolicy::new(100, 200).unwrap(),
            IssuanceSchedule::new(3, 3, Duration::from_secs(30), Duration::from_secs(30)).unwrap(),
        );
        let start = Instant::now();

        let report = lp.run(&session(), ShutdownSignal::never()).await;

        assert_eq!(report.cycles, 1);
        assert_eq!(report.invoices_issued, 3);
        assert!(start.elapsed() >= Duration::from_secs(30));
        assert!(start.elapsed() < Duration::from_secs(31));
    }

    #[tokio::test(start_paused = true)]
    async fn failed_invoice_does_not_abort_batch() {
        let mock = MockBankingProvider::new();
        mock.fail_invoice_call(2);

        let report = issuance_loop(&mock, 1, 1).run(&session(), ShutdownSignal::never()).await;

        assert_eq!(report.cycles, 3);
        assert_eq!(report.invoices_issued, 2);
        assert_eq!(report.issuance_failures, 1);
        assert_eq!(mock.call_count("create_invoice"), 3);
    }

    #[tokio::test]
    async fn issue_classifies_provider_failures() {
        let mock = MockBankingProvider::new();
        let lp = issuance_loop(&mock, 1, 1);
        let invoice = InvoiceRequest::new(500, "012.345.678-90", "Tony Stark");

        mock.set_method_error(
            "create_invoice",
            crate::ports::ProviderError::input_rejected("invalidTaxId"),
        );
        let rejected = lp.issue(&session(), &invoice).await.unwrap_err();
        assert!(rejected.is_rejection());
        assert_eq!(rejected.amount(), 500);

        mock.set_method_error(
            "create_invoice",
            crate::ports::ProviderError::service_unavailable("maintenance"),
        );
        let unavailable = lp.issue(&session(), &invoice).await.unwrap_err();
        assert!(matches!(
            unavailable,
            IssuanceError::ProviderUnavailable { amount: 500, .. }
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_interrupts_wait() {
        let mock = MockBankingProvider::new();
        let (tx, signal) = ShutdownSignal::channel();

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(90)).await;
            let _ = tx.send(true);
        });

        let report = issuance_loop(&mock, 1, 1).run(&session(), signal).await;

        assert_eq!(report.cycles, 2);
        assert_eq!(report.terminated_by, Termination::ShutdownRequested);
    }
}
