//! PollLoop - Fixed-cadence fetch, verify, react cycle.
//!
//! ```text
//! Idle -> Polling -> Verifying -> Reacting -> (sleep) -> Polling ...
//!            |           |            |
//!            +-----------+------------+--> report error, sleep, Polling
//! ```
//!
//! The loop ends when `elapsed >= poll_budget` or a shutdown is requested.
//! Every cycle-scoped failure is logged and counted; none ends the loop.
//! The inter-cycle wait is a fixed sleep after the cycle finishes, so the
//! real spacing between fetches is `poll_interval + cycle time`.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use url::Url;

use super::reactor::SettlementReactor;
use super::shutdown::{ShutdownSignal, Termination};
use super::verifier::EventVerifier;
use crate::domain::foundation::ConfigurationError;
use crate::domain::identity::Session;
use crate::domain::settlement::SettlementError;
use crate::domain::webhook::VerificationError;
use crate::ports::{FetchError, WebhookSource};

/// Webhook endpoint and polling cadence. Validated once at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookConfig {
    endpoint_url: Url,
    poll_interval: Duration,
    poll_budget: Duration,
}

impl WebhookConfig {
    /// Requires a URL with both a scheme and a host, and non-zero durations.
    pub fn new(
        endpoint_url: &str,
        poll_interval: Duration,
        poll_budget: Duration,
    ) -> Result<Self, ConfigurationError> {
        let endpoint_url = parse_endpoint(endpoint_url)?;

        if poll_interval.is_zero() {
            return Err(ConfigurationError::ZeroDuration("poll_interval"));
        }
        if poll_budget.is_zero() {
            return Err(ConfigurationError::ZeroDuration("poll_budget"));
        }

        Ok(Self {
            endpoint_url,
            poll_interval,
            poll_budget,
        })
    }

    pub fn endpoint_url(&self) -> &Url {
        &self.endpoint_url
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    pub fn poll_budget(&self) -> Duration {
        self.poll_budget
    }
}

/// Parses a webhook URL, requiring a scheme and a host.
pub fn parse_endpoint(value: &str) -> Result<Url, ConfigurationError> {
    let invalid = || ConfigurationError::InvalidWebhookUrl(value.to_string());

    let url = Url::parse(value.trim()).map_err(|_| invalid())?;
    match url.host_str() {
        Some(host) if !host.is_empty() => Ok(url),
        _ => Err(invalid()),
    }
}

/// Step of a poll cycle, carried on log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollPhase {
    Polling,
    Verifying,
    Reacting,
}

impl fmt::Display for PollPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PollPhase::Polling => "polling",
            PollPhase::Verifying => "verifying",
            PollPhase::Reacting => "reacting",
        };
        f.write_str(s)
    }
}

/// What one cycle did.
#[derive(Debug, Clone, PartialEq)]
pub enum CycleOutcome {
    /// Endpoint had nothing pending.
    Idle,
    /// Transfer issued for the event.
    Settled { event_id: String },
    /// Event verified but no transfer was due.
    Ignored { event_id: String },
    FetchFailed(FetchError),
    VerificationFailed(VerificationError),
    ReactionFailed(SettlementError),
}

/// Counters for one `run`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollReport {
    pub cycles: u64,
    pub transfers_issued: u64,
    pub ignored_events: u64,
    pub idle_polls: u64,
    pub fetch_failures: u64,
    pub verification_failures: u64,
    pub reaction_failures: u64,
    pub terminated_by: Termination,
}

impl PollReport {
    fn new() -> Self {
        Self {
            cycles: 0,
            transfers_issued: 0,
            ignored_events: 0,
            idle_polls: 0,
            fetch_failures: 0,
            verification_failures: 0,
            reaction_failures: 0,
            terminated_by: Termination::BudgetExhausted,
        }
    }

    fn record(&mut self, outcome: &CycleOutcome) {
        match outcome {
            CycleOutcome::Idle => self.idle_polls += 1,
            CycleOutcome::Settled { .. } => self.transfers_issued += 1,
            CycleOutcome::Ignored { .. } => self.ignored_events += 1,
            CycleOutcome::FetchFailed(_) => self.fetch_failures += 1,
            CycleOutcome::VerificationFailed(_) => self.verification_failures += 1,
            CycleOutcome::ReactionFailed(_) => self.reaction_failures += 1,
        }
    }
}

/// Drives fetch, verify and react on a fixed interval for a bounded time.
pub struct PollLoop {
    source: Arc<dyn WebhookSource>,
    verifier: Arc<EventVerifier>,
    reactor: Arc<SettlementReactor>,
    config: WebhookConfig,
}

impl PollLoop {
    pub fn new(
        source: Arc<dyn WebhookSource>,
        verifier: Arc<EventVerifier>,
        reactor: Arc<SettlementReactor>,
        config: WebhookConfig,
    ) -> Self {
        Self {
            source,
            verifier,
            reactor,
            config,
        }
    }

    pub fn config(&self) -> &WebhookConfig {
        &self.config
    }

    /// Runs cycles until the budget is spent or shutdown is requested.
    pub async fn run(&self, session: &Session, mut shutdown: ShutdownSignal) -> PollReport {
        let start = Instant::now();
        let mut report = PollReport::new();

        tracing::info!(
            endpoint = %self.config.endpoint_url,
            interval_secs = self.config.poll_interval.as_secs_f64(),
            budget_secs = self.config.poll_budget.as_secs_f64(),
            "Poll loop started"
        );

        loop {
            if shutdown.is_requested() {
                report.terminated_by = Termination::ShutdownRequested;
                break;
            }
            if start.elapsed() >= self.config.poll_budget {
                report.terminated_by = Termination::BudgetExhausted;
                break;
            }

            report.cycles += 1;
            let outcome = self.poll_once(session, report.cycles).await;
            report.record(&outcome);

            if shutdown.sleep(self.config.poll_interval).await {
                report.terminated_by = Termination::ShutdownRequested;
                break;
            }
        }

        tracing::info!(
            cycles = report.cycles,
            transfers_issued = report.transfers_issued,
            fetch_failures = report.fetch_failures,
            verification_failures = report.verification_failures,
            reaction_failures = report.reaction_failures,
            terminated_by = ?report.terminated_by,
            "Poll loop terminated"
        );

        report
    }

    /// Runs a single cycle. Never fails: errors become the outcome.
    pub async fn poll_once(&self, session: &Session, cycle: u64) -> CycleOutcome {
        let envelope = match self.source.fetch().await {
            Ok(Some(envelope)) => envelope,
            Ok(None) => {
                tracing::debug!(cycle, phase = %PollPhase::Polling, "No pending event");
                return CycleOutcome::Idle;
            }
            Err(e) => {
                tracing::warn!(cycle, phase = %PollPhase::Polling, error = %e, "Webhook fetch failed");
                return CycleOutcome::FetchFailed(e);
            }
        };

        let event = match self
            .verifier
            .verify_and_decode(&envelope.body, &envelope.signature, session)
            .await
        {
            Ok(event) => event,
            Err(e) => {
                tracing::warn!(
                    cycle,
                    phase = %PollPhase::Verifying,
                    error = %e,
                    "Event rejected"
                );
                return CycleOutcome::VerificationFailed(e);
            }
        };

        tracing::debug!(
            cycle,
            event_id = %event.id,
            subscription = %event.subscription,
            "Event verified"
        );

        if !event.is_invoice() {
            return CycleOutcome::Ignored { event_id: event.id };
        }

        match self.reactor.react(session, &event).await {
            Ok(true) => CycleOutcome::Settled { event_id: event.id },
            Ok(false) => CycleOutcome::Ignored { event_id: event.id },
            Err(e) => {
                tracing::error!(
                    cycle,
                    phase = %PollPhase::Reacting,
                    event_id = %event.id,
                    error = %e,
                    "Settlement failed"
                );
                CycleOutcome::ReactionFailed(e)
            }
        }
    }
}
