//! Scripted webhook source for testing.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::webhook::RawEventEnvelope;
use crate::ports::{FetchError, WebhookSource};

type FetchResult = Result<Option<RawEventEnvelope>, FetchError>;

/// Replays queued fetch results in order; returns `Ok(None)` once exhausted.
#[derive(Default)]
pub struct ScriptedWebhookSource {
    inner: Arc<Mutex<ScriptState>>,
}

#[derive(Default)]
struct ScriptState {
    script: VecDeque<FetchResult>,
    fetches: usize,
}

impl ScriptedWebhookSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an event envelope.
    pub fn push_event(&self, envelope: RawEventEnvelope) {
        self.state().script.push_back(Ok(Some(envelope)));
    }

    /// Queue an empty poll.
    pub fn push_empty(&self) {
        self.state().script.push_back(Ok(None));
    }

    /// Queue a fetch failure.
    pub fn push_error(&self, error: FetchError) {
        self.state().script.push_back(Err(error));
    }

    /// Number of `fetch` calls so far.
    pub fn fetch_count(&self) -> usize {
        self.state().fetches
    }

    fn state(&self) -> MutexGuard<'_, ScriptState> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Clone for ScriptedWebhookSource {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

#[async_trait]
impl WebhookSource for ScriptedWebhookSource {
    async fn fetch(&self) -> FetchResult {
        let mut state = self.state();
        state.fetches += 1;
        state.script.pop_front().unwrap_or(Ok(None))
    }
}
