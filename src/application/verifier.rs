//! EventVerifier - Signature check and decoding in one step.
//!
//! The raw body is only parsed after its `Digital-Signature` verified under
//! the provider key for the session's environment. Keys are fetched lazily,
//! cached per environment, and refreshed once when a signature fails against
//! the cached key (provider key rotation).

use std::collections::HashMap;
use std::sync::Arc;

use k256::ecdsa::VerifyingKey;
use tokio::sync::RwLock;

use crate::domain::identity::{Environment, Session};
use crate::domain::webhook::{
    parse_public_key, verify_digital_signature, DecodedEvent, VerificationError,
};
use crate::ports::BankingProvider;

pub struct EventVerifier {
    provider: Arc<dyn BankingProvider>,
    keys: RwLock<HashMap<Environment, VerifyingKey>>,
}

impl EventVerifier {
    pub fn new(provider: Arc<dyn BankingProvider>) -> Self {
        Self {
            provider,
            keys: RwLock::new(HashMap::new()),
        }
    }

    /// Verifies `signature` over `raw_body`, then decodes the body.
    ///
    /// Fails with `InvalidSignature` on mismatch (after one key refresh, or
    /// when that refresh fails) and with `MalformedEvent` when a correctly
    /// signed body has the wrong shape. `PublicKeyUnavailable` only occurs
    /// when no key was cached for the environment yet.
    pub async fn verify_and_decode(
        &self,
        raw_body: &[u8],
        signature: &str,
        session: &Session,
    ) -> Result<DecodedEvent, VerificationError> {
        let environment = session.environment();
        let cached = self.keys.read().await.get(&environment).cloned();

        match cached {
            Some(key) => {
                if let Err(VerificationError::InvalidSignature) =
                    verify_digital_signature(&key, raw_body, signature)
                {
                    tracing::debug!(
                        environment = %environment,
                        "Signature mismatch with cached key, refreshing provider key"
                    );
                    let key = match self.refresh_key(session).await {
                        Ok(key) => key,
                        Err(e) => {
                            // The body already failed under a known key.
                            tracing::warn!(
                                environment = %environment,
                                error = %e,
                                "Provider key refresh failed, rejecting event"
                            );
                            return Err(VerificationError::InvalidSignature);
                        }
                    };
                    verify_digital_signature(&key, raw_body, signature)?;
                }
            }
            None => {
                let key = self.refresh_key(session).await?;
                verify_digital_signature(&key, raw_body, signature)?;
            }
        }

        DecodedEvent::decode_verified(raw_body)
    }

    /// Drops every cached key.
    pub async fn clear_cache(&self) {
        self.keys.write().await.clear();
    }

    async fn refresh_key(&self, session: &Session) -> Result<VerifyingKey, VerificationError> {
        let pem = self
            .provider
            .fetch_public_key(session)
            .await
            .map_err(|e| VerificationError::PublicKeyUnavailable(e.to_string()))?;
        let key = parse_public_key(&pem)?;

        self.keys
            .write()
            .await
            .insert(session.environment(), key.clone());

        Ok(key)
    }
}
