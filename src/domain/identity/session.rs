//! Authenticated session handle.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use k256::ecdsa::signature::Signer;
use k256::ecdsa::{Signature, SigningKey, VerifyingKey};

use super::{AccountType, Environment};

/// An identity able to issue signed requests to the provider.
///
/// Immutable once built. Cloning is cheap enough to hand one copy to each
/// loop; two sessions for different accounts can coexist in one process
/// because nothing about the signing identity is stored globally.
#[derive(Clone)]
pub struct Session {
    environment: Environment,
    identity: String,
    account_type: AccountType,
    signing_key: SigningKey,
}

impl Session {
    pub fn new(
        environment: Environment,
        identity: impl Into<String>,
        account_type: AccountType,
        signing_key: SigningKey,
    ) -> Self {
        Self {
            environment,
            identity: identity.into(),
            account_type,
            signing_key,
        }
    }

    pub fn environment(&self) -> Environment {
        self.environment
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }

    pub fn account_type(&self) -> AccountType {
        self.account_type
    }

    /// Value of the `Access-Id` header, e.g. `project/5656565656565656`.
    pub fn access_id(&self) -> String {
        format!("{}/{}", self.account_type.as_str(), self.identity)
    }

    /// Public half of the signing key.
    pub fn verifying_key(&self) -> &VerifyingKey {
        self.signing_key.verifying_key()
    }

    /// Signs `message` (ECDSA/SHA-256), returning the base64 DER signature.
    pub fn sign(&self, message: &[u8]) -> String {
        let signature: Signature = self.signing_key.sign(message);
        BASE64.encode(signature.to_der().as_bytes())
    }

    /// Builds the `Access-Signature` value for a request.
    pub fn sign_request(&self, access_time: &str, body: &str) -> String {
        let message = format!("{}:{}:{}", self.access_id(), access_time, body);
        self.sign(message.as_bytes())
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("environment", &self.environment)
            .field("identity", &self.identity)
            .field("account_type", &self.account_type)
            .field("signing_key", &"[REDACTED]")
            .finish()
    }
}
