//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::sync::Once;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use k256::ecdsa::signature::Signer;
use k256::ecdsa::{Signature, SigningKey};
use k256::pkcs8::{EncodePublicKey, LineEnding};
use k256::PublicKey;
use rand::rngs::OsRng;
use serde_json::json;

use webhook_settlement::domain::identity::{AccountType, Environment, Session};
use webhook_settlement::domain::webhook::RawEventEnvelope;

static INIT: Once = Once::new();

/// Installs a test-writer subscriber once per test binary.
pub fn init_test_logging() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("webhook_settlement=debug")
            .with_test_writer()
            .try_init();
    });
}

/// Provider-side key used to sign webhook bodies.
pub struct ProviderKey {
    key: SigningKey,
}

impl ProviderKey {
    pub fn random() -> Self {
        Self {
            key: SigningKey::random(&mut OsRng),
        }
    }

    pub fn public_pem(&self) -> String {
        PublicKey::from(self.key.verifying_key())
            .to_public_key_pem(LineEnding::LF)
            .unwrap()
    }

    pub fn sign(&self, body: &[u8]) -> String {
        let signature: Signature = self.key.sign(body);
        BASE64.encode(signature.to_der().as_bytes())
    }

    pub fn envelope(&self, body: Vec<u8>) -> RawEventEnvelope {
        let signature = self.sign(&body);
        RawEventEnvelope::new(body, signature)
    }
}

pub fn session() -> Session {
    Session::new(
        Environment::Sandbox,
        "5656565656565656",
        AccountType::Project,
        SigningKey::random(&mut OsRng),
    )
}

/// Invoice event body whose log transition is `status`.
pub fn invoice_event(id: &str, status: &str, amount: i64, fee: i64) -> Vec<u8> {
    serde_json::to_vec(&json!({
        "event": {
            "id": id,
            "subscription": "invoice",
            "created": "2024-01-31T18:02:43.571419+00:00",
            "log": {
                "id": format!("log-{}", id),
                "type": status,
                "created": "2024-01-31T18:02:43.571419+00:00",
                "errors": [],
                "invoice": {
                    "id": format!("inv-{}", id),
                    "amount": amount,
                    "fee": fee,
                    "status": status,
                    "name": "Iron Bank S.A.",
                    "taxId": "012.345.678-90"
                }
            }
        }
    }))
    .unwrap()
}

/// Event body for a non-invoice subscription.
pub fn transfer_event(id: &str) -> Vec<u8> {
    serde_json::to_vec(&json!({
        "event": {
            "id": id,
            "subscription": "transfer",
            "created": "2024-01-31T18:02:43.571419+00:00",
            "log": {"id": "log-t", "type": "success", "transfer": {"id": "t-1", "amount": 10}}
        }
    }))
    .unwrap()
}
