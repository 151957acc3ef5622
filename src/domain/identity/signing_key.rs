//! secp256k1 key material in PEM form.

use k256::ecdsa::SigningKey;
use k256::pkcs8::{DecodePrivateKey, EncodePublicKey, LineEnding};
use k256::SecretKey;
use rand::rngs::OsRng;

use super::errors::{AuthFailureKind, AuthenticationError};
use crate::domain::foundation::ConfigurationError;

/// Freshly generated key pair, both halves PEM encoded.
#[derive(Clone)]
pub struct KeyPair {
    /// SEC1 `EC PRIVATE KEY` document.
    pub private_pem: String,
    /// SPKI `PUBLIC KEY` document, the half registered with the provider.
    pub public_pem: String,
}

impl std::fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyPair")
            .field("private_pem", &"[REDACTED]")
            .field("public_pem", &self.public_pem)
            .finish()
    }
}

/// Parses a secp256k1 private key.
///
/// Accepts SEC1 (`EC PRIVATE KEY`) and PKCS#8 (`PRIVATE KEY`) documents.
/// Leading `EC PARAMETERS` blocks and indentation, as produced by the
/// provider's key tooling, are tolerated.
pub fn parse_private_key(pem: &str) -> Result<SigningKey, ConfigurationError> {
    if let Some(block) = extract_block(pem, "EC PRIVATE KEY") {
        return SecretKey::from_sec1_pem(&block)
            .map(SigningKey::from)
            .map_err(|e| ConfigurationError::InvalidPrivateKey(e.to_string()));
    }

    if let Some(block) = extract_block(pem, "PRIVATE KEY") {
        return SecretKey::from_pkcs8_pem(&block)
            .map(SigningKey::from)
            .map_err(|e| ConfigurationError::InvalidPrivateKey(e.to_string()));
    }

    Err(ConfigurationError::InvalidPrivateKey(
        "expected a secp256k1 private key in PEM format".to_string(),
    ))
}

/// Generates a new secp256k1 key pair.
pub fn generate_key_pair() -> Result<KeyPair, AuthenticationError> {
    let secret = SecretKey::random(&mut OsRng);

    let private_pem = secret
        .to_sec1_pem(LineEnding::LF)
        .map_err(|e| AuthenticationError::new(AuthFailureKind::Unknown, e.to_string()))?;
    let public_pem = secret
        .public_key()
        .to_public_key_pem(LineEnding::LF)
        .map_err(|e| AuthenticationError::new(AuthFailureKind::Unknown, e.to_string()))?;

    Ok(KeyPair {
        private_pem: private_pem.to_string(),
        public_pem,
    })
}

/// Pulls one PEM block out of `text`, trimming each line.
fn extract_block(text: &str, label: &str) -> Option<String> {
    let begin = format!("-----BEGIN {}-----", label);
    let end = format!("-----END {}-----", label);

    let mut lines: Vec<&str> = Vec::new();
    let mut inside = false;

    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if !inside {
            if line == begin {
                inside = true;
                lines.push(line);
            }
            continue;
        }

        lines.push(line);
        if line == end {
            let mut block = lines.join("\n");
            block.push('\n');
            return Some(block);
        }
    }

    None
}
