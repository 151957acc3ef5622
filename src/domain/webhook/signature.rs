//! Detached digital signature checks.
//!
//! The provider signs the exact raw body with its secp256k1 key (ECDSA over
//! SHA-256) and sends the base64 DER signature in the `Digital-Signature`
//! header.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use k256::ecdsa::signature::Verifier;
use k256::ecdsa::{Signature, VerifyingKey};
use k256::pkcs8::DecodePublicKey;
use k256::PublicKey;

use super::errors::VerificationError;

/// Parses the provider's SPKI public key document.
pub fn parse_public_key(pem: &str) -> Result<VerifyingKey, VerificationError> {
    PublicKey::from_public_key_pem(pem.trim())
        .map(VerifyingKey::from)
        .map_err(|e| VerificationError::PublicKeyUnavailable(e.to_string()))
}

/// Checks `signature` over `body` under `key`.
///
/// Undecodable signatures are treated the same as mismatching ones. High-S
/// signatures are normalised first since the provider does not enforce low-S.
pub fn verify_digital_signature(
    key: &VerifyingKey,
    body: &[u8],
    signature: &str,
) -> Result<(), VerificationError> {
    let der = BASE64
        .decode(signature.trim())
        .map_err(|_| VerificationError::InvalidSignature)?;
    let signature =
        Signature::from_der(&der).map_err(|_| VerificationError::InvalidSignature)?;
    let signature = signature.normalize_s().unwrap_or(signature);

    key.verify(body, &signature)
        .map_err(|_| VerificationError::InvalidSignature)
}

/// Signs a body the way the provider does, for test fixtures.
#[cfg(test)]
pub(crate) fn sign_body(key: &k256::ecdsa::SigningKey, body: &[u8]) -> String {
    use k256::ecdsa::signature::Signer;

    let signature: Signature = key.sign(body);
    BASE64.encode(signature.to_der().as_bytes())
}

/// SPKI PEM of a signing key's public half, for test fixtures.
#[cfg(test)]
pub(crate) fn public_key_pem(key: &k256::ecdsa::SigningKey) -> String {
    use k256::pkcs8::{EncodePublicKey, LineEnding};

    PublicKey::from(key.verifying_key())
        .to_public_key_pem(LineEnding::LF)
        .unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;
    use k256::ecdsa::SigningKey;
    use rand::rngs::OsRng;

    const BODY: &[u8] = br#"{"event":{"id":"1","subscription":"invoice"}}"#;

    #[test]
    fn valid_signature_verifies() {
        let key = SigningKey::random(&mut OsRng);
        let verifying = parse_public_key(&public_key_pem(&key)).unwrap();
        let signature = sign_body(&key, BODY);

        assert!(verify_digital_signature(&verifying, BODY, &signature).is_ok());
    }

    #[test]
    fn tampered_body_fails() {
        let key = SigningKey::random(&mut OsRng);
        let verifying = parse_public_key(&public_key_pem(&key)).unwrap();
        let signature = sign_body(&key, BODY);
        let tampered = br#"{"event":{"id":"2","subscription":"invoice"}}"#;

        assert_eq!(
            verify_digital_signature(&verifying, tampered, &signature),
            Err(VerificationError::InvalidSignature)
        );
    }

    #[test]
    fn signature_from_other_key_fails() {
        let signer = SigningKey::random(&mut OsRng);
        let other = SigningKey::random(&mut OsRng);
        let verifying = parse_public_key(&public_key_pem(&other)).unwrap();

        assert_eq!(
            verify_digital_signature(&verifying, BODY, &sign_body(&signer, BODY)),
            Err(VerificationError::InvalidSignature)
        );
    }

    #[test]
    fn garbage_signature_is_invalid_signature() {
        let key = SigningKey::random(&mut OsRng);
        let verifying = parse_public_key(&public_key_pem(&key)).unwrap();

        assert_eq!(
            verify_digital_signature(&verifying, BODY, "not base64 !!"),
            Err(VerificationError::InvalidSignature)
        );
        assert_eq!(
            verify_digital_signature(&verifying, BODY, "bm90IGRlcg=="),
            Err(VerificationError::InvalidSignature)
        );
    }

    #[test]
    fn unparseable_public_key_is_reported() {
        assert!(matches!(
            parse_public_key("-----BEGIN PUBLIC KEY-----\nAAAA\n-----END PUBLIC KEY-----"),
            Err(VerificationError::PublicKeyUnavailable(_))
        ));
    }
}
