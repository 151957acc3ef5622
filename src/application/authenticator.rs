//! Authenticator - Builds the signed session every other component uses.
//!
//! Construction validates all static parameters locally (environment,
//! account type, identity, key) and fails with `ConfigurationError` before
//! any network call. `authenticate` then proves the credentials against the
//! provider and hands back an explicit [`Session`].
//!
//! The session is the only signing state. Nothing is stored globally: when
//! both loops run in one process they share a clone of the same session,
//! and separate processes each authenticate on their own.

use std::path::Path;

use k256::ecdsa::SigningKey;
use secrecy::{ExposeSecret, SecretString};

use crate::domain::foundation::ConfigurationError;
use crate::domain::identity::{
    generate_key_pair, parse_private_key, AccountType, AuthFailureKind, AuthenticationError,
    Environment, KeyPair, Session,
};
use crate::ports::BankingProvider;

/// File name of the generated private key.
pub const PRIVATE_KEY_FILE: &str = "privateKey.pem";

/// File name of the generated public key.
pub const PUBLIC_KEY_FILE: &str = "publicKey.pem";

/// Validated credentials, ready to authenticate.
pub struct Authenticator {
    environment: Environment,
    identity: String,
    account_type: AccountType,
    signing_key: SigningKey,
}

impl Authenticator {
    /// Validates the credentials.
    ///
    /// `environment` and `account_type` are matched case-insensitively and
    /// normalised to lower case.
    pub fn new(
        environment: &str,
        identity: &str,
        private_key: &SecretString,
        account_type: &str,
    ) -> Result<Self, ConfigurationError> {
        let environment = Environment::parse(environment)?;
        let account_type = AccountType::parse(account_type)?;

        let identity = identity.trim();
        if identity.is_empty() {
            return Err(ConfigurationError::EmptyIdentity);
        }

        let signing_key = parse_private_key(private_key.expose_secret())?;

        Ok(Self {
            environment,
            identity: identity.to_string(),
            account_type,
            signing_key,
        })
    }

    pub fn environment(&self) -> Environment {
        self.environment
    }

    pub fn account_type(&self) -> AccountType {
        self.account_type
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }

    /// Proves the credentials with one signed probe and returns the session.
    ///
    /// Provider failures are folded into [`AuthenticationError`]; the
    /// transport error type never escapes.
    pub async fn authenticate(
        &self,
        provider: &dyn BankingProvider,
    ) -> Result<Session, AuthenticationError> {
        let session = Session::new(
            self.environment,
            self.identity.clone(),
            self.account_type,
            self.signing_key.clone(),
        );

        if let Err(err) = provider.probe(&session).await {
            let err = AuthenticationError::from(err);
            tracing::error!(
                access_id = %session.access_id(),
                environment = %self.environment,
                error = %err,
                "Authentication failed"
            );
            return Err(err);
        }

        tracing::info!(
            access_id = %session.access_id(),
            environment = %self.environment,
            "Authenticated"
        );

        Ok(session)
    }

    /// Generates a new key pair and writes it into `destination`.
    ///
    /// Writes `privateKey.pem` (SEC1) and `publicKey.pem` (SPKI), creating
    /// the directory if needed. No retry.
    pub async fn create_keys(destination: &Path) -> Result<KeyPair, AuthenticationError> {
        let pair = generate_key_pair()?;

        tokio::fs::create_dir_all(destination)
            .await
            .map_err(|e| io_error(destination, e))?;

        let private_path = destination.join(PRIVATE_KEY_FILE);
        tokio::fs::write(&private_path, pair.private_pem.as_bytes())
            .await
            .map_err(|e| io_error(&private_path, e))?;

        let public_path = destination.join(PUBLIC_KEY_FILE);
        tokio::fs::write(&public_path, pair.public_pem.as_bytes())
            .await
            .map_err(|e| io_error(&public_path, e))?;

        tracing::info!(destination = %destination.display(), "Key pair created");

        Ok(pair)
    }
}

impl std::fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Authenticator")
            .field("environment", &self.environment)
            .field("identity", &self.identity)
            .field("account_type", &self.account_type)
            .field("signing_key", &"[REDACTED]")
            .finish()
    }
}

fn io_error(path: &Path, err: std::io::Error) -> AuthenticationError {
    AuthenticationError::new(
        AuthFailureKind::Unknown,
        format!("{}: {}", path.display(), err),
    )
}
