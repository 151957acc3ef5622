//! Identity module - Who signs requests against the provider.
//!
//! A [`Session`] bundles the environment, the identity, the account type and
//! the parsed signing key. It is built once by the authenticator and handed
//! explicitly to every component that talks to the provider; there is no
//! process-wide "current user".

mod account_type;
mod environment;
mod errors;
mod session;
mod signing_key;

pub use account_type::AccountType;
pub use environment::Environment;
pub use errors::{AuthFailureKind, AuthenticationError};
pub use session::Session;
pub use signing_key::{generate_key_pair, parse_private_key, KeyPair};
