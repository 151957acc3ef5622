//! Foundation module - Shared domain primitives.
//!
//! Contains the static-configuration error type shared by every component
//! that validates its parameters at construction time.

mod errors;

pub use errors::ConfigurationError;
