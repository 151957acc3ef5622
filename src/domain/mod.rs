//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (errors)
//! - `identity` - Environment, account type, key material and the signed session
//! - `webhook` - Event envelope, decoded event model and signature primitives
//! - `settlement` - Settlement decision rule and compensating transfer
//! - `invoice` - Invoice payload and randomized generation policy

pub mod foundation;
pub mod identity;
pub mod invoice;
pub mod settlement;
pub mod webhook;
