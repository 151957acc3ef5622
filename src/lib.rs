//! Webhook Settlement - Synthetic invoice traffic and signed-webhook settlement.
//!
//! Two independent loops drive a banking provider sandbox: one issues
//! randomized invoice batches, the other polls a webhook endpoint, verifies
//! each signed event and settles paid invoices with a compensating transfer.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
