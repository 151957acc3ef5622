//! Invoice module - Synthetic invoice traffic.
//!
//! - `errors` - Per-invoice issuance failures
//! - `request` - Invoice payload as issued to the provider
//! - `cpf` - Brazilian individual tax id generation and check digits
//! - `policy` - Randomized generation policy (required + optional fields)

mod cpf;
mod errors;
mod policy;
mod request;

pub use cpf::{generate_cpf, is_valid_cpf};
pub use errors::IssuanceError;
pub use policy::{InvoicePolicy, OptionalField, NAME_ROSTER};
pub use request::{Description, Discount, InvoiceRequest, InvoiceRule};
