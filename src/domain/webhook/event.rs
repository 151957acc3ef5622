//! Webhook event types.
//!
//! Only the fields the settlement path needs are captured; everything else
//! in the provider's event schema is ignored.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::errors::VerificationError;

/// Header carrying the detached signature of the body.
pub const SIGNATURE_HEADER: &str = "Digital-Signature";

/// One poll's worth of raw webhook data. Consumed by the verifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEventEnvelope {
    pub body: Vec<u8>,
    pub signature: String,
}

impl RawEventEnvelope {
    pub fn new(body: impl Into<Vec<u8>>, signature: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            signature: signature.into(),
        }
    }
}

/// Event kind, as named by the provider's `subscription` field.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Subscription {
    Invoice,
    Transfer,
    Boleto,
    BoletoPayment,
    Deposit,
    BrcodePayment,
    UtilityPayment,
    TaxPayment,
    /// Subscription this crate does not know about yet.
    Other(String),
}

impl Subscription {
    pub fn from_wire(value: &str) -> Self {
        match value {
            "invoice" => Self::Invoice,
            "transfer" => Self::Transfer,
            "boleto" => Self::Boleto,
            "boleto-payment" => Self::BoletoPayment,
            "deposit" => Self::Deposit,
            "brcode-payment" => Self::BrcodePayment,
            "utility-payment" => Self::UtilityPayment,
            "tax-payment" => Self::TaxPayment,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Invoice => "invoice",
            Self::Transfer => "transfer",
            Self::Boleto => "boleto",
            Self::BoletoPayment => "boleto-payment",
            Self::Deposit => "deposit",
            Self::BrcodePayment => "brcode-payment",
            Self::UtilityPayment => "utility-payment",
            Self::TaxPayment => "tax-payment",
            Self::Other(name) => name,
        }
    }
}

impl fmt::Display for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Invoice log type, i.e. the state transition that produced the event.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InvoiceLogStatus {
    Created,
    Paid,
    Credited,
    Canceled,
    Overdue,
    Expired,
    Updated,
    Voided,
    Reversed,
    /// A value the provider sent that is not in the list above.
    Unrecognized(String),
}

impl InvoiceLogStatus {
    pub fn from_wire(value: &str) -> Self {
        match value {
            "created" => Self::Created,
            "paid" => Self::Paid,
            "credited" => Self::Credited,
            "canceled" => Self::Canceled,
            "overdue" => Self::Overdue,
            "expired" => Self::Expired,
            "updated" => Self::Updated,
            "voided" => Self::Voided,
            "reversed" => Self::Reversed,
            other => Self::Unrecognized(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Created => "created",
            Self::Paid => "paid",
            Self::Credited => "credited",
            Self::Canceled => "canceled",
            Self::Overdue => "overdue",
            Self::Expired => "expired",
            Self::Updated => "updated",
            Self::Voided => "voided",
            Self::Reversed => "reversed",
            Self::Unrecognized(value) => value,
        }
    }

    pub fn is_paid(&self) -> bool {
        matches!(self, Self::Paid)
    }
}

/// Invoice log carried by an `invoice` subscription event.
///
/// Amounts are integers in minor currency units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceLog {
    pub log_id: String,
    pub invoice_id: String,
    pub status: InvoiceLogStatus,
    pub amount: i64,
    pub fee: i64,
}

impl InvoiceLog {
    pub fn new(
        invoice_id: impl Into<String>,
        status: InvoiceLogStatus,
        amount: i64,
        fee: i64,
    ) -> Self {
        let invoice_id = invoice_id.into();
        Self {
            log_id: format!("{}-log", invoice_id),
            invoice_id,
            status,
            amount,
            fee,
        }
    }
}

impl fmt::Display for InvoiceLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invoice {} {} (amount {}, fee {})",
            self.invoice_id,
            self.status.as_str(),
            self.amount,
            self.fee
        )
    }
}

/// Log section of an event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum EventLog {
    Invoice(InvoiceLog),
    /// Logs of subscriptions not acted upon, kept verbatim.
    Other(serde_json::Value),
}

/// A verified, parsed webhook notification. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecodedEvent {
    pub id: String,
    pub subscription: Subscription,
    pub created: Option<String>,
    pub log: EventLog,
}

impl DecodedEvent {
    /// Builds an invoice event (used by tests and simulations).
    pub fn invoice(id: impl Into<String>, log: InvoiceLog) -> Self {
        Self {
            id: id.into(),
            subscription: Subscription::Invoice,
            created: None,
            log: EventLog::Invoice(log),
        }
    }

    /// Builds an event for a subscription other than invoice.
    pub fn other(id: impl Into<String>, subscription: Subscription, log: serde_json::Value) -> Self {
        Self {
            id: id.into(),
            subscription,
            created: None,
            log: EventLog::Other(log),
        }
    }

    pub fn is_invoice(&self) -> bool {
        self.subscription == Subscription::Invoice
    }

    pub fn invoice_log(&self) -> Option<&InvoiceLog> {
        match &self.log {
            EventLog::Invoice(log) => Some(log),
            EventLog::Other(_) => None,
        }
    }

    /// Parses a body whose signature has already been checked.
    ///
    /// Crate-private so the only way to obtain a decoded event from bytes is
    /// through the verifier.
    pub(crate) fn decode_verified(body: &[u8]) -> Result<Self, VerificationError> {
        let wire: EventBodyWire = serde_json::from_slice(body)
            .map_err(|e| VerificationError::MalformedEvent(e.to_string()))?;
        let event = wire.event;
        let subscription = Subscription::from_wire(&event.subscription);

        let log = match subscription {
            Subscription::Invoice => {
                let log: InvoiceLogWire = serde_json::from_value(event.log).map_err(|e| {
                    VerificationError::MalformedEvent(format!("invalid invoice log: {}", e))
                })?;
                EventLog::Invoice(InvoiceLog {
                    log_id: log.id,
                    invoice_id: log.invoice.id,
                    status: InvoiceLogStatus::from_wire(&log.log_type),
                    amount: log.invoice.amount,
                    fee: log.invoice.fee,
                })
            }
            _ => EventLog::Other(event.log),
        };

        Ok(Self {
            id: event.id,
            subscription,
            created: event.created,
            log,
        })
    }
}

#[derive(Deserialize)]
struct EventBodyWire {
    event: EventWire,
}

#[derive(Deserialize)]
struct EventWire {
    id: String,
    subscription: String,
    #[serde(default)]
    created: Option<String>,
    log: serde_json::Value,
}

#[derive(Deserialize)]
struct InvoiceLogWire {
    id: String,
    #[serde(rename = "type")]
    log_type: String,
    invoice: InvoiceWire,
}

#[derive(Deserialize)]
struct InvoiceWire {
    id: String,
    amount: i64,
    fee: i64,
}
