//! Decision rule: does this event warrant a compensating transfer?

use crate::domain::webhook::{DecodedEvent, Subscription};

/// Outcome of applying the settlement rule to one decoded event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettlementDecision {
    /// Transfer `amount` minor units to the settlement account.
    Settle { amount: i64 },
    /// Subscription is not `invoice`; decoded but intentionally ignored.
    NotInvoice,
    /// Invoice log status is anything other than `paid`.
    StatusNotPaid,
    /// Paid, but `amount - fee` leaves nothing (or less) to send.
    NothingToSettle { amount: i64, fee: i64 },
}

impl SettlementDecision {
    pub fn is_settle(&self) -> bool {
        matches!(self, SettlementDecision::Settle { .. })
    }
}

/// Applies the settlement rule.
///
/// Acts only on `invoice` events whose log status is `paid`. The transfer
/// amount is `amount - fee` in integer minor units; an overflowing or
/// non-positive result yields `NothingToSettle`.
pub fn decide(event: &DecodedEvent) -> SettlementDecision {
    if event.subscription != Subscription::Invoice {
        return SettlementDecision::NotInvoice;
    }

    let log = match event.invoice_log() {
        Some(log) => log,
        None => return SettlementDecision::NotInvoice,
    };

    if !log.status.is_paid() {
        return SettlementDecision::StatusNotPaid;
    }

    match log.amount.checked_sub(log.fee) {
        Some(net) if net > 0 => SettlementDecision::Settle { amount: net },
        _ => SettlementDecision::NothingToSettle {
            amount: log.amount,
            fee: log.fee,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::webhook::{InvoiceLog, InvoiceLogStatus};

    fn invoice_event(status: InvoiceLogStatus, amount: i64, fee: i64) -> DecodedEvent {
        DecodedEvent::invoice("evt-1", InvoiceLog::new("inv-1", status, amount, fee))
    }

    #[test]
    fn paid_invoice_settles_net_of_fee() {
        let event = invoice_event(InvoiceLogStatus::Paid, 1000, 20);
        assert_eq!(decide(&event), SettlementDecision::Settle { amount: 980 });
    }

    #[test]
    fn other_statuses_are_no_ops() {
        for status in [
            InvoiceLogStatus::Created,
            InvoiceLogStatus::Canceled,
            InvoiceLogStatus::Expired,
            InvoiceLogStatus::Credited,
            InvoiceLogStatus::Unrecognized("pending".to_string()),
        ] {
            let event = invoice_event(status, 1000, 20);
            assert_eq!(decide(&event), SettlementDecision::StatusNotPaid);
        }
    }

    #[test]
    fn non_invoice_subscription_is_ignored() {
        let event = DecodedEvent::other(
            "evt-2",
            Subscription::Transfer,
            serde_json::json!({"type": "success"}),
        );
        assert_eq!(decide(&event), SettlementDecision::NotInvoice);
    }

    #[test]
    fn fee_equal_to_amount_leaves_nothing() {
        let event = invoice_event(InvoiceLogStatus::Paid, 500, 500);
        assert_eq!(
            decide(&event),
            SettlementDecision::NothingToSettle { amount: 500, fee: 500 }
        );
    }

    #[test]
    fn overflow_is_not_settled() {
        let event = invoice_event(InvoiceLogStatus::Paid, i64::MIN, 1);
        assert!(!decide(&event).is_settle());
    }
}
