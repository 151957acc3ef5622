//! Compensating transfer request.

use serde::Serialize;

use super::SettlementAccount;

/// One outbound transfer, serialized as the provider expects it.
///
/// Recipient fields always come from the configured [`SettlementAccount`];
/// only the amount and the idempotency key derive from the event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferRequest {
    pub amount: i64,
    pub bank_code: String,
    pub branch_code: String,
    pub account_number: String,
    pub account_type: String,
    pub name: String,
    pub tax_id: String,
    pub external_id: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl TransferRequest {
    /// Builds the settlement transfer for `event_id`.
    pub fn settlement(account: &SettlementAccount, amount: i64, event_id: &str) -> Self {
        Self {
            amount,
            bank_code: account.bank_code.clone(),
            branch_code: account.branch_code.clone(),
            account_number: account.account_number.clone(),
            account_type: account.account_type.clone(),
            name: account.name.clone(),
            tax_id: account.tax_id.clone(),
            external_id: Self::external_id_for(event_id),
            tags: vec!["settlement".to_string()],
        }
    }

    /// Provider-side idempotency key; a replayed event maps to the same key.
    pub fn external_id_for(event_id: &str) -> String {
        format!("settlement-{}", event_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settlement_uses_configured_recipient() {
        let account = SettlementAccount::default();
        let transfer = TransferRequest::settlement(&account, 980, "evt-9");

        assert_eq!(transfer.amount, 980);
        assert_eq!(transfer.bank_code, account.bank_code);
        assert_eq!(transfer.tax_id, account.tax_id);
        assert_eq!(transfer.external_id, "settlement-evt-9");
    }

    #[test]
    fn serializes_in_camel_case() {
        let transfer = TransferRequest::settlement(&SettlementAccount::default(), 10, "e");
        let json = serde_json::to_value(&transfer).unwrap();

        assert_eq!(json["bankCode"], "20018183");
        assert_eq!(json["accountNumber"], "6341320293482496");
        assert_eq!(json["externalId"], "settlement-e");
        assert_eq!(json["tags"][0], "settlement");
    }
}
