//! Invoice request payload.

use serde::Serialize;

/// One invoice as sent in `POST invoice`.
///
/// `amount`, `tax_id` and `name` are always present; every other field is
/// omitted from the payload when `None`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceRequest {
    pub amount: i64,
    pub tax_id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiration: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fine: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interest: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discounts: Option<Vec<Discount>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub descriptions: Option<Vec<Description>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rules: Option<Vec<InvoiceRule>>,
}

impl InvoiceRequest {
    /// An invoice carrying only the required fields.
    pub fn new(amount: i64, tax_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            amount,
            tax_id: tax_id.into(),
            name: name.into(),
            due: None,
            expiration: None,
            fine: None,
            interest: None,
            discounts: None,
            descriptions: None,
            tags: None,
            rules: None,
        }
    }

    /// Number of optional fields that are set.
    pub fn optional_field_count(&self) -> usize {
        [
            self.due.is_some(),
            self.expiration.is_some(),
            self.fine.is_some(),
            self.interest.is_some(),
            self.discounts.is_some(),
            self.descriptions.is_some(),
            self.tags.is_some(),
            self.rules.is_some(),
        ]
        .iter()
        .filter(|set| **set)
        .count()
    }
}

/// Early-payment discount, valid until `due`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Discount {
    pub percentage: f64,
    pub due: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Description {
    pub key: String,
    pub value: String,
}

/// Provider-side payment rule, e.g. `allowedTaxIds`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvoiceRule {
    pub key: String,
    pub value: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_only_invoice_omits_optional_keys() {
        let invoice = InvoiceRequest::new(1500, "012.345.678-90", "Ada Lovelace");
        let json = serde_json::to_value(&invoice).unwrap();
        let object = json.as_object().unwrap();

        assert_eq!(object.len(), 3);
        assert_eq!(json["amount"], 1500);
        assert_eq!(json["taxId"], "012.345.678-90");
        assert_eq!(json["name"], "Ada Lovelace");
        assert_eq!(invoice.optional_field_count(), 0);
    }

    #[test]
    fn optional_fields_serialize_when_set() {
        let mut invoice = InvoiceRequest::new(1500, "012.345.678-90", "Ada Lovelace");
        invoice.fine = Some(2.5);
        invoice.rules = Some(vec![InvoiceRule {
            key: "allowedTaxIds".to_string(),
            value: vec!["012.345.678-90".to_string()],
        }]);

        let json = serde_json::to_value(&invoice).unwrap();
        assert_eq!(json["fine"], 2.5);
        assert_eq!(json["rules"][0]["key"], "allowedTaxIds");
        assert!(json.get("due").is_none());
        assert_eq!(invoice.optional_field_count(), 2);
    }
}
