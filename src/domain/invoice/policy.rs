//! Randomized invoice generation policy.
//!
//! Every invoice carries the three required fields. On top of that a random
//! subset of [`OptionalField`]s is drawn without replacement, so a field is
//! either absent or present exactly once.

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use rand::seq::SliceRandom;
use rand::Rng;

use super::cpf::generate_cpf;
use super::request::{Description, Discount, InvoiceRequest, InvoiceRule};
use crate::domain::foundation::ConfigurationError;

/// Payer names drawn for synthetic invoices.
pub const NAME_ROSTER: &[&str] = &[
    "Ada Lovelace",
    "Alan Turing",
    "Grace Hopper",
    "Katherine Johnson",
    "Edsger Dijkstra",
    "Barbara Liskov",
    "Donald Knuth",
    "Margaret Hamilton",
    "John von Neumann",
    "Frances Allen",
];

const DESCRIPTION_KEYS: &[&str] = &["Product", "Order", "Reference", "Store", "Campaign"];
const TAG_POOL: &[&str] = &["synthetic", "load-test", "sandbox", "webhook", "settlement"];

/// Days until due when a discount needs a due date but none was drawn.
const DEFAULT_DUE_DAYS: i64 = 2;

/// Optional invoice fields the policy may include.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionalField {
    Due,
    Expiration,
    Fine,
    Interest,
    Discounts,
    Descriptions,
    Tags,
    Rules,
}

impl OptionalField {
    pub const ALL: [OptionalField; 8] = [
        OptionalField::Due,
        OptionalField::Expiration,
        OptionalField::Fine,
        OptionalField::Interest,
        OptionalField::Discounts,
        OptionalField::Descriptions,
        OptionalField::Tags,
        OptionalField::Rules,
    ];
}

/// Amount range (minor units) plus the field-selection rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvoicePolicy {
    amount_min: i64,
    amount_max: i64,
}

impl InvoicePolicy {
    pub fn new(amount_min: i64, amount_max: i64) -> Result<Self, ConfigurationError> {
        if amount_min < 1 || amount_min > amount_max {
            return Err(ConfigurationError::InvalidAmountRange {
                min: amount_min,
                max: amount_max,
            });
        }
        Ok(Self {
            amount_min,
            amount_max,
        })
    }

    pub fn amount_range(&self) -> (i64, i64) {
        (self.amount_min, self.amount_max)
    }

    /// Draws between zero and all optional fields, without replacement.
    pub fn choose_optional_fields<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<OptionalField> {
        let count = rng.gen_range(0..=OptionalField::ALL.len());
        OptionalField::ALL
            .choose_multiple(rng, count)
            .copied()
            .collect()
    }

    /// Generates one invoice. `batch_tag` identifies the issuance batch and is
    /// included whenever tags are drawn.
    pub fn generate<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        now: DateTime<Utc>,
        batch_tag: &str,
    ) -> InvoiceRequest {
        let amount = rng.gen_range(self.amount_min..=self.amount_max);
        let tax_id = generate_cpf(rng);
        let name = NAME_ROSTER
            .choose(rng)
            .copied()
            .unwrap_or(NAME_ROSTER[0]);

        let mut invoice = InvoiceRequest::new(amount, tax_id, name);
        let fields = self.choose_optional_fields(rng);

        let due = if fields.contains(&OptionalField::Due) {
            let due = now + Duration::days(rng.gen_range(1..=30));
            invoice.due = Some(format_timestamp(due));
            due
        } else {
            now + Duration::days(DEFAULT_DUE_DAYS)
        };

        for field in fields {
            match field {
                OptionalField::Due => {}
                OptionalField::Expiration => {
                    invoice.expiration = Some(rng.gen_range(3_600..=5 * 86_400));
                }
                OptionalField::Fine => {
                    invoice.fine = Some(percentage(rng, 0.0, 20.0));
                }
                OptionalField::Interest => {
                    invoice.interest = Some(percentage(rng, 0.0, 10.0));
                }
                OptionalField::Discounts => {
                    invoice.discounts = Some(discounts(rng, now, due));
                }
                OptionalField::Descriptions => {
                    invoice.descriptions = Some(descriptions(rng));
                }
                OptionalField::Tags => {
                    invoice.tags = Some(tags(rng, batch_tag));
                }
                OptionalField::Rules => {
                    invoice.rules = Some(vec![InvoiceRule {
                        key: "allowedTaxIds".to_string(),
                        value: vec![invoice.tax_id.clone()],
                    }]);
                }
            }
        }

        invoice
    }
}

fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Two-decimal percentage in `[min, max]`.
fn percentage<R: Rng + ?Sized>(rng: &mut R, min: f64, max: f64) -> f64 {
    (rng.gen_range(min..=max) * 100.0).round() / 100.0
}

/// 1-5 discounts, evenly spread strictly between `now` and `due`.
fn discounts<R: Rng + ?Sized>(rng: &mut R, now: DateTime<Utc>, due: DateTime<Utc>) -> Vec<Discount> {
    let count: i64 = rng.gen_range(1..=5);
    let step = (due - now) / (count as i32 + 1);

    (1..=count)
        .map(|i| Discount {
            percentage: percentage(rng, 0.5, 5.0),
            due: format_timestamp(now + step * i as i32),
        })
        .collect()
}

fn descriptions<R: Rng + ?Sized>(rng: &mut R) -> Vec<Description> {
    let count = rng.gen_range(1..=3);
    DESCRIPTION_KEYS
        .choose_multiple(rng, count)
        .map(|key| Description {
            key: key.to_string(),
            value: format!("{}-{}", key.to_lowercase(), rng.gen_range(1000..10000)),
        })
        .collect()
}

fn tags<R: Rng + ?Sized>(rng: &mut R, batch_tag: &str) -> Vec<String> {
    let extra = rng.gen_range(0..=2);
    let mut tags = vec![batch_tag.to_string()];
    tags.extend(TAG_POOL.choose_multiple(rng, extra).map(|t| t.to_string()));
    tags
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::invoice::is_valid_cpf;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn policy() -> InvoicePolicy {
        InvoicePolicy::new(1_000, 50_000).unwrap()
    }

    fn fixed_now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-03-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    // ════════════════════════════════════════════════════════════════════════
    // Construction
    // ════════════════════════════════════════════════════════════════════════

    #[test]
    fn rejects_empty_amount_range() {
        assert_eq!(
            InvoicePolicy::new(500, 100),
            Err(ConfigurationError::InvalidAmountRange { min: 500, max: 100 })
        );
    }

    #[test]
    fn rejects_non_positive_minimum() {
        assert!(InvoicePolicy::new(0, 100).is_err());
    }

    // ════════════════════════════════════════════════════════════════════════
    // Field selection
    // ════════════════════════════════════════════════════════════════════════

    #[test]
    fn optional_fields_are_never_duplicated() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..500 {
            let fields = policy().choose_optional_fields(&mut rng);
            let unique: HashSet<_> = fields.iter().collect();
            assert_eq!(unique.len(), fields.len());
            assert!(fields.len() <= OptionalField::ALL.len());
        }
    }

    #[test]
    fn selection_covers_empty_and_full_subsets() {
        let mut rng = StdRng::seed_from_u64(3);
        let sizes: HashSet<usize> = (0..2_000)
            .map(|_| policy().choose_optional_fields(&mut rng).len())
            .collect();
        assert!(sizes.contains(&0));
        assert!(sizes.contains(&OptionalField::ALL.len()));
    }

    // ════════════════════════════════════════════════════════════════════════
    // Generation
    // ════════════════════════════════════════════════════════════════════════

    #[test]
    fn required_fields_always_present() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..300 {
            let invoice = policy().generate(&mut rng, fixed_now(), "batch-1");
            assert!((1_000..=50_000).contains(&invoice.amount));
            assert!(is_valid_cpf(&invoice.tax_id));
            assert!(NAME_ROSTER.contains(&invoice.name.as_str()));
        }
    }

    #[test]
    fn tags_include_batch_tag() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut seen = 0;
        for _ in 0..300 {
            let invoice = policy().generate(&mut rng, fixed_now(), "batch-xyz");
            if let Some(tags) = invoice.tags {
                assert_eq!(tags[0], "batch-xyz");
                let unique: HashSet<_> = tags.iter().collect();
                assert_eq!(unique.len(), tags.len());
                seen += 1;
            }
        }
        assert!(seen > 0);
    }

    #[test]
    fn discounts_fall_strictly_before_due() {
        let mut rng = StdRng::seed_from_u64(9);
        let now = fixed_now();
        for _ in 0..300 {
            let invoice = policy().generate(&mut rng, now, "b");
            let Some(discounts) = invoice.discounts else {
                continue;
            };
            let due = match &invoice.due {
                Some(due) => DateTime::parse_from_rfc3339(due).unwrap().with_timezone(&Utc),
                None => now + Duration::days(DEFAULT_DUE_DAYS),
            };
            assert!((1..=5).contains(&discounts.len()));
            for discount in discounts {
                let at = DateTime::parse_from_rfc3339(&discount.due)
                    .unwrap()
                    .with_timezone(&Utc);
                assert!(at > now && at < due);
            }
        }
    }

    #[test]
    fn rules_allow_the_payer_tax_id() {
        let mut rng = StdRng::seed_from_u64(21);
        for _ in 0..300 {
            let invoice = policy().generate(&mut rng, fixed_now(), "b");
            if let Some(rules) = &invoice.rules {
                assert_eq!(rules[0].key, "allowedTaxIds");
                assert_eq!(rules[0].value, vec![invoice.tax_id.clone()]);
            }
        }
    }
}
