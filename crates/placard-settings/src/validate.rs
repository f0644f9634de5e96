//! Per-rule validation.
//!
//! Each authored entry is checked once at load time and becomes a
//! [`RuleOutcome`]. Rejected entries are isolated: they are logged and
//! counted, and every other entry still loads.

use std::fmt;

use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use crate::types::{PlaceholderRule, RawRule};

/// Why an entry was dropped.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum RejectReason {
    /// The entry is not a JSON object.
    NotAnObject,
    /// The entry has no `category_id` field (or it is null).
    MissingCategoryIds,
    /// `category_id` is present but empty.
    EmptyCategoryIds,
    /// A field has the wrong type (e.g. a negative or non-integer category id).
    Malformed(String),
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAnObject => f.write_str("entry is not an object"),
            Self::MissingCategoryIds => f.write_str("missing category_id"),
            Self::EmptyCategoryIds => f.write_str("category_id is empty"),
            Self::Malformed(detail) => write!(f, "malformed entry: {detail}"),
        }
    }
}

/// Validation result for one entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RuleOutcome {
    /// The entry became a rule.
    Accepted(PlaceholderRule),
    /// The entry was dropped.
    Rejected(RuleRejection),
}

/// A dropped entry and its position in the authored list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RuleRejection {
    /// Zero-based position in the authored list.
    pub index: usize,
    /// Why it was dropped.
    pub reason: RejectReason,
}

/// Summary of a validation pass.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    /// Number of entries that became rules.
    pub accepted: usize,
    /// Entries that were dropped, in authored order.
    pub rejected: Vec<RuleRejection>,
}

impl ValidationReport {
    /// Whether every entry was accepted.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }

    /// Total number of authored entries seen.
    #[must_use]
    pub fn total(&self) -> usize {
        self.accepted + self.rejected.len()
    }
}

/// Validate a single authored entry.
#[must_use]
pub fn validate_rule(index: usize, entry: Value) -> RuleOutcome {
    if !entry.is_object() {
        return reject(index, RejectReason::NotAnObject);
    }

    let raw: RawRule = match serde_json::from_value(entry) {
        Ok(raw) => raw,
        Err(e) => return reject(index, RejectReason::Malformed(e.to_string())),
    };

    let Some(category_ids) = raw.category_id else {
        return reject(index, RejectReason::MissingCategoryIds);
    };

    match PlaceholderRule::new(category_ids, raw.topic_placeholder, raw.reply_placeholder) {
        Some(rule) => RuleOutcome::Accepted(rule),
        None => reject(index, RejectReason::EmptyCategoryIds),
    }
}

/// Validate an authored list, keeping accepted rules in order.
pub fn validate_rules(entries: Vec<Value>) -> (Vec<PlaceholderRule>, ValidationReport) {
    let mut rules = Vec::with_capacity(entries.len());
    let mut report = ValidationReport::default();

    for (index, entry) in entries.into_iter().enumerate() {
        match validate_rule(index, entry) {
            RuleOutcome::Accepted(rule) => {
                report.accepted += 1;
                rules.push(rule);
            }
            RuleOutcome::Rejected(rejection) => {
                warn!(index, reason = %rejection.reason, "dropping placeholder rule");
                report.rejected.push(rejection);
            }
        }
    }

    (rules, report)
}

fn reject(index: usize, reason: RejectReason) -> RuleOutcome {
    RuleOutcome::Rejected(RuleRejection { index, reason })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use placard_core::CategoryId;
    use placard_core::logging::capture_logs;
    use serde_json::json;
    use tracing::Level;

    #[test]
    fn accepts_well_formed_entry() {
        let outcome = validate_rule(
            0,
            json!({"category_id": [1, 2], "topic_placeholder": "T", "reply_placeholder": "R"}),
        );
        assert_matches!(outcome, RuleOutcome::Accepted(rule) => {
            assert_eq!(rule.category_ids(), &[CategoryId::new(1), CategoryId::new(2)]);
            assert_eq!(rule.topic_placeholder(), Some("T"));
        });
    }

    #[test]
    fn rejects_missing_category_ids() {
        let outcome = validate_rule(3, json!({"topic_placeholder": "T"}));
        assert_matches!(
            outcome,
            RuleOutcome::Rejected(RuleRejection { index: 3, reason: RejectReason::MissingCategoryIds })
        );
    }

    #[test]
    fn rejects_null_category_ids() {
        let outcome = validate_rule(0, json!({"category_id": null}));
        assert_matches!(
            outcome,
            RuleOutcome::Rejected(RuleRejection { reason: RejectReason::MissingCategoryIds, .. })
        );
    }

    #[test]
    fn rejects_empty_category_ids() {
        let outcome = validate_rule(0, json!({"category_id": [], "topic_placeholder": "T"}));
        assert_matches!(
            outcome,
            RuleOutcome::Rejected(RuleRejection { reason: RejectReason::EmptyCategoryIds, .. })
        );
    }

    #[test]
    fn rejects_non_object() {
        assert_matches!(
            validate_rule(0, json!("just text")),
            RuleOutcome::Rejected(RuleRejection { reason: RejectReason::NotAnObject, .. })
        );
    }

    #[test]
    fn rejects_ill_typed_ids() {
        assert_matches!(
            validate_rule(0, json!({"category_id": ["general"]})),
            RuleOutcome::Rejected(RuleRejection { reason: RejectReason::Malformed(_), .. })
        );
        assert_matches!(
            validate_rule(0, json!({"category_id": [-4]})),
            RuleOutcome::Rejected(RuleRejection { reason: RejectReason::Malformed(_), .. })
        );
    }

    #[test]
    fn bad_entry_does_not_affect_siblings() {
        let (logs, _guard) = capture_logs();
        let (rules, report) = validate_rules(vec![
            json!({"category_id": [1], "topic_placeholder": "first"}),
            json!({"topic_placeholder": "orphan"}),
            json!({"category_id": [2], "reply_placeholder": "third"}),
        ]);

        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].topic_placeholder(), Some("first"));
        assert_eq!(rules[1].reply_placeholder(), Some("third"));
        assert_eq!(report.accepted, 2);
        assert_eq!(report.rejected.len(), 1);
        assert_eq!(report.rejected[0].index, 1);
        assert_eq!(report.total(), 3);
        assert!(!report.is_clean());
        assert!(logs.has_event(Level::WARN, "dropping placeholder rule"));
    }

    #[test]
    fn reason_display() {
        assert_eq!(RejectReason::MissingCategoryIds.to_string(), "missing category_id");
        assert_eq!(
            RejectReason::Malformed("x".into()).to_string(),
            "malformed entry: x"
        );
    }
}
