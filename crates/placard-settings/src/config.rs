//! Immutable, indexed rule set.
//!
//! [`ConfigurationSet`] answers "which rules apply to this category?" by
//! exact id membership. The per-category index is built once in
//! [`ConfigurationSet::new`]; lookups return rules in authored order.

use std::collections::HashMap;

use placard_core::CategoryId;

use crate::types::PlaceholderRule;

/// Validated placeholder rules plus the inheritance flag.
#[derive(Clone, Debug, Default)]
pub struct ConfigurationSet {
    rules: Vec<PlaceholderRule>,
    inherit_from_parent: bool,
    /// Category id -> positions in `rules`, ascending.
    by_category: HashMap<CategoryId, Vec<usize>>,
}

impl ConfigurationSet {
    /// Build a set from rules in authored order.
    #[must_use]
    pub fn new(rules: Vec<PlaceholderRule>, inherit_from_parent: bool) -> Self {
        let mut by_category: HashMap<CategoryId, Vec<usize>> = HashMap::new();
        for (index, rule) in rules.iter().enumerate() {
            for id in rule.category_ids() {
                by_category.entry(*id).or_default().push(index);
            }
        }

        Self {
            rules,
            inherit_from_parent,
            by_category,
        }
    }

    /// The "no overrides" set: every resolution against it is empty.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether ancestors' rules apply to subcategories without their own.
    #[must_use]
    pub fn inherit_from_parent(&self) -> bool {
        self.inherit_from_parent
    }

    /// All rules in authored order.
    #[must_use]
    pub fn rules(&self) -> &[PlaceholderRule] {
        &self.rules
    }

    /// Rules scoped to `id`, in authored order.
    #[must_use]
    pub fn rules_for_category(&self, id: CategoryId) -> Vec<&PlaceholderRule> {
        self.by_category
            .get(&id)
            .map(|positions| positions.iter().map(|&i| &self.rules[i]).collect())
            .unwrap_or_default()
    }

    /// The rule that wins for `id` (last authored) and its position.
    #[must_use]
    pub fn winning_rule(&self, id: CategoryId) -> Option<(usize, &PlaceholderRule)> {
        let &index = self.by_category.get(&id)?.last()?;
        Some((index, &self.rules[index]))
    }

    /// Whether any rule is scoped to `id`.
    #[must_use]
    pub fn has_rules_for(&self, id: CategoryId) -> bool {
        self.by_category.contains_key(&id)
    }

    /// Number of rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the set has no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Number of distinct categories with at least one rule.
    #[must_use]
    pub fn category_count(&self) -> usize {
        self.by_category.len()
    }
}
