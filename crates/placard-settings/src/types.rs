//! Settings wire format and the validated rule type.
//!
//! Field names are snake_case to match the theme settings JSON. Types marked
//! `#[serde(default)]` accept partial input.

use placard_core::{CategoryId, ComposerMode};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Theme settings as stored by the forum.
///
/// # JSON Format
///
/// `placeholder_configurations` is usually a JSON-encoded string (theme
/// settings store JSON-typed values as text), but an inline array is
/// accepted too:
///
/// ```json
/// {
///   "placeholder_configurations": "[{\"category_id\":[5],\"topic_placeholder\":\"Describe the bug\"}]",
///   "inherit_parent_placeholders": true
/// }
/// ```
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeSettings {
    /// Rule list, either a JSON array or a string containing one.
    pub placeholder_configurations: Value,
    /// Whether subcategories fall back to their ancestors' rules.
    pub inherit_parent_placeholders: bool,
}

/// One rule entry exactly as authored, before validation.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawRule {
    /// Categories the rule applies to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<Vec<CategoryId>>,
    /// Text for new topics.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic_placeholder: Option<String>,
    /// Text for replies.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_placeholder: Option<String>,
}

/// A validated placeholder rule.
///
/// `category_ids` is non-empty and free of duplicates (first occurrence
/// order). Placeholder fields are `None` when the author left them blank.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PlaceholderRule {
    category_ids: Vec<CategoryId>,
    topic_placeholder: Option<String>,
    reply_placeholder: Option<String>,
}

impl PlaceholderRule {
    /// Build a rule, returning `None` when `category_ids` is empty.
    #[must_use]
    pub fn new(
        category_ids: impl IntoIterator<Item = CategoryId>,
        topic_placeholder: Option<String>,
        reply_placeholder: Option<String>,
    ) -> Option<Self> {
        let mut ids: Vec<CategoryId> = Vec::new();
        for id in category_ids {
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        if ids.is_empty() {
            return None;
        }
        Some(Self {
            category_ids: ids,
            topic_placeholder: non_blank(topic_placeholder),
            reply_placeholder: non_blank(reply_placeholder),
        })
    }

    /// Categories this rule is scoped to.
    #[must_use]
    pub fn category_ids(&self) -> &[CategoryId] {
        &self.category_ids
    }

    /// Whether the rule is scoped to `id`. Exact membership only.
    #[must_use]
    pub fn applies_to(&self, id: CategoryId) -> bool {
        self.category_ids.contains(&id)
    }

    /// Text for new topics, if set.
    #[must_use]
    pub fn topic_placeholder(&self) -> Option<&str> {
        self.topic_placeholder.as_deref()
    }

    /// Text for replies, if set.
    #[must_use]
    pub fn reply_placeholder(&self) -> Option<&str> {
        self.reply_placeholder.as_deref()
    }

    /// Text for the given composer mode, if set.
    #[must_use]
    pub fn placeholder_for(&self, mode: ComposerMode) -> Option<&str> {
        match mode {
            ComposerMode::NewTopic => self.topic_placeholder(),
            ComposerMode::Reply => self.reply_placeholder(),
        }
    }
}

fn non_blank(text: Option<String>) -> Option<String> {
    text.filter(|t| !t.trim().is_empty())
}
