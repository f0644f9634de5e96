//! Composer context and the resolved placeholder value.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ids::CategoryId;

/// What the composer is being used for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComposerMode {
    /// Drafting a new topic.
    NewTopic,
    /// Replying to an existing topic.
    Reply,
}

impl ComposerMode {
    /// Stable lowercase name used in logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NewTopic => "new_topic",
            Self::Reply => "reply",
        }
    }
}

impl fmt::Display for ComposerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot of what the composer currently targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComposerContext {
    /// Target category. `None` for unscoped composition (e.g. private messages).
    pub category_id: Option<CategoryId>,
    /// New topic or reply.
    pub mode: ComposerMode,
}

impl ComposerContext {
    /// Context for drafting a new topic in `category`.
    #[must_use]
    pub const fn new_topic(category: CategoryId) -> Self {
        Self {
            category_id: Some(category),
            mode: ComposerMode::NewTopic,
        }
    }

    /// Context for replying to a topic that lives in `category`.
    #[must_use]
    pub const fn reply(category: CategoryId) -> Self {
        Self {
            category_id: Some(category),
            mode: ComposerMode::Reply,
        }
    }

    /// Context with no category scope.
    #[must_use]
    pub const fn unscoped(mode: ComposerMode) -> Self {
        Self {
            category_id: None,
            mode,
        }
    }
}

/// Placeholder text written into the composer input.
///
/// The empty value means "no override": the render surface shows the
/// forum's default placeholder instead.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Placeholder(String);

impl Placeholder {
    /// The "no override" value.
    #[must_use]
    pub const fn none() -> Self {
        Self(String::new())
    }

    /// Whether this value overrides the default placeholder.
    #[must_use]
    pub fn is_override(&self) -> bool {
        !self.0.is_empty()
    }

    /// The text, or `default` when there is no override.
    #[must_use]
    pub fn or_default<'a>(&'a self, default: &'a str) -> &'a str {
        if self.is_override() { &self.0 } else { default }
    }

    /// Borrow the raw text (empty when there is no override).
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume and return the raw text.
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<String> for Placeholder {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for Placeholder {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl AsRef<str> for Placeholder {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for Placeholder {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Placeholder {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl fmt::Display for Placeholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_wire_names() {
        assert_eq!(
            serde_json::to_string(&ComposerMode::NewTopic).unwrap(),
            "\"new_topic\""
        );
        let mode: ComposerMode = serde_json::from_str("\"reply\"").unwrap();
        assert_eq!(mode, ComposerMode::Reply);
    }

    #[test]
    fn context_constructors() {
        let ctx = ComposerContext::new_topic(CategoryId::new(3));
        assert_eq!(ctx.category_id, Some(CategoryId::new(3)));
        assert_eq!(ctx.mode, ComposerMode::NewTopic);

        let ctx = ComposerContext::reply(CategoryId::new(4));
        assert_eq!(ctx.mode, ComposerMode::Reply);

        assert!(ComposerContext::unscoped(ComposerMode::Reply).category_id.is_none());
    }

    #[test]
    fn context_wire_fields_are_snake_case() {
        let json = serde_json::to_value(ComposerContext::reply(CategoryId::new(9))).unwrap();
        assert_eq!(json, serde_json::json!({"category_id": 9, "mode": "reply"}));

        let back: ComposerContext =
            serde_json::from_str(r#"{"category_id": null, "mode": "new_topic"}"#).unwrap();
        assert_eq!(back, ComposerContext::unscoped(ComposerMode::NewTopic));
    }

    #[test]
    fn placeholder_fallback() {
        let none = Placeholder::none();
        assert!(!none.is_override());
        assert_eq!(none.or_default("Type here"), "Type here");

        let custom = Placeholder::from("Describe your bug");
        assert!(custom.is_override());
        assert_eq!(custom.or_default("Type here"), "Describe your bug");
        assert_eq!(custom, "Describe your bug");
    }
}
