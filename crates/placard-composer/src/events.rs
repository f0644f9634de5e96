//! Composer context events and the pure transition function.

use placard_core::{CategoryId, ComposerContext, ComposerMode};
use serde::{Deserialize, Serialize};

/// A discrete change to the composer's context.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum ComposerEvent {
    /// The composer opened (new topic in a category, or reply to a topic).
    #[serde(rename = "composer_opened")]
    Opened {
        /// Target category; for replies, the topic's category.
        #[serde(default)]
        category_id: Option<CategoryId>,
        /// New topic or reply.
        mode: ComposerMode,
    },
    /// The open composer switched between new topic and reply.
    #[serde(rename = "composer_mode_changed")]
    ModeChanged {
        /// The new mode.
        mode: ComposerMode,
    },
    /// The open composer was retargeted to another category.
    #[serde(rename = "composer_category_changed")]
    CategoryChanged {
        /// The new category, or `None` when the category was cleared.
        #[serde(default)]
        category_id: Option<CategoryId>,
    },
    /// The composer closed; the next open starts fresh.
    #[serde(rename = "composer_closed")]
    Closed,
}

impl ComposerEvent {
    /// Composer opened for a new topic in `category`.
    #[must_use]
    pub const fn open_new_topic(category: CategoryId) -> Self {
        Self::Opened {
            category_id: Some(category),
            mode: ComposerMode::NewTopic,
        }
    }

    /// Composer opened to reply on a topic in `category`.
    #[must_use]
    pub const fn open_reply(category: CategoryId) -> Self {
        Self::Opened {
            category_id: Some(category),
            mode: ComposerMode::Reply,
        }
    }

    /// Short name used in logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Opened { .. } => "composer_opened",
            Self::ModeChanged { .. } => "composer_mode_changed",
            Self::CategoryChanged { .. } => "composer_category_changed",
            Self::Closed => "composer_closed",
        }
    }
}

/// Effect of an event on the tracked context.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition {
    /// The context is now this value and must be resolved.
    Changed(ComposerContext),
    /// The composer closed; there is no context.
    Cleared,
    /// The event needs an open composer and there is none.
    Ignored,
}

/// Compute the context after `event`.
///
/// `Opened` always starts from a fresh context; nothing carries over from the
/// previous session.
#[must_use]
pub fn apply_event(current: Option<ComposerContext>, event: ComposerEvent) -> Transition {
    match (current, event) {
        (_, ComposerEvent::Opened { category_id, mode }) => {
            Transition::Changed(ComposerContext { category_id, mode })
        }
        (_, ComposerEvent::Closed) => Transition::Cleared,
        (Some(ctx), ComposerEvent::ModeChanged { mode }) => {
            Transition::Changed(ComposerContext { mode, ..ctx })
        }
        (Some(ctx), ComposerEvent::CategoryChanged { category_id }) => {
            Transition::Changed(ComposerContext { category_id, ..ctx })
        }
        (None, ComposerEvent::ModeChanged { .. } | ComposerEvent::CategoryChanged { .. }) => {
            Transition::Ignored
        }
    }
}
