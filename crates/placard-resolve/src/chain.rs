//! Candidate chain construction.
//!
//! The chain starts at the composer's category. With inheritance enabled it
//! continues through each parent, nearest to farthest, and stops at:
//! - a category with no parent (or an unknown one),
//! - a category already in the chain (cycle),
//! - [`MAX_CHAIN_DEPTH`] entries.
//!
//! The walk is iterative over the lookup; no category holds a reference to
//! its parent.

use std::collections::HashSet;

use placard_core::{AsyncCategoryLookup, CategoryId, CategoryLookup};
use serde::Serialize;
use tracing::warn;

/// Maximum number of categories in a chain.
pub const MAX_CHAIN_DEPTH: usize = 64;

/// Why the chain stopped growing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChainEnd {
    /// Inheritance is disabled; only the starting category is considered.
    NotInherited,
    /// Reached a category without a (known) parent.
    Root,
    /// A parent link pointed back into the chain.
    Cycle,
    /// The chain reached [`MAX_CHAIN_DEPTH`].
    DepthLimit,
}

/// Candidate categories, nearest first.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AncestryChain {
    ids: Vec<CategoryId>,
    end: ChainEnd,
}

impl AncestryChain {
    /// Categories in walk order. Never empty.
    #[must_use]
    pub fn ids(&self) -> &[CategoryId] {
        &self.ids
    }

    /// Why the walk stopped.
    #[must_use]
    pub fn end(&self) -> ChainEnd {
        self.end
    }

    /// Number of categories in the chain.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Always `false`; a chain contains at least its starting category.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Incremental chain state shared by the sync and async walks.
struct ChainBuilder {
    ids: Vec<CategoryId>,
    seen: HashSet<CategoryId>,
}

impl ChainBuilder {
    fn new(start: CategoryId) -> Self {
        Self {
            ids: vec![start],
            seen: HashSet::from([start]),
        }
    }

    fn last(&self) -> CategoryId {
        // `ids` starts non-empty and only grows.
        self.ids[self.ids.len() - 1]
    }

    /// Record the parent of the last category. `Some(end)` stops the walk.
    fn step(&mut self, parent: Option<CategoryId>) -> Option<ChainEnd> {
        let Some(parent) = parent else {
            return Some(ChainEnd::Root);
        };
        if !self.seen.insert(parent) {
            warn!(
                start = %self.ids[0],
                category_id = %parent,
                "category ancestry cycle, treating as root"
            );
            return Some(ChainEnd::Cycle);
        }
        if self.ids.len() >= MAX_CHAIN_DEPTH {
            warn!(
                start = %self.ids[0],
                depth = MAX_CHAIN_DEPTH,
                "category ancestry too deep, truncating"
            );
            return Some(ChainEnd::DepthLimit);
        }
        self.ids.push(parent);
        None
    }

    fn finish(self, end: ChainEnd) -> AncestryChain {
        AncestryChain { ids: self.ids, end }
    }
}

/// Build the candidate chain for `start`.
pub fn build_chain(
    start: CategoryId,
    inherit_from_parent: bool,
    lookup: &impl CategoryLookup,
) -> AncestryChain {
    let mut builder = ChainBuilder::new(start);
    if !inherit_from_parent {
        return builder.finish(ChainEnd::NotInherited);
    }
    loop {
        let parent = lookup.parent_of(builder.last());
        if let Some(end) = builder.step(parent) {
            return builder.finish(end);
        }
    }
}

/// Build the candidate chain for `start` using an async lookup.
pub async fn build_chain_async(
    start: CategoryId,
    inherit_from_parent: bool,
    lookup: &dyn AsyncCategoryLookup,
) -> AncestryChain {
    let mut builder = ChainBuilder::new(start);
    if !inherit_from_parent {
        return builder.finish(ChainEnd::NotInherited);
    }
    loop {
        let parent = lookup.parent_of(builder.last()).await;
        if let Some(end) = builder.step(parent) {
            return builder.finish(end);
        }
    }
}
