//! Category hierarchy lookup.
//!
//! The resolution engine only ever asks one question of the category data:
//! "what is the parent of this category?". [`CategoryLookup`] is the
//! synchronous form of that question, [`AsyncCategoryLookup`] the form used
//! when the answer may require a fetch.
//!
//! [`CategoryTree`] is the in-memory implementation: an id-indexed parent
//! map with no back-references. It does not enforce acyclicity; callers that
//! walk it must guard against cycles themselves.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::ids::CategoryId;

/// Synchronous parent lookup.
pub trait CategoryLookup {
    /// Parent of `id`, or `None` for top-level and unknown categories.
    fn parent_of(&self, id: CategoryId) -> Option<CategoryId>;
}

impl<T: CategoryLookup + ?Sized> CategoryLookup for &T {
    fn parent_of(&self, id: CategoryId) -> Option<CategoryId> {
        (**self).parent_of(id)
    }
}

/// Parent lookup that may have to wait on remote data.
#[async_trait]
pub trait AsyncCategoryLookup: Send + Sync {
    /// Parent of `id`, or `None` for top-level, unknown, or unreachable categories.
    async fn parent_of(&self, id: CategoryId) -> Option<CategoryId>;
}

/// Lookup for deployments without category nesting: every category is top-level.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoHierarchy;

impl CategoryLookup for NoHierarchy {
    fn parent_of(&self, _id: CategoryId) -> Option<CategoryId> {
        None
    }
}

/// One category as delivered by the forum's category list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRecord {
    /// Category id.
    pub id: CategoryId,
    /// Parent category, absent for top-level categories.
    #[serde(default, alias = "parent_id", skip_serializing_if = "Option::is_none")]
    pub parent_category_id: Option<CategoryId>,
}

/// Id-indexed parent map.
#[derive(Clone, Debug, Default)]
pub struct CategoryTree {
    parents: HashMap<CategoryId, CategoryId>,
}

impl CategoryTree {
    /// Create an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a tree from category records. Later records for the same id win.
    #[must_use]
    pub fn from_records(records: impl IntoIterator<Item = CategoryRecord>) -> Self {
        let mut tree = Self::new();
        for record in records {
            tree.insert(record.id, record.parent_category_id);
        }
        tree
    }

    /// Set (or clear) the parent of `id`.
    pub fn insert(&mut self, id: CategoryId, parent: Option<CategoryId>) {
        match parent {
            Some(parent) => {
                let _ = self.parents.insert(id, parent);
            }
            None => {
                let _ = self.parents.remove(&id);
            }
        }
    }

    /// Number of categories that have a parent.
    #[must_use]
    pub fn nested_count(&self) -> usize {
        self.parents.len()
    }

    /// Whether no category has a parent.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }
}

impl CategoryLookup for CategoryTree {
    fn parent_of(&self, id: CategoryId) -> Option<CategoryId> {
        self.parents.get(&id).copied()
    }
}

#[async_trait]
impl AsyncCategoryLookup for CategoryTree {
    async fn parent_of(&self, id: CategoryId) -> Option<CategoryId> {
        CategoryLookup::parent_of(self, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(raw: u64) -> CategoryId {
        CategoryId::new(raw)
    }

    #[test]
    fn empty_tree_has_no_parents() {
        let tree = CategoryTree::new();
        assert!(tree.is_empty());
        assert_eq!(CategoryLookup::parent_of(&tree, id(1)), None);
    }

    #[test]
    fn records_build_parent_links() {
        let tree = CategoryTree::from_records([
            CategoryRecord {
                id: id(10),
                parent_category_id: None,
            },
            CategoryRecord {
                id: id(11),
                parent_category_id: Some(id(10)),
            },
        ]);
        assert_eq!(CategoryLookup::parent_of(&tree, id(11)), Some(id(10)));
        assert_eq!(CategoryLookup::parent_of(&tree, id(10)), None);
        assert_eq!(tree.nested_count(), 1);
    }

    #[test]
    fn insert_none_clears_parent() {
        let mut tree = CategoryTree::new();
        tree.insert(id(2), Some(id(1)));
        tree.insert(id(2), None);
        assert_eq!(CategoryLookup::parent_of(&tree, id(2)), None);
    }

    #[test]
    fn record_json_format() {
        let records: Vec<CategoryRecord> = serde_json::from_str(
            r#"[{"id": 1}, {"id": 2, "parent_category_id": 1}, {"id": 3, "parent_id": 2}, {"id": 4, "parent_category_id": null}]"#,
        )
        .unwrap();
        let tree = CategoryTree::from_records(records);
        assert_eq!(CategoryLookup::parent_of(&tree, id(2)), Some(id(1)));
        assert_eq!(CategoryLookup::parent_of(&tree, id(3)), Some(id(2)));
        assert_eq!(CategoryLookup::parent_of(&tree, id(4)), None);
    }

    #[test]
    fn no_hierarchy_is_flat() {
        assert_eq!(NoHierarchy.parent_of(id(5)), None);
    }

    #[test]
    fn reference_forwards_lookup() {
        fn grandparent(lookup: impl CategoryLookup, id: CategoryId) -> Option<CategoryId> {
            lookup.parent_of(id).and_then(|p| lookup.parent_of(p))
        }

        let mut tree = CategoryTree::new();
        tree.insert(id(3), Some(id(2)));
        tree.insert(id(2), Some(id(1)));
        assert_eq!(grandparent(&tree, id(3)), Some(id(1)));
    }

    #[tokio::test]
    async fn async_lookup_matches_sync() {
        let mut tree = CategoryTree::new();
        tree.insert(id(2), Some(id(1)));
        assert_eq!(AsyncCategoryLookup::parent_of(&tree, id(2)).await, Some(id(1)));
        assert_eq!(AsyncCategoryLookup::parent_of(&tree, id(1)).await, None);
    }
}
