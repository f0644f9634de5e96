//! # placard-core
//!
//! Foundation types shared by every placard crate.
//!
//! - **IDs**: [`CategoryId`] and [`ContextVersion`] newtypes
//! - **Composer**: [`ComposerMode`], [`ComposerContext`], [`Placeholder`]
//! - **Categories**: the [`CategoryLookup`] seams and the id-indexed [`CategoryTree`]
//! - **Logging**: subscriber bootstrap and log capture for tests

#![deny(unsafe_code)]

pub mod category;
pub mod composer;
pub mod ids;
pub mod logging;

pub use category::{AsyncCategoryLookup, CategoryLookup, CategoryRecord, CategoryTree, NoHierarchy};
pub use composer::{ComposerContext, ComposerMode, Placeholder};
pub use ids::{CategoryId, ContextVersion};
