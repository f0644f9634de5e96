//! # placard-settings
//!
//! Placeholder rule configuration for the composer.
//!
//! Raw theme settings are parsed once into an immutable [`ConfigurationSet`]:
//! 1. **Shape check**: `placeholder_configurations` must be a JSON array
//!    (inline or JSON-encoded in a string). Anything else rejects the whole
//!    configuration.
//! 2. **Rule validation**: each entry becomes a [`RuleOutcome`]. Entries
//!    without a category scope are dropped with a warning; the rest load.
//! 3. **Indexing**: rules are indexed by category id in insertion order.
//!
//! [`ConfigurationStore`] publishes snapshots; replacing one is a single
//! pointer swap, so a reader holds either the old set or the new one.

#![deny(unsafe_code)]

pub mod config;
pub mod errors;
pub mod loader;
pub mod store;
pub mod types;
pub mod validate;

pub use config::ConfigurationSet;
pub use errors::{Result, SettingsError};
pub use loader::{
    INHERIT_ENV_VAR, LoadedConfiguration, apply_env_overrides, apply_inherit_override,
    load_from_path, load_or_empty, parse_bool, parse_settings,
};
pub use store::ConfigurationStore;
pub use types::{PlaceholderRule, RawRule, ThemeSettings};
pub use validate::{RejectReason, RuleOutcome, RuleRejection, ValidationReport, validate_rules};
