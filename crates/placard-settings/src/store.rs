//! Snapshot store for the active configuration.
//!
//! The store holds an `Arc<ConfigurationSet>`. Readers clone the `Arc` and
//! resolve against it for as long as they like; a save swaps in a new `Arc`.
//! The lock is held only for the clone or the swap, never during resolution.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;
use tracing::{info, warn};

use crate::config::ConfigurationSet;
use crate::errors::Result;
use crate::loader::parse_settings;
use crate::validate::ValidationReport;

/// Holder of the current configuration snapshot.
#[derive(Debug)]
pub struct ConfigurationStore {
    current: RwLock<Arc<ConfigurationSet>>,
    generation: AtomicU64,
}

impl ConfigurationStore {
    /// Create a store publishing `initial`.
    #[must_use]
    pub fn new(initial: ConfigurationSet) -> Self {
        Self {
            current: RwLock::new(Arc::new(initial)),
            generation: AtomicU64::new(0),
        }
    }

    /// The current snapshot.
    pub fn snapshot(&self) -> Arc<ConfigurationSet> {
        Arc::clone(&*self.current.read())
    }

    /// Replace the snapshot wholesale. Returns the new generation.
    pub fn replace(&self, set: ConfigurationSet) -> u64 {
        let next = Arc::new(set);
        let rules = next.len();
        let inherit = next.inherit_from_parent();
        let generation = {
            let mut current = self.current.write();
            *current = next;
            self.generation.fetch_add(1, Ordering::AcqRel) + 1
        };
        info!(generation, rules, inherit, "placeholder configuration replaced");
        generation
    }

    /// Parse `raw` and publish the result.
    ///
    /// When `raw` is structurally invalid the empty set is published, so no
    /// overrides apply until a valid configuration is saved, and the error is
    /// returned.
    pub fn reload_from_str(&self, raw: &str) -> Result<ValidationReport> {
        match parse_settings(raw) {
            Ok(loaded) => {
                let _ = self.replace(loaded.set);
                Ok(loaded.report)
            }
            Err(e) => {
                warn!(error = %e, "rejecting placeholder configuration, no overrides will apply");
                let _ = self.replace(ConfigurationSet::empty());
                Err(e)
            }
        }
    }

    /// Number of replacements since creation.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }
}

impl Default for ConfigurationStore {
    fn default() -> Self {
        Self::new(ConfigurationSet::empty())
    }
}
