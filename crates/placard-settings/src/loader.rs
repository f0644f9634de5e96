//! Settings loading.
//!
//! Loading flow:
//! 1. Parse the settings document into [`ThemeSettings`]
//! 2. Apply environment variable overrides
//! 3. Decode `placeholder_configurations` into a list of entries
//! 4. Validate entries and build the indexed [`ConfigurationSet`]
//!
//! Steps 1 and 3 reject the whole source on failure. Step 4 never fails;
//! bad entries are reported and skipped.

use std::path::Path;

use serde_json::Value;
use tracing::{debug, warn};

use crate::config::ConfigurationSet;
use crate::errors::{Result, SettingsError};
use crate::types::ThemeSettings;
use crate::validate::{ValidationReport, validate_rules};

/// Environment variable that overrides `inherit_parent_placeholders`.
pub const INHERIT_ENV_VAR: &str = "PLACARD_INHERIT_PARENT_PLACEHOLDERS";

/// A validated snapshot together with what validation dropped.
#[derive(Clone, Debug, Default)]
pub struct LoadedConfiguration {
    /// The snapshot to publish.
    pub set: ConfigurationSet,
    /// Per-entry validation results.
    pub report: ValidationReport,
}

/// Parse a settings document, applying environment overrides.
///
/// Every load path (file, runtime save, fallback) goes through here, so the
/// same document yields the same configuration wherever it came from.
pub fn parse_settings(raw: &str) -> Result<LoadedConfiguration> {
    let mut settings: ThemeSettings = serde_json::from_str(raw)?;
    apply_env_overrides(&mut settings);
    from_settings(settings)
}

/// Build a configuration from already-deserialized settings.
pub fn from_settings(settings: ThemeSettings) -> Result<LoadedConfiguration> {
    let entries = decode_entries(settings.placeholder_configurations)?;
    let (rules, report) = validate_rules(entries);
    debug!(
        accepted = report.accepted,
        rejected = report.rejected.len(),
        inherit = settings.inherit_parent_placeholders,
        "placeholder configuration loaded"
    );
    Ok(LoadedConfiguration {
        set: ConfigurationSet::new(rules, settings.inherit_parent_placeholders),
        report,
    })
}

/// Load settings from a JSON file, applying environment overrides.
pub fn load_from_path(path: &Path) -> Result<LoadedConfiguration> {
    debug!(?path, "loading placeholder settings from file");
    let content = std::fs::read_to_string(path)?;
    parse_settings(&content)
}

/// Parse a settings document, falling back to "no overrides" when the source
/// is structurally invalid.
#[must_use]
pub fn load_or_empty(raw: &str) -> LoadedConfiguration {
    parse_settings(raw).unwrap_or_else(|e| {
        warn!(error = %e, "rejecting placeholder configuration, no overrides will apply");
        LoadedConfiguration::default()
    })
}

/// Turn the `placeholder_configurations` value into a list of entries.
///
/// Accepts an array, a string containing a JSON array, a blank string, or
/// null. Anything else rejects the configuration.
fn decode_entries(value: Value) -> Result<Vec<Value>> {
    match value {
        Value::Null => Ok(Vec::new()),
        Value::Array(entries) => Ok(entries),
        Value::String(encoded) if encoded.trim().is_empty() => Ok(Vec::new()),
        Value::String(encoded) => match serde_json::from_str::<Value>(&encoded)? {
            Value::Array(entries) => Ok(entries),
            other => Err(SettingsError::InvalidShape(format!(
                "placeholder_configurations must encode an array, found {}",
                json_kind(&other)
            ))),
        },
        other => Err(SettingsError::InvalidShape(format!(
            "placeholder_configurations must be an array, found {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Apply environment variable overrides to loaded settings.
pub fn apply_env_overrides(settings: &mut ThemeSettings) {
    let inherit = std::env::var(INHERIT_ENV_VAR).ok();
    apply_inherit_override(settings, inherit.as_deref());
}

/// Override `inherit_parent_placeholders` with `value` when it is a boolean.
///
/// Invalid values are logged and ignored.
pub fn apply_inherit_override(settings: &mut ThemeSettings, value: Option<&str>) {
    let Some(raw) = value else {
        return;
    };
    match parse_bool(raw) {
        Some(inherit) => {
            debug!(
                key = INHERIT_ENV_VAR,
                from = settings.inherit_parent_placeholders,
                to = inherit,
                "inheritance flag overridden"
            );
            settings.inherit_parent_placeholders = inherit;
        }
        None => warn!(key = INHERIT_ENV_VAR, value = raw, "invalid boolean env var, ignoring"),
    }
}

/// Parse a string as a boolean.
///
/// Accepts (case-insensitive): `true`/`1`/`yes`/`on` or `false`/`0`/`no`/`off`.
pub fn parse_bool(val: &str) -> Option<bool> {
    match val.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
