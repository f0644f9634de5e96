//! Settings error types.

use thiserror::Error;

/// Errors that reject a configuration source as a whole.
///
/// Problems with a single rule are not errors; they are reported through
/// [`crate::ValidationReport`].
#[derive(Debug, Error)]
pub enum SettingsError {
    /// Failed to read the settings file from disk.
    #[error("failed to read settings file: {0}")]
    Io(#[from] std::io::Error),
    /// The settings document (or the encoded rule list inside it) is not valid JSON.
    #[error("failed to parse settings JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// The JSON parsed but does not have the expected structure.
    #[error("invalid settings shape: {0}")]
    InvalidShape(String),
}

/// Result type for settings operations.
pub type Result<T> = std::result::Result<T, SettingsError>;
