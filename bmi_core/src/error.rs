//! Error types for the bmi_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for bmi_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// SQLite error from the history store
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Preference file is unreadable or malformed
    #[error("Preferences error: {0}")]
    Preferences(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

/// Rejected measurement input.
///
/// The `Display` text is shown verbatim in the result area.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    #[error("Weight must be a number.")]
    WeightNotNumber,

    #[error("Please enter weight.")]
    WeightMissing,

    #[error("Height must be a number.")]
    HeightNotNumber,

    #[error("Please enter height.")]
    HeightMissing,
}
