//! Error types for TAO Core
//!
//! Centralized error handling using thiserror.

use thiserror::Error;

/// Main error type for TAO Core
#[derive(Error, Debug)]
pub enum TaoError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Preference '{key}' holds a {found} value, not a {expected}")]
    TypeMismatch {
        key: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("{0} is not initialized")]
    NotInitialized(String),
}

/// Result type alias for TAO Core operations
pub type Result<T> = std::result::Result<T, TaoError>;
