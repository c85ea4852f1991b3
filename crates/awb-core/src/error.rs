//! Error types shared across the plugin crates.

use std::path::PathBuf;
use thiserror::Error;

/// Option store errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the backing file failed.
    #[error("Option store I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The backing file is not a JSON object of string values.
    #[error("Option store at {path:?} is corrupt: {message}")]
    Corrupt { path: PathBuf, message: String },

    /// Backend-specific failure.
    #[error("Option store unavailable: {0}")]
    Unavailable(String),
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No config directory found.
    #[error("Config directory not found")]
    NoConfigDir,

    /// IO error.
    #[error("Failed to read {path:?}: {message}")]
    Io { path: PathBuf, message: String },

    /// Parse error.
    #[error("Parse error in {path:?}: {message}")]
    Parse { path: PathBuf, message: String },
}

/// Rejection raised by a field validator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid value for '{field}': {message}")]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_display() {
        let err = ValidationError::new("api_key", "must not contain spaces");
        assert_eq!(
            err.to_string(),
            "Invalid value for 'api_key': must not contain spaces"
        );
    }

    #[test]
    fn test_store_error_display() {
        let err = StoreError::Corrupt {
            path: PathBuf::from("/tmp/options.json"),
            message: "expected object".to_string(),
        };
        assert!(err.to_string().contains("corrupt"));
    }
}
