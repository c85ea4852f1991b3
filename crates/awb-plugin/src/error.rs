//! Error types for the plugin.
//!
//! Rendering paths never surface these: they log and render nothing.
//! Only settings submission and host routing return them.

use awb_core::{ConfigError, StoreError};
use thiserror::Error;

/// Error type for plugin operations.
#[derive(Debug, Error)]
pub enum PluginError {
    /// The option store failed.
    #[error("Option store error: {0}")]
    Store(#[from] StoreError),

    /// Configuration could not be loaded.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// No admin page is registered under the requested slug.
    #[error("Admin page '{0}' not found")]
    UnknownPage(String),

    /// A settings submission named a group with no registered options.
    #[error("Option page '{0}' is not registered")]
    UnregisteredOptionPage(String),

    /// A settings submission carried no `option_page` field.
    #[error("Settings submission is missing option_page")]
    MissingOptionPage,
}

/// Result type alias for plugin operations.
pub type PluginResult<T> = Result<T, PluginError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PluginError::UnknownPage("nope".to_string());
        assert_eq!(err.to_string(), "Admin page 'nope' not found");
    }

    #[test]
    fn test_from_store_error() {
        let err: PluginError = StoreError::Unavailable("down".to_string()).into();
        assert!(matches!(err, PluginError::Store(_)));
    }
}
