//! Error type for the command-line host.

use awb_core::{ConfigError, StoreError};
use awb_plugin::PluginError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Plugin(#[from] PluginError),

    #[error("Option store error: {0}")]
    Store(#[from] StoreError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// No `--store` was given and no config directory exists.
    #[error("No option store location; pass --store or set store_path in config")]
    NoStorePath,

    /// The dispatched request did not produce the expected response kind.
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),
}

pub type CliResult<T> = Result<T, CliError>;
