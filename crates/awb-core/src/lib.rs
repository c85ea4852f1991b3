//! Core types for the Accessible Web badge plugin.
//!
//! This crate contains the data model shared by the plugin crates:
//! - Field definitions and field type tags
//! - Sections and the ordered settings schema
//! - The option store trait and its implementations
//! - Configuration types
//! - Error types

mod config;
mod error;
mod field;
mod schema;
mod store;

pub use config::{config_dir, config_path, PluginConfig};
pub use error::{ConfigError, StoreError, ValidationError};
pub use field::{FieldDefinition, FieldType, FieldValidator};
pub use schema::{Schema, Section};
pub use store::{JsonFileOptionStore, MemoryOptionStore, OptionStore, OptionStoreExt};
