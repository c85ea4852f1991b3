//! Accessible Web A11Y Center plugin.
//!
//! This crate provides:
//! - A hook system with filter pipelines and lifecycle actions
//! - Host-side admin collaborators (settings API, admin menu, shortcodes)
//! - The settings registry, settings page and field renderers
//! - Badge script injection and the target-snippet shortcode
//! - The plugin lifecycle and its process-wide instance cell

pub mod badge;
pub mod error;
pub mod fields;
pub mod hooks;
pub mod host;
pub mod html;
pub mod menu;
pub mod page;
pub mod plugin;
pub mod request;
pub mod schema;
pub mod settings;
pub mod settings_api;
pub mod shortcode;
pub mod target_snippet;

#[cfg(test)]
mod test_support;

// Re-export commonly used types
pub use badge::{render_badge_snippet, BadgeInjector};
pub use error::{PluginError, PluginResult};
pub use fields::{FieldRenderFn, FieldRenderer};
pub use hooks::{ActionRegistry, FilterRegistry, HookRegistry, LifecycleEvent, DEFAULT_PRIORITY};
pub use host::{HookContext, Host, Response};
pub use menu::{AdminMenu, MenuLocation, MenuPage, MenuSettings};
pub use page::render_settings_page;
pub use plugin::{Plugin, PluginCell, PluginPaths};
pub use request::{Method, RequestContext, Route};
pub use schema::{build_settings_schema, API_KEY_FIELD, STANDARD_SECTION};
pub use settings::SettingsRegistry;
pub use settings_api::{SettingsApi, SubmitOutcome};
pub use shortcode::{shortcode_atts, ShortcodeAttrs, ShortcodeFn, ShortcodeRegistry};
pub use target_snippet::{TargetSnippet, SHORTCODE_TAG};

// Re-export awb_core types for convenience
pub use awb_core::{
    FieldDefinition, FieldType, FieldValidator, JsonFileOptionStore, MemoryOptionStore,
    OptionStore, OptionStoreExt, PluginConfig, Schema, Section,
};
