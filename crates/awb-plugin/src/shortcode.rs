//! Shortcode handler registry.
//!
//! Parsing shortcodes out of content is the host's job. This registry only
//! maps tags to handlers and normalizes their attributes.

use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use awb_core::OptionStore;

/// Attributes parsed from a shortcode tag.
pub type ShortcodeAttrs = BTreeMap<String, String>;

/// Handler: `(attributes, inner content, options) -> markup`.
pub type ShortcodeFn =
    Arc<dyn Fn(&ShortcodeAttrs, Option<&str>, &dyn OptionStore) -> String + Send + Sync>;

/// Registered shortcode handlers, by tag.
#[derive(Default)]
pub struct ShortcodeRegistry {
    handlers: RwLock<HashMap<String, ShortcodeFn>>,
}

impl ShortcodeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler. Re-registering a tag replaces its handler.
    pub fn add(&self, tag: &str, handler: ShortcodeFn) {
        self.handlers.write().insert(tag.to_string(), handler);
        tracing::debug!("Registered shortcode [{}]", tag);
    }

    pub fn remove(&self, tag: &str) -> bool {
        self.handlers.write().remove(tag).is_some()
    }

    pub fn exists(&self, tag: &str) -> bool {
        self.handlers.read().contains_key(tag)
    }

    /// Expand one shortcode occurrence. `None` if the tag is unknown.
    pub fn invoke(
        &self,
        tag: &str,
        attrs: &ShortcodeAttrs,
        content: Option<&str>,
        store: &dyn OptionStore,
    ) -> Option<String> {
        let handler = self.handlers.read().get(tag).cloned()?;
        Some(handler(attrs, content, store))
    }
}

/// Merge caller attributes over declared defaults.
///
/// Only declared attribute names survive; undeclared ones are dropped.
pub fn shortcode_atts(defaults: &[(&str, &str)], attrs: &ShortcodeAttrs) -> ShortcodeAttrs {
    defaults
        .iter()
        .map(|(name, default)| {
            let value = attrs
                .get(*name)
                .cloned()
                .unwrap_or_else(|| default.to_string());
            (name.to_string(), value)
        })
        .collect()
}
