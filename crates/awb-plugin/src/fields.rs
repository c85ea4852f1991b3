//! Field control rendering.
//!
//! Controls are looked up by the field's type tag in a dispatch table.
//! `text` is built in; other tags can be registered at runtime. A tag with
//! no renderer renders nothing.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use awb_core::{FieldDefinition, OptionStore, OptionStoreExt};

use crate::html::esc_attr;

/// Renders a control: `(field, option name, current value) -> markup`.
pub type FieldRenderFn = Arc<dyn Fn(&FieldDefinition, &str, &str) -> String + Send + Sync>;

/// Admin helper that turns field definitions into form controls.
pub struct FieldRenderer {
    renderers: RwLock<HashMap<String, FieldRenderFn>>,
}

impl FieldRenderer {
    /// Create a renderer with the built-in `text` control.
    pub fn new() -> Self {
        let renderer = Self {
            renderers: RwLock::new(HashMap::new()),
        };
        renderer.register_type("text", Arc::new(render_text));
        renderer
    }

    /// Register or replace the renderer for a type tag.
    pub fn register_type(&self, tag: &str, render: FieldRenderFn) {
        self.renderers.write().insert(tag.to_string(), render);
        tracing::debug!("Registered field renderer for type '{}'", tag);
    }

    pub fn has_type(&self, tag: &str) -> bool {
        self.renderers.read().contains_key(tag)
    }

    /// Render the control for `field`, pre-filled from the store.
    ///
    /// The stored value under `<prefix><id>` wins; the field default is used
    /// when nothing is stored.
    pub fn display_field(&self, field: &FieldDefinition, prefix: &str, store: &dyn OptionStore) -> String {
        let render = match self.renderers.read().get(field.field_type.as_str()) {
            Some(render) => Arc::clone(render),
            None => {
                tracing::debug!(
                    "No renderer for field '{}' of type '{}'",
                    field.id,
                    field.field_type
                );
                return String::new();
            }
        };

        let option_name = field.option_name(prefix);
        let value = store.get_or(&option_name, &field.default);
        render(field, &option_name, &value)
    }
}

impl Default for FieldRenderer {
    fn default() -> Self {
        Self::new()
    }
}

fn render_text(field: &FieldDefinition, option_name: &str, value: &str) -> String {
    let mut html = format!(
        "<input id=\"{}\" type=\"text\" name=\"{}\" placeholder=\"{}\" value=\"{}\" />\n",
        esc_attr(&field.id),
        esc_attr(option_name),
        esc_attr(field.placeholder.as_deref().unwrap_or("")),
        esc_attr(value)
    );
    html.push_str(&format!(
        "<label for=\"{}\"><span class=\"description\">{}</span></label>\n",
        esc_attr(&field.id),
        field.description
    ));
    html
}
