//! Field definitions for settings sections.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::error::ValidationError;

/// Control type tag for a field.
///
/// `text` is the only type with a built-in renderer. Any other tag is kept
/// verbatim so externally registered renderers can claim it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldType {
    /// Single-line text input.
    Text,
    /// Any tag without a built-in renderer.
    Custom(String),
}

impl FieldType {
    /// The string tag used for renderer dispatch.
    pub fn as_str(&self) -> &str {
        match self {
            FieldType::Text => "text",
            FieldType::Custom(tag) => tag,
        }
    }
}

impl From<&str> for FieldType {
    fn from(tag: &str) -> Self {
        match tag {
            "text" => FieldType::Text,
            other => FieldType::Custom(other.to_string()),
        }
    }
}

impl From<String> for FieldType {
    fn from(tag: String) -> Self {
        if tag == "text" {
            FieldType::Text
        } else {
            FieldType::Custom(tag)
        }
    }
}

impl From<FieldType> for String {
    fn from(field_type: FieldType) -> Self {
        field_type.as_str().to_string()
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

type ValidateFn = dyn Fn(&str) -> Result<String, ValidationError> + Send + Sync;

/// Sanitizing callback applied to a submitted raw value before it is stored.
#[derive(Clone)]
pub struct FieldValidator(Arc<ValidateFn>);

impl FieldValidator {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&str) -> Result<String, ValidationError> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Run the callback on a raw submitted value.
    pub fn validate(&self, raw: &str) -> Result<String, ValidationError> {
        (self.0)(raw)
    }
}

impl fmt::Debug for FieldValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FieldValidator(..)")
    }
}

/// One configurable scalar setting.
///
/// Identity is `id`; the stored option key is `<prefix><id>`.
#[derive(Clone)]
pub struct FieldDefinition {
    /// Unique identifier within the section.
    pub id: String,

    /// Row label shown next to the control.
    pub label: String,

    /// Help text shown under the control. May contain HTML.
    pub description: String,

    /// Control type tag.
    pub field_type: FieldType,

    /// Value shown when nothing has been stored yet.
    pub default: String,

    /// Placeholder text for the control.
    pub placeholder: Option<String>,

    /// Optional sanitizing callback used on submission.
    pub validator: Option<FieldValidator>,
}

impl FieldDefinition {
    /// Create a field with an empty description and default.
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        field_type: impl Into<FieldType>,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            description: String::new(),
            field_type: field_type.into(),
            default: String::new(),
            placeholder: None,
            validator: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = default.into();
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn with_validator(mut self, validator: FieldValidator) -> Self {
        self.validator = Some(validator);
        self
    }

    /// Storage key for this field under the given prefix.
    pub fn option_name(&self, prefix: &str) -> String {
        format!("{}{}", prefix, self.id)
    }
}

impl fmt::Debug for FieldDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDefinition")
            .field("id", &self.id)
            .field("label", &self.label)
            .field("field_type", &self.field_type)
            .field("default", &self.default)
            .field("placeholder", &self.placeholder)
            .field("has_validator", &self.validator.is_some())
            .finish()
    }
}
