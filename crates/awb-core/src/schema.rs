//! Section and schema types.
//!
//! A schema is an ordered mapping from section id to section. Insertion
//! order decides tab order, and the first section is the default tab.

use indexmap::IndexMap;

use crate::field::FieldDefinition;

/// A titled group of fields, shown as one tab.
#[derive(Debug, Clone)]
pub struct Section {
    /// Unique identifier within the schema; doubles as the `tab` value.
    pub id: String,

    /// Tab and heading text.
    pub title: String,

    /// Intro markup rendered above the fields.
    pub description: String,

    /// Fields in display order.
    pub fields: Vec<FieldDefinition>,
}

impl Section {
    /// Create an empty section.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            fields: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_field(mut self, field: FieldDefinition) -> Self {
        self.fields.push(field);
        self
    }

    /// Look up a field by id.
    pub fn field(&self, id: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| f.id == id)
    }

    /// Remove a field by id. Returns the removed field.
    pub fn remove_field(&mut self, id: &str) -> Option<FieldDefinition> {
        let pos = self.fields.iter().position(|f| f.id == id)?;
        Some(self.fields.remove(pos))
    }
}

/// Ordered collection of sections.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    sections: IndexMap<String, Section>,
}

impl Schema {
    /// Create an empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a section.
    ///
    /// A section with an existing id is replaced in place and keeps its tab
    /// position; a new id is appended.
    pub fn insert(&mut self, section: Section) -> Option<Section> {
        self.sections.insert(section.id.clone(), section)
    }

    /// Remove a section, preserving the order of the rest.
    pub fn remove(&mut self, id: &str) -> Option<Section> {
        self.sections.shift_remove(id)
    }

    pub fn get(&self, id: &str) -> Option<&Section> {
        self.sections.get(id)
    }

    /// Edit a section in place. Returns `false` when `id` is unknown.
    ///
    /// The section keeps `id` even if `f` changes it; use `remove` and
    /// `insert` to rename a tab.
    pub fn update<F>(&mut self, id: &str, f: F) -> bool
    where
        F: FnOnce(&mut Section),
    {
        match self.sections.get_mut(id) {
            Some(section) => {
                f(section);
                if section.id != id {
                    tracing::warn!("Section '{}' cannot be renamed to '{}' in place", id, section.id);
                    section.id = id.to_string();
                }
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.sections.contains_key(id)
    }

    /// The first section in insertion order.
    pub fn first(&self) -> Option<&Section> {
        self.sections.first().map(|(_, section)| section)
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Sections in tab order.
    pub fn iter(&self) -> impl Iterator<Item = &Section> {
        self.sections.values()
    }

    /// Section ids in tab order.
    pub fn ids(&self) -> Vec<String> {
        self.sections.keys().cloned().collect()
    }
}

impl FromIterator<Section> for Schema {
    fn from_iter<I: IntoIterator<Item = Section>>(iter: I) -> Self {
        let mut schema = Schema::new();
        for section in iter {
            schema.insert(section);
        }
        schema
    }
}
