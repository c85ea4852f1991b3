//! Request-scoped settings registration and form processing.
//!
//! Plugins declare sections, fields and writable options here during
//! `AdminInit`. The settings page renders from these declarations, and the
//! submission endpoint only writes options that were declared in the same
//! request.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use awb_core::{FieldValidator, OptionStore, ValidationError};

use crate::error::{PluginError, PluginResult};
use crate::html::{add_query_arg, esc_attr, esc_html};
use crate::request::RequestContext;

/// Renders a section's intro markup.
pub type SectionCallback = Arc<dyn Fn() -> String + Send + Sync>;

/// Renders one field's control from the current option values.
pub type FieldCallback = Arc<dyn Fn(&dyn OptionStore) -> String + Send + Sync>;

struct RegisteredSection {
    id: String,
    title: String,
    callback: Option<SectionCallback>,
}

struct RegisteredField {
    id: String,
    label: String,
    callback: FieldCallback,
}

/// An option key writable through a settings group.
#[derive(Debug, Clone)]
pub struct RegisteredSetting {
    pub key: String,
    pub validator: Option<FieldValidator>,
}

/// Result of processing a settings submission.
#[derive(Debug, Clone, Default)]
pub struct SubmitOutcome {
    /// Keys written, in registration order.
    pub updated: Vec<String>,
    /// Validator rejections; the stored value was left untouched.
    pub errors: Vec<ValidationError>,
    /// Keys the store refused to write; other keys were still processed.
    pub failed: Vec<String>,
    /// Where to send the browser next.
    pub redirect: String,
}

/// Declarations made for the current request.
#[derive(Default)]
pub struct SettingsApi {
    /// page -> sections, in registration order.
    sections: RwLock<HashMap<String, Vec<RegisteredSection>>>,
    /// (page, section) -> fields, in registration order.
    fields: RwLock<HashMap<(String, String), Vec<RegisteredField>>>,
    /// group -> writable options.
    groups: RwLock<HashMap<String, Vec<RegisteredSetting>>>,
}

impl SettingsApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a section on a settings page. Same id on the same page replaces.
    pub fn add_settings_section(
        &self,
        page: &str,
        id: &str,
        title: &str,
        callback: Option<SectionCallback>,
    ) {
        let mut sections = self.sections.write();
        let list = sections.entry(page.to_string()).or_default();
        let section = RegisteredSection {
            id: id.to_string(),
            title: title.to_string(),
            callback,
        };
        match list.iter().position(|s| s.id == id) {
            Some(pos) => list[pos] = section,
            None => list.push(section),
        }
    }

    /// Declare a field inside a section of a settings page.
    pub fn add_settings_field(
        &self,
        page: &str,
        section: &str,
        id: &str,
        label: &str,
        callback: FieldCallback,
    ) {
        let mut fields = self.fields.write();
        let list = fields
            .entry((page.to_string(), section.to_string()))
            .or_default();
        list.retain(|f| f.id != id);
        list.push(RegisteredField {
            id: id.to_string(),
            label: label.to_string(),
            callback,
        });
    }

    /// Mark an option key as writable through `group`.
    pub fn register_setting(&self, group: &str, key: &str, validator: Option<FieldValidator>) {
        let mut groups = self.groups.write();
        let list = groups.entry(group.to_string()).or_default();
        list.retain(|s| s.key != key);
        list.push(RegisteredSetting {
            key: key.to_string(),
            validator,
        });
    }

    /// Option keys writable through `group`, in registration order.
    pub fn registered_settings(&self, group: &str) -> Vec<String> {
        self.groups
            .read()
            .get(group)
            .map(|list| list.iter().map(|s| s.key.clone()).collect())
            .unwrap_or_default()
    }

    /// Section ids declared on `page`, in registration order.
    pub fn section_ids(&self, page: &str) -> Vec<String> {
        self.sections
            .read()
            .get(page)
            .map(|list| list.iter().map(|s| s.id.clone()).collect())
            .unwrap_or_default()
    }

    /// Field ids declared in a section, in registration order.
    pub fn field_ids(&self, page: &str, section: &str) -> Vec<String> {
        self.fields
            .read()
            .get(&(page.to_string(), section.to_string()))
            .map(|list| list.iter().map(|f| f.id.clone()).collect())
            .unwrap_or_default()
    }

    /// Hidden inputs identifying the group and echoing the form token.
    pub fn settings_fields(&self, group: &str, request: &RequestContext) -> String {
        let mut html = String::new();
        html.push_str(&format!(
            "<input type=\"hidden\" name=\"option_page\" value=\"{}\" />\n",
            esc_attr(group)
        ));
        html.push_str("<input type=\"hidden\" name=\"action\" value=\"update\" />\n");
        html.push_str(&format!(
            "<input type=\"hidden\" id=\"_wpnonce\" name=\"_wpnonce\" value=\"{}\" />\n",
            esc_attr(&request.nonce)
        ));
        html.push_str(&format!(
            "<input type=\"hidden\" name=\"_wp_http_referer\" value=\"{}\" />\n",
            esc_attr(&request.uri)
        ));
        html
    }

    /// Render every section declared on `page` with its fields.
    pub fn do_settings_sections(&self, page: &str, store: &dyn OptionStore) -> String {
        // Snapshot callbacks so none run under a lock.
        let sections: Vec<(String, String, Option<SectionCallback>)> = match self.sections.read().get(page) {
            Some(list) => list
                .iter()
                .map(|s| (s.id.clone(), s.title.clone(), s.callback.clone()))
                .collect(),
            None => return String::new(),
        };

        let mut html = String::new();
        for (id, title, callback) in sections {
            if !title.is_empty() {
                html.push_str(&format!("<h2>{}</h2>\n", esc_html(&title)));
            }
            if let Some(callback) = callback {
                html.push_str(&callback());
            }

            let fields: Vec<(String, FieldCallback)> = self
                .fields
                .read()
                .get(&(page.to_string(), id))
                .map(|list| {
                    list.iter()
                        .map(|f| (f.label.clone(), Arc::clone(&f.callback)))
                        .collect()
                })
                .unwrap_or_default();
            if fields.is_empty() {
                continue;
            }

            html.push_str("<table class=\"form-table\" role=\"presentation\">\n");
            for (label, callback) in fields {
                html.push_str(&format!(
                    "<tr><th scope=\"row\">{}</th><td>{}</td></tr>\n",
                    label,
                    callback(store)
                ));
            }
            html.push_str("</table>\n");
        }
        html
    }

    /// Process a settings form submission.
    ///
    /// Writes every option registered under the posted `option_page`. A key
    /// missing from the form is written as an empty string. A validator
    /// rejection leaves that key's stored value untouched. A store failure
    /// is recorded in `failed` and the remaining keys are still written, so
    /// a submission can be partially applied.
    pub fn submit(
        &self,
        request: &RequestContext,
        store: &dyn OptionStore,
    ) -> PluginResult<SubmitOutcome> {
        let group = request
            .post_param("option_page")
            .ok_or(PluginError::MissingOptionPage)?;

        let settings: Vec<RegisteredSetting> = self
            .groups
            .read()
            .get(group)
            .cloned()
            .ok_or_else(|| PluginError::UnregisteredOptionPage(group.to_string()))?;

        let mut outcome = SubmitOutcome::default();
        for setting in settings {
            let raw = request.post_param(&setting.key).unwrap_or("");
            let value = match &setting.validator {
                Some(validator) => match validator.validate(raw) {
                    Ok(value) => value,
                    Err(e) => {
                        tracing::warn!("Rejected value for '{}': {}", setting.key, e);
                        outcome.errors.push(e);
                        continue;
                    }
                },
                None => raw.to_string(),
            };
            match store.set(&setting.key, &value) {
                Ok(()) => outcome.updated.push(setting.key),
                Err(e) => {
                    tracing::error!("Failed to save '{}': {}", setting.key, e);
                    outcome.failed.push(setting.key);
                }
            }
        }

        let referer = request
            .post_param("_wp_http_referer")
            .filter(|r| !r.is_empty())
            .unwrap_or("options-general.php");
        outcome.redirect = add_query_arg(referer, "settings-updated", "true");

        tracing::info!(
            "Saved settings group '{}': {} updated, {} rejected, {} failed",
            group,
            outcome.updated.len(),
            outcome.errors.len(),
            outcome.failed.len()
        );
        Ok(outcome)
    }
}
