//! Settings registry.
//!
//! Holds the active schema and declares it to the host: which section is
//! current, which option keys the form may write, and where the settings
//! page sits in the admin menu.

use parking_lot::RwLock;
use std::sync::Arc;

use awb_core::{OptionStore, Schema};

use crate::fields::FieldRenderer;
use crate::hooks::HookRegistry;
use crate::host::HookContext;
use crate::menu::{MenuLocation, MenuPage, MenuSettings};
use crate::page::render_settings_page;
use crate::request::RequestContext;
use crate::schema::build_settings_schema;
use crate::settings_api::{FieldCallback, SectionCallback};

/// Settings registry for one plugin token.
pub struct SettingsRegistry {
    token: String,
    prefix: String,
    schema: RwLock<Schema>,
}

impl SettingsRegistry {
    pub fn new(token: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            prefix: prefix.into(),
            schema: RwLock::new(Schema::new()),
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Settings page slug, which is also the settings group name.
    pub fn page_id(&self) -> String {
        format!("{}_settings", self.token)
    }

    /// Build the schema and make it the active one, replacing any previous.
    pub fn init_schema(&self, store: &dyn OptionStore, hooks: &HookRegistry) {
        let schema = build_settings_schema(&self.token, &self.prefix, store, hooks);
        *self.schema.write() = schema;
    }

    /// Snapshot of the active schema.
    pub fn schema(&self) -> Schema {
        self.schema.read().clone()
    }

    /// The requested section, if the request names a known one.
    ///
    /// `None` means the caller falls back to the first section.
    pub fn resolve_current_section(&self, request: &RequestContext) -> Option<String> {
        let tab = request.tab()?;
        if self.schema.read().contains(&tab) {
            Some(tab)
        } else {
            tracing::debug!("Ignoring unknown settings tab '{}'", tab);
            None
        }
    }

    /// Declare the current section and its fields to the host.
    ///
    /// Only one section is registered per request: the resolved one, or the
    /// first when nothing resolves. Fields on other tabs are therefore never
    /// writable by a submission made from this tab.
    pub fn register(&self, ctx: &HookContext<'_>, renderer: &Arc<FieldRenderer>) {
        let schema = self.schema();
        let current = self.resolve_current_section(ctx.request);
        let section = match current.as_deref() {
            Some(id) => schema.get(id),
            None => schema.first(),
        };
        let Some(section) = section else {
            tracing::debug!("No settings sections to register");
            return;
        };

        let page = self.page_id();

        let description = section.description.clone();
        let section_callback: SectionCallback =
            Arc::new(move || format!("<p> {}</p>\n", description));
        ctx.settings_api
            .add_settings_section(&page, &section.id, &section.title, Some(section_callback));

        for field in &section.fields {
            let option_name = field.option_name(&self.prefix);
            ctx.settings_api
                .register_setting(&page, &option_name, field.validator.clone());

            let renderer = Arc::clone(renderer);
            let prefix = self.prefix.clone();
            let definition = field.clone();
            let field_callback: FieldCallback = Arc::new(move |store: &dyn OptionStore| {
                renderer.display_field(&definition, &prefix, store)
            });
            ctx.settings_api
                .add_settings_field(&page, &section.id, &field.id, &field.label, field_callback);
        }

        tracing::info!(
            "Registered settings section '{}' with {} field(s)",
            section.id,
            section.fields.len()
        );
    }

    /// Default menu placement passed through `<prefix>menu_settings`.
    pub fn menu_settings(&self, hooks: &HookRegistry) -> MenuSettings {
        let defaults = MenuSettings {
            location: MenuLocation::Options,
            parent_slug: "options-general.php".to_string(),
            page_title: "Accessible Web A11Y Center".to_string(),
            menu_title: "A11Y Center".to_string(),
            capability: "manage_options".to_string(),
            menu_slug: self.page_id(),
            icon_url: String::new(),
            position: None,
        };
        hooks
            .menu_filters()
            .apply(&format!("{}menu_settings", self.prefix), defaults)
    }

    /// Add the settings page to the admin menu.
    ///
    /// An unrecognized location registers nothing.
    pub fn add_menu_item(self: &Arc<Self>, ctx: &HookContext<'_>) {
        let args = self.menu_settings(ctx.hooks);

        let parent_slug = match &args.location {
            MenuLocation::Options | MenuLocation::Submenu => Some(args.parent_slug),
            MenuLocation::Menu => None,
            MenuLocation::Other(location) => {
                tracing::warn!("Unknown menu location '{}', settings page not added", location);
                return;
            }
        };

        let registry = Arc::clone(self);
        ctx.menu.add_page(MenuPage {
            slug: args.menu_slug,
            parent_slug,
            page_title: args.page_title,
            menu_title: args.menu_title,
            capability: args.capability,
            icon_url: args.icon_url,
            position: args.position,
            callback: Arc::new(move |ctx: &HookContext<'_>| render_settings_page(&registry, ctx)),
        });
    }

    /// Append the settings page link to the plugin's action links.
    pub fn add_settings_link(&self, mut links: Vec<String>) -> Vec<String> {
        links.push(format!(
            "<a href=\"options-general.php?page={}\">Settings</a>",
            self.page_id()
        ));
        links
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hooks::{LifecycleEvent, DEFAULT_PRIORITY};
    use crate::host::{Host, Response};
    use crate::menu::AdminMenu;
    use awb_core::{FieldDefinition, FieldValidator, MemoryOptionStore, Section, ValidationError};

    const TOKEN: &str = "aweb_badge_plugin";
    const PAGE: &str = "aweb_badge_plugin_settings";

    fn registry_with_tabs(hooks: &HookRegistry) -> SettingsRegistry {
        hooks
            .schema_filters()
            .add("aweb_badge_plugin_settings_fields", DEFAULT_PRIORITY, |mut schema| {
                schema.insert(
                    Section::new("advanced", "Advanced")
                        .with_field(FieldDefinition::new("color", "Color", "text"))
                        .with_field(FieldDefinition::new("size", "Size", "text")),
                );
                schema
            });
        let registry = SettingsRegistry::new(TOKEN, "aweb_");
        registry.init_schema(&MemoryOptionStore::new(), hooks);
        registry
    }

    /// Run `register` for `request` and return the writable keys.
    fn registered_keys(registry: &Arc<SettingsRegistry>, request: &RequestContext) -> Vec<String> {
        let host = Host::new(Arc::new(MemoryOptionStore::new()));
        let reg = Arc::clone(registry);
        let keys = Arc::new(parking_lot::Mutex::new(Vec::new()));
        let out = Arc::clone(&keys);
        host.hooks().actions().add(
            LifecycleEvent::AdminInit,
            DEFAULT_PRIORITY,
            move |ctx: &HookContext<'_>| {
                reg.register(ctx, &Arc::new(FieldRenderer::new()));
                *out.lock() = ctx.settings_api.registered_settings(PAGE);
            },
        );
        let _ = host.dispatch(request);
        let keys = keys.lock().clone();
        keys
    }

    #[test]
    fn test_page_id_and_settings_link() {
        let registry = SettingsRegistry::new(TOKEN, "aweb_");
        assert_eq!(registry.page_id(), PAGE);
        assert_eq!(
            registry.add_settings_link(vec!["Deactivate".to_string()]),
            vec![
                "Deactivate".to_string(),
                "<a href=\"options-general.php?page=aweb_badge_plugin_settings\">Settings</a>".to_string()
            ]
        );
    }

    #[test]
    fn test_resolve_current_section() {
        let registry = registry_with_tabs(&HookRegistry::new());

        let request = RequestContext::admin("options-general.php?page=p&tab=advanced");
        assert_eq!(registry.resolve_current_section(&request), Some("advanced".to_string()));

        let request = RequestContext::admin("options-general.php?page=p&tab=bogus");
        assert_eq!(registry.resolve_current_section(&request), None);

        let request = RequestContext::admin_post("options.php?tab=standard", [("tab", "advanced")]);
        assert_eq!(registry.resolve_current_section(&request), Some("advanced".to_string()));
    }

    #[test]
    fn test_register_first_section_without_tab() {
        let registry = Arc::new(registry_with_tabs(&HookRegistry::new()));
        let keys = registered_keys(&registry, &RequestContext::admin("index.php"));
        assert_eq!(keys, vec!["aweb_api_key"]);
    }

    #[test]
    fn test_register_only_requested_tab() {
        let registry = Arc::new(registry_with_tabs(&HookRegistry::new()));
        let keys = registered_keys(&registry, &RequestContext::admin("index.php?tab=advanced"));
        assert_eq!(keys, vec!["aweb_color", "aweb_size"]);
    }

    #[test]
    fn test_register_unknown_tab_falls_back_to_first() {
        let registry = Arc::new(registry_with_tabs(&HookRegistry::new()));
        let keys = registered_keys(&registry, &RequestContext::admin("index.php?tab=missing"));
        assert_eq!(keys, vec!["aweb_api_key"]);
    }

    #[test]
    fn test_register_single_section_ignores_tab() {
        let registry = SettingsRegistry::new(TOKEN, "aweb_");
        registry.init_schema(&MemoryOptionStore::new(), &HookRegistry::new());
        let registry = Arc::new(registry);

        let keys = registered_keys(&registry, &RequestContext::admin("index.php?tab=advanced"));
        assert_eq!(keys, vec!["aweb_api_key"]);
    }

    #[test]
    fn test_register_empty_schema_is_noop() {
        let registry = Arc::new(SettingsRegistry::new(TOKEN, "aweb_"));
        assert!(registered_keys(&registry, &RequestContext::admin("index.php")).is_empty());
    }

    #[test]
    fn test_init_schema_is_repeatable() {
        let hooks = HookRegistry::new();
        let registry = registry_with_tabs(&hooks);
        let first = registry.schema().ids();

        registry.init_schema(&MemoryOptionStore::new(), &hooks);
        assert_eq!(registry.schema().ids(), first);
    }

    #[test]
    fn test_menu_settings_defaults_and_filter() {
        let hooks = HookRegistry::new();
        let registry = SettingsRegistry::new(TOKEN, "aweb_");

        let defaults = registry.menu_settings(&hooks);
        assert_eq!(defaults.location, MenuLocation::Options);
        assert_eq!(defaults.parent_slug, "options-general.php");
        assert_eq!(defaults.menu_title, "A11Y Center");
        assert_eq!(defaults.menu_slug, PAGE);

        hooks
            .menu_filters()
            .add("aweb_menu_settings", DEFAULT_PRIORITY, |mut settings| {
                settings.location = MenuLocation::Menu;
                settings.position = Some(80);
                settings
            });
        let filtered = registry.menu_settings(&hooks);
        assert_eq!(filtered.location, MenuLocation::Menu);
        assert_eq!(filtered.position, Some(80));
    }

    fn menu_after(location: &'static str) -> Vec<(String, Option<String>)> {
        let host = Host::new(Arc::new(MemoryOptionStore::new()));
        host.hooks()
            .menu_filters()
            .add("aweb_menu_settings", DEFAULT_PRIORITY, move |mut settings| {
                settings.location = MenuLocation::from(location);
                settings
            });

        let registry = Arc::new(SettingsRegistry::new(TOKEN, "aweb_"));
        let pages = Arc::new(parking_lot::Mutex::new(Vec::new()));
        let out = Arc::clone(&pages);
        host.hooks().actions().add(
            LifecycleEvent::AdminMenu,
            DEFAULT_PRIORITY,
            move |ctx: &HookContext<'_>| {
                registry.add_menu_item(ctx);
                *out.lock() = page_summary(ctx.menu);
            },
        );
        let _ = host.dispatch(&RequestContext::admin("index.php"));
        let pages = pages.lock().clone();
        pages
    }

    fn page_summary(menu: &AdminMenu) -> Vec<(String, Option<String>)> {
        menu.slugs()
            .into_iter()
            .filter_map(|slug| menu.page(&slug))
            .map(|page| (page.slug, page.parent_slug))
            .collect()
    }

    #[test]
    fn test_add_menu_item_locations() {
        let submenu = vec![(PAGE.to_string(), Some("options-general.php".to_string()))];
        assert_eq!(menu_after("options"), submenu);
        assert_eq!(menu_after("submenu"), submenu);
        assert_eq!(menu_after("menu"), vec![(PAGE.to_string(), None)]);
        assert!(menu_after("sidebar").is_empty());
    }

    /// A host whose schema filter adds a validated `code` field to the
    /// standard section.
    fn host_with_validated_field(store: MemoryOptionStore) -> Host {
        let host = Host::new(Arc::new(store));
        host.hooks()
            .schema_filters()
            .add("aweb_badge_plugin_settings_fields", DEFAULT_PRIORITY, |mut schema| {
                let validator = FieldValidator::new(|raw: &str| {
                    let code = raw.trim();
                    if code.contains(' ') {
                        Err(ValidationError::new("code", "must be a single word"))
                    } else {
                        Ok(code.to_string())
                    }
                });
                schema.update("standard", |section| {
                    section
                        .fields
                        .push(FieldDefinition::new("code", "Code", "text").with_validator(validator));
                });
                schema
            });

        let registry = Arc::new(SettingsRegistry::new(TOKEN, "aweb_"));
        let r = Arc::clone(&registry);
        host.hooks()
            .actions()
            .add(LifecycleEvent::Init, 11, move |ctx: &HookContext<'_>| {
                r.init_schema(ctx.store, ctx.hooks)
            });
        let renderer = Arc::new(FieldRenderer::new());
        host.hooks().actions().add(
            LifecycleEvent::AdminInit,
            DEFAULT_PRIORITY,
            move |ctx: &HookContext<'_>| registry.register(ctx, &renderer),
        );
        host
    }

    fn submit_code(host: &Host, code: &str) -> crate::settings_api::SubmitOutcome {
        let request = RequestContext::admin_post(
            "options.php",
            [
                ("option_page", PAGE),
                ("aweb_api_key", "XYZ123"),
                ("aweb_code", code),
                ("_wp_http_referer", "options-general.php?page=aweb_badge_plugin_settings"),
            ],
        );
        match host.dispatch(&request).unwrap() {
            Response::Redirect { outcome, .. } => outcome,
            Response::Html(html) => panic!("expected a redirect, got {}", html),
        }
    }

    #[test]
    fn test_filter_validator_applies_on_submit() {
        let host = host_with_validated_field(MemoryOptionStore::new());

        let outcome = submit_code(&host, "  promo  ");
        assert!(outcome.errors.is_empty());
        assert_eq!(outcome.updated, vec!["aweb_api_key", "aweb_code"]);
        assert_eq!(host.store().get("aweb_code").unwrap(), Some("promo".to_string()));

        let outcome = submit_code(&host, "two words");
        assert_eq!(
            outcome.errors,
            vec![ValidationError::new("code", "must be a single word")]
        );
        assert_eq!(outcome.updated, vec!["aweb_api_key"]);
        assert_eq!(host.store().get("aweb_code").unwrap(), Some("promo".to_string()));
    }
}
