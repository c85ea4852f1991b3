//! Settings page markup.

use crate::host::HookContext;
use crate::html::{add_query_arg, esc_attr, esc_html, remove_query_arg};
use crate::settings::SettingsRegistry;

/// Render the tabbed settings form.
///
/// The tab strip is only shown when the schema has more than one section.
/// Section contents come from whatever was declared during `AdminInit`.
pub fn render_settings_page(registry: &SettingsRegistry, ctx: &HookContext<'_>) -> String {
    let page = registry.page_id();
    let schema = registry.schema();
    let current = registry.resolve_current_section(ctx.request);

    let mut html = format!("<div class=\"wrap\" id=\"{}\">\n", esc_attr(&page));
    html.push_str("<h2>Accessible Web A11Y Center</h2>\n");

    if schema.len() > 1 {
        let active = current
            .clone()
            .or_else(|| schema.first().map(|s| s.id.clone()));

        html.push_str("<h2 class=\"nav-tab-wrapper\">\n");
        for section in schema.iter() {
            let mut class = String::from("nav-tab");
            if active.as_deref() == Some(section.id.as_str()) {
                class.push_str(" nav-tab-active");
            }

            let mut link = add_query_arg(&ctx.request.uri, "tab", &section.id);
            if ctx.request.query_param("settings-updated").is_some() {
                link = remove_query_arg(&link, "settings-updated");
            }

            html.push_str(&format!(
                "<a href=\"{}\" class=\"{}\">{}</a>\n",
                esc_attr(&link),
                esc_attr(&class),
                esc_html(&section.title)
            ));
        }
        html.push_str("</h2>\n");
    }

    html.push_str("<form method=\"post\" action=\"options.php\" enctype=\"multipart/form-data\">\n");
    html.push_str(&ctx.settings_api.settings_fields(&page, ctx.request));
    html.push_str(&ctx.settings_api.do_settings_sections(&page, ctx.store));

    html.push_str("<p class=\"submit\">\n");
    html.push_str(&format!(
        "<input type=\"hidden\" name=\"tab\" value=\"{}\" />\n",
        esc_attr(current.as_deref().unwrap_or(""))
    ));
    html.push_str(
        "<input name=\"Submit\" type=\"submit\" class=\"button-primary\" value=\"Save Settings\" />\n",
    );
    html.push_str("</p>\n");
    html.push_str("</form>\n");
    html.push_str("</div>\n");
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::FieldRenderer;
    use crate::hooks::{HookRegistry, LifecycleEvent, DEFAULT_PRIORITY};
    use crate::host::Host;
    use crate::request::RequestContext;
    use awb_core::{FieldDefinition, MemoryOptionStore, Section};
    use std::sync::Arc;

    const PAGE_URI: &str = "options-general.php?page=aweb_badge_plugin_settings";

    /// A host wired with just the settings registry, optionally with a
    /// second `advanced` tab.
    fn host(store: MemoryOptionStore, with_tabs: bool) -> Host {
        let host = Host::new(Arc::new(store));
        if with_tabs {
            host.hooks().schema_filters().add(
                "aweb_badge_plugin_settings_fields",
                DEFAULT_PRIORITY,
                |mut schema| {
                    schema.insert(
                        Section::new("advanced", "Advanced & More")
                            .with_description("Extra options")
                            .with_field(FieldDefinition::new("color", "Color", "text")),
                    );
                    schema
                },
            );
        }

        let registry = Arc::new(SettingsRegistry::new("aweb_badge_plugin", "aweb_"));
        let renderer = Arc::new(FieldRenderer::new());

        let r = Arc::clone(&registry);
        host.hooks()
            .actions()
            .add(LifecycleEvent::Init, 11, move |ctx: &HookContext<'_>| {
                r.init_schema(ctx.store, ctx.hooks)
            });
        let r = Arc::clone(&registry);
        host.hooks().actions().add(
            LifecycleEvent::AdminInit,
            DEFAULT_PRIORITY,
            move |ctx: &HookContext<'_>| r.register(ctx, &renderer),
        );
        host.hooks().actions().add(
            LifecycleEvent::AdminMenu,
            DEFAULT_PRIORITY,
            move |ctx: &HookContext<'_>| registry.add_menu_item(ctx),
        );
        host
    }

    fn render(host: &Host, uri: &str) -> String {
        host.dispatch(&RequestContext::admin(uri).with_nonce("n0nce"))
            .unwrap()
            .html()
            .unwrap()
            .to_string()
    }

    #[test]
    fn test_single_section_has_no_tabs() {
        let host = host(MemoryOptionStore::new(), false);

        let html = render(&host, &format!("{}&tab=advanced", PAGE_URI));
        assert!(html.starts_with("<div class=\"wrap\" id=\"aweb_badge_plugin_settings\">\n<h2>Accessible Web A11Y Center</h2>\n"));
        assert!(!html.contains("nav-tab-wrapper"));
        assert!(html.contains("name=\"aweb_api_key\""));
        assert!(html.contains("<input type=\"hidden\" name=\"tab\" value=\"\" />"));
    }

    #[test]
    fn test_first_tab_active_without_tab_param() {
        let host = host(MemoryOptionStore::new(), true);
        let html = render(&host, PAGE_URI);

        assert!(html.contains(
            "<a href=\"options-general.php?page=aweb_badge_plugin_settings&amp;tab=standard\" class=\"nav-tab nav-tab-active\">Settings</a>"
        ));
        assert!(html.contains(
            "<a href=\"options-general.php?page=aweb_badge_plugin_settings&amp;tab=advanced\" class=\"nav-tab\">Advanced &amp; More</a>"
        ));
        assert!(html.contains("name=\"aweb_api_key\""));
        assert!(!html.contains("name=\"aweb_color\""));
    }

    #[test]
    fn test_requested_tab_is_active_and_echoed() {
        let host = host(MemoryOptionStore::new(), true);
        let html = render(&host, &format!("{}&tab=advanced", PAGE_URI));

        assert!(html.contains("class=\"nav-tab nav-tab-active\">Advanced &amp; More</a>"));
        assert!(html.contains("class=\"nav-tab\">Settings</a>"));
        assert!(html.contains("<p> Extra options</p>"));
        assert!(html.contains("name=\"aweb_color\""));
        assert!(!html.contains("name=\"aweb_api_key\""));
        assert!(html.contains("<input type=\"hidden\" name=\"tab\" value=\"advanced\" />"));
    }

    #[test]
    fn test_unknown_tab_behaves_like_no_tab() {
        let host = host(MemoryOptionStore::new(), true);
        let html = render(&host, &format!("{}&tab=bogus", PAGE_URI));

        assert!(html.contains("class=\"nav-tab nav-tab-active\">Settings</a>"));
        assert!(html.contains("name=\"aweb_api_key\""));
        assert!(html.contains("<input type=\"hidden\" name=\"tab\" value=\"\" />"));
    }

    #[test]
    fn test_tab_links_strip_settings_updated() {
        let host = host(MemoryOptionStore::new(), true);
        let html = render(&host, &format!("{}&settings-updated=true", PAGE_URI));

        assert!(!html.contains("settings-updated=true&amp;tab"));
        assert!(html.contains("href=\"options-general.php?page=aweb_badge_plugin_settings&amp;tab=advanced\""));
    }

    #[test]
    fn test_form_prefills_stored_value() {
        let host = host(MemoryOptionStore::with_values([("aweb_api_key", "abc")]), false);
        let html = render(&host, PAGE_URI);

        assert!(html.contains("<form method=\"post\" action=\"options.php\" enctype=\"multipart/form-data\">"));
        assert!(html.contains("name=\"option_page\" value=\"aweb_badge_plugin_settings\""));
        assert!(html.contains("name=\"_wpnonce\" value=\"n0nce\""));
        assert!(html.contains("name=\"aweb_api_key\" placeholder=\"Enter your API key\" value=\"abc\""));
        assert!(html.ends_with(
            "<input name=\"Submit\" type=\"submit\" class=\"button-primary\" value=\"Save Settings\" />\n</p>\n</form>\n</div>\n"
        ));
    }

    #[test]
    fn test_submission_from_tab_keeps_other_tabs() {
        let store = MemoryOptionStore::with_values([("aweb_api_key", "keep-me")]);
        let host = host(store, true);

        let request = RequestContext::admin_post(
            "options.php",
            [
                ("option_page", "aweb_badge_plugin_settings"),
                ("tab", "advanced"),
                ("aweb_color", "blue"),
                ("_wp_http_referer", "options-general.php?page=aweb_badge_plugin_settings&tab=advanced"),
            ],
        );
        host.dispatch(&request).unwrap();

        assert_eq!(host.store().get("aweb_color").unwrap(), Some("blue".to_string()));
        assert_eq!(host.store().get("aweb_api_key").unwrap(), Some("keep-me".to_string()));
    }

    #[test]
    fn test_render_without_registration_has_empty_form() {
        let hooks = HookRegistry::new();
        let registry = SettingsRegistry::new("aweb_badge_plugin", "aweb_");
        registry.init_schema(&MemoryOptionStore::new(), &hooks);

        let host = Host::new(Arc::new(MemoryOptionStore::new()));
        let registry = Arc::new(registry);
        host.hooks().actions().add(
            LifecycleEvent::AdminMenu,
            DEFAULT_PRIORITY,
            move |ctx: &HookContext<'_>| registry.add_menu_item(ctx),
        );

        let html = render(&host, PAGE_URI);
        assert!(!html.contains("form-table"));
        assert!(html.contains("<p class=\"submit\">"));
    }
}
