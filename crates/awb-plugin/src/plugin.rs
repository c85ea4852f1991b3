//! Plugin lifecycle.
//!
//! `Plugin` owns the components and wires them to a host's hooks once.
//! `PluginCell` guarantees a single live instance per process.

use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use awb_core::{OptionStore, PluginConfig};

use crate::badge::BadgeInjector;
use crate::fields::FieldRenderer;
use crate::hooks::{HookRegistry, LifecycleEvent, DEFAULT_PRIORITY};
use crate::host::{HookContext, Host};
use crate::request::RequestContext;
use crate::schema::API_KEY_FIELD;
use crate::settings::SettingsRegistry;
use crate::shortcode::{ShortcodeAttrs, ShortcodeRegistry};
use crate::target_snippet::{TargetSnippet, SHORTCODE_TAG};

/// Priority of schema initialization on `Init`, after shortcodes.
const SCHEMA_INIT_PRIORITY: i32 = 11;

/// Locations derived once from the plugin entry file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginPaths {
    /// The entry file itself.
    pub file: PathBuf,
    /// Directory holding the entry file.
    pub dir: PathBuf,
    /// `<dir>/assets`.
    pub assets_dir: PathBuf,
    /// Public URL of the assets directory, with a trailing slash.
    pub assets_url: String,
    /// `""` when debugging scripts, `.min` otherwise.
    pub script_suffix: &'static str,
    /// `<dir name>/<file name>`, as shown on the plugin list.
    pub basename: String,
}

impl PluginPaths {
    pub fn from_entry(entry: &Path, config: &PluginConfig) -> Self {
        let dir = entry
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        let dir_name = dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let file_name = entry
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let plugins_url = config.plugins_url.trim_end_matches('/');
        let assets_url = if dir_name.is_empty() {
            format!("{}/assets/", plugins_url)
        } else {
            format!("{}/{}/assets/", plugins_url, dir_name)
        };
        let basename = if dir_name.is_empty() {
            file_name
        } else {
            format!("{}/{}", dir_name, file_name)
        };

        Self {
            file: entry.to_path_buf(),
            assets_dir: dir.join("assets"),
            dir,
            assets_url,
            script_suffix: if config.script_debug { "" } else { ".min" },
            basename,
        }
    }
}

/// The plugin and its components.
pub struct Plugin {
    config: PluginConfig,
    paths: PluginPaths,
    settings: Arc<SettingsRegistry>,
    badge: BadgeInjector,
    target_snippet: Arc<TargetSnippet>,
    admin: OnceLock<Arc<FieldRenderer>>,
}

impl Plugin {
    pub fn new(config: PluginConfig, entry: &Path) -> Self {
        let paths = PluginPaths::from_entry(entry, &config);
        let api_key_option = format!("{}{}", config.option_prefix, API_KEY_FIELD);

        tracing::info!(
            "Loading {} v{} from {:?}",
            config.token,
            config.version,
            paths.file
        );

        Self {
            settings: Arc::new(SettingsRegistry::new(&config.token, &config.option_prefix)),
            badge: BadgeInjector::new(&api_key_option),
            target_snippet: Arc::new(TargetSnippet::new(api_key_option)),
            admin: OnceLock::new(),
            paths,
            config,
        }
    }

    pub fn config(&self) -> &PluginConfig {
        &self.config
    }

    pub fn paths(&self) -> &PluginPaths {
        &self.paths
    }

    pub fn version(&self) -> &str {
        &self.config.version
    }

    pub fn token(&self) -> &str {
        &self.config.token
    }

    pub fn settings(&self) -> &Arc<SettingsRegistry> {
        &self.settings
    }

    /// The admin helper, if an admin request has constructed it.
    pub fn admin(&self) -> Option<&Arc<FieldRenderer>> {
        self.admin.get()
    }

    /// The admin helper, constructed on first use by an admin request.
    ///
    /// Front-end requests get `None` and never construct it.
    pub fn ensure_admin(&self, request: &RequestContext) -> Option<&Arc<FieldRenderer>> {
        if !request.is_admin {
            return self.admin.get();
        }
        Some(self.admin.get_or_init(|| {
            tracing::debug!("Constructing admin field renderer");
            Arc::new(FieldRenderer::new())
        }))
    }

    /// Register every lifecycle callback and filter on `hooks`.
    pub fn wire(self: &Arc<Self>, hooks: &HookRegistry) {
        let actions = hooks.actions();

        let plugin = Arc::clone(self);
        actions.add(LifecycleEvent::Init, DEFAULT_PRIORITY, move |ctx: &HookContext<'_>| {
            plugin.init_shortcodes(ctx.shortcodes)
        });

        let settings = Arc::clone(&self.settings);
        actions.add(LifecycleEvent::Init, SCHEMA_INIT_PRIORITY, move |ctx: &HookContext<'_>| {
            settings.init_schema(ctx.store, ctx.hooks)
        });

        let plugin = Arc::clone(self);
        actions.add(LifecycleEvent::AdminInit, DEFAULT_PRIORITY, move |ctx: &HookContext<'_>| {
            if let Some(renderer) = plugin.ensure_admin(ctx.request) {
                plugin.settings.register(ctx, renderer);
            }
        });

        let settings = Arc::clone(&self.settings);
        actions.add(LifecycleEvent::AdminMenu, DEFAULT_PRIORITY, move |ctx: &HookContext<'_>| {
            settings.add_menu_item(ctx)
        });

        let plugin = Arc::clone(self);
        actions.add(LifecycleEvent::Footer, DEFAULT_PRIORITY, move |ctx: &HookContext<'_>| {
            if let Some(html) = plugin.maybe_inject_badge(ctx.store) {
                ctx.echo(&html);
            }
        });

        let settings = Arc::clone(&self.settings);
        hooks.link_filters().add(
            &format!("plugin_action_links_{}", self.paths.basename),
            DEFAULT_PRIORITY,
            move |links: Vec<String>| settings.add_settings_link(links),
        );

        tracing::debug!("Wired {} to host hooks", self.config.token);
    }

    /// Badge markup for the footer, if an API key is stored.
    pub fn maybe_inject_badge(&self, store: &dyn OptionStore) -> Option<String> {
        self.badge.maybe_inject(store)
    }

    /// Register the target-snippet shortcode.
    pub fn init_shortcodes(&self, shortcodes: &ShortcodeRegistry) {
        let handler = Arc::clone(&self.target_snippet);
        shortcodes.add(
            SHORTCODE_TAG,
            Arc::new(
                move |attrs: &ShortcodeAttrs, content: Option<&str>, store: &dyn OptionStore| {
                    handler.render(attrs, content, store)
                },
            ),
        );
    }
}

/// Holder for the process-wide plugin instance.
#[derive(Default)]
pub struct PluginCell {
    cell: OnceLock<Arc<Plugin>>,
}

impl PluginCell {
    pub const fn new() -> Self {
        Self {
            cell: OnceLock::new(),
        }
    }

    /// The plugin, constructed and wired into `host` on first access.
    ///
    /// Later calls return the same instance and ignore their arguments.
    pub fn instance(&self, host: &Host, config: PluginConfig, entry: &Path) -> Arc<Plugin> {
        Arc::clone(self.cell.get_or_init(|| {
            let plugin = Arc::new(Plugin::new(config, entry));
            plugin.wire(host.hooks());
            plugin
        }))
    }

    pub fn get(&self) -> Option<&Arc<Plugin>> {
        self.cell.get()
    }
}
