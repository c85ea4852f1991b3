//! Request driver.
//!
//! `Host` owns the process-wide registries and runs one request at a time
//! through the fixed lifecycle order: `Init`, then `AdminInit` and
//! `AdminMenu` for admin requests, then routing. Per-request collaborators
//! (settings declarations, admin menu, output buffer) are created fresh for
//! every dispatch and handed to callbacks through a `HookContext`.

use parking_lot::Mutex;
use std::sync::Arc;

use awb_core::OptionStore;

use crate::error::{PluginError, PluginResult};
use crate::hooks::{HookRegistry, LifecycleEvent};
use crate::menu::AdminMenu;
use crate::request::{RequestContext, Route};
use crate::settings_api::{SettingsApi, SubmitOutcome};
use crate::shortcode::{ShortcodeAttrs, ShortcodeRegistry};

/// Everything a lifecycle callback may touch during one request.
pub struct HookContext<'a> {
    pub request: &'a RequestContext,
    pub store: &'a dyn OptionStore,
    pub hooks: &'a HookRegistry,
    pub settings_api: &'a SettingsApi,
    pub menu: &'a AdminMenu,
    pub shortcodes: &'a ShortcodeRegistry,
    output: &'a Mutex<String>,
}

impl<'a> HookContext<'a> {
    /// Append markup to the page being rendered.
    pub fn echo(&self, html: &str) {
        self.output.lock().push_str(html);
    }
}

/// What a dispatched request produced.
#[derive(Debug)]
pub enum Response {
    /// Rendered markup.
    Html(String),
    /// Settings were processed; the browser goes to `location`.
    Redirect {
        location: String,
        outcome: SubmitOutcome,
    },
}

impl Response {
    /// The markup body, if this is an HTML response.
    pub fn html(&self) -> Option<&str> {
        match self {
            Response::Html(html) => Some(html),
            Response::Redirect { .. } => None,
        }
    }
}

/// Process-wide host state.
pub struct Host {
    store: Arc<dyn OptionStore>,
    hooks: HookRegistry,
    shortcodes: ShortcodeRegistry,
}

impl Host {
    pub fn new(store: Arc<dyn OptionStore>) -> Self {
        Self {
            store,
            hooks: HookRegistry::new(),
            shortcodes: ShortcodeRegistry::new(),
        }
    }

    pub fn store(&self) -> &dyn OptionStore {
        self.store.as_ref()
    }

    pub fn hooks(&self) -> &HookRegistry {
        &self.hooks
    }

    pub fn shortcodes(&self) -> &ShortcodeRegistry {
        &self.shortcodes
    }

    /// Run one request through the lifecycle and route it.
    pub fn dispatch(&self, request: &RequestContext) -> PluginResult<Response> {
        let settings_api = SettingsApi::new();
        let menu = AdminMenu::new();
        let output = Mutex::new(String::new());
        let ctx = HookContext {
            request,
            store: self.store.as_ref(),
            hooks: &self.hooks,
            settings_api: &settings_api,
            menu: &menu,
            shortcodes: &self.shortcodes,
            output: &output,
        };

        self.run_lifecycle(&ctx);

        let route = request.route();
        tracing::debug!("Dispatching {:?} {} as {:?}", request.method, request.uri, route);

        match route {
            Route::Front => {
                self.hooks.actions().run(LifecycleEvent::Footer, &ctx);
                Ok(Response::Html(std::mem::take(&mut *output.lock())))
            }
            Route::SettingsSubmit => {
                let outcome = settings_api.submit(request, self.store.as_ref())?;
                Ok(Response::Redirect {
                    location: outcome.redirect.clone(),
                    outcome,
                })
            }
            Route::AdminPage(slug) => {
                let page = menu.page(&slug).ok_or(PluginError::UnknownPage(slug))?;
                let body = (page.callback)(&ctx);
                let mut html = std::mem::take(&mut *output.lock());
                html.push_str(&body);
                Ok(Response::Html(html))
            }
            Route::AdminHome => Ok(Response::Html(std::mem::take(&mut *output.lock()))),
        }
    }

    /// Expand one shortcode occurrence on a front-end render.
    ///
    /// `Init` runs first so handlers registered there are available.
    pub fn do_shortcode(
        &self,
        request: &RequestContext,
        tag: &str,
        attrs: &ShortcodeAttrs,
        content: Option<&str>,
    ) -> Option<String> {
        let settings_api = SettingsApi::new();
        let menu = AdminMenu::new();
        let output = Mutex::new(String::new());
        let ctx = HookContext {
            request,
            store: self.store.as_ref(),
            hooks: &self.hooks,
            settings_api: &settings_api,
            menu: &menu,
            shortcodes: &self.shortcodes,
            output: &output,
        };
        self.hooks.actions().run(LifecycleEvent::Init, &ctx);

        self.shortcodes
            .invoke(tag, attrs, content, self.store.as_ref())
    }

    /// Action links shown for a plugin on the plugin list.
    pub fn plugin_action_links(&self, basename: &str, links: Vec<String>) -> Vec<String> {
        self.hooks
            .link_filters()
            .apply(&format!("plugin_action_links_{}", basename), links)
    }

    fn run_lifecycle(&self, ctx: &HookContext<'_>) {
        let actions = self.hooks.actions();
        actions.run(LifecycleEvent::Init, ctx);
        if ctx.request.is_admin {
            actions.run(LifecycleEvent::AdminInit, ctx);
            actions.run(LifecycleEvent::AdminMenu, ctx);
        }
    }
}
