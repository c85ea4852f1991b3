//! Badge script injection.

use awb_core::OptionStore;

use crate::html::esc_attr;

/// Markup for the badge script loading the account identified by `api_key`.
///
/// An empty key renders nothing.
pub fn render_badge_snippet(api_key: &str) -> Option<String> {
    if api_key.is_empty() {
        return None;
    }

    Some(format!(
        "<!-- Begin Accessible Web A11Y Center Button Snippet -->\n\
         <script async defer id=\"aweb-script\" type=\"text/javascript\" \
         src=\"https://ramp.accessibleweb.com/badge/{}/script.js\"></script>\n\
         <!-- End Accessible Web A11Y Center Button Snippet -->\n",
        esc_attr(api_key)
    ))
}

/// Emits the badge on page renders once an API key is stored.
#[derive(Debug, Clone)]
pub struct BadgeInjector {
    option_key: String,
}

impl BadgeInjector {
    pub fn new(option_key: impl Into<String>) -> Self {
        Self {
            option_key: option_key.into(),
        }
    }

    pub fn option_key(&self) -> &str {
        &self.option_key
    }

    /// Badge markup for the current stored key, read fresh on every call.
    pub fn maybe_inject(&self, store: &dyn OptionStore) -> Option<String> {
        match store.get(&self.option_key) {
            Ok(Some(api_key)) => render_badge_snippet(&api_key),
            Ok(None) => None,
            Err(e) => {
                tracing::warn!("Skipping badge, failed to read '{}': {}", self.option_key, e);
                None
            }
        }
    }
}
