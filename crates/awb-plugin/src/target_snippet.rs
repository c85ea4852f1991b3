//! The `accessible_web_target_snippet` shortcode.
//!
//! Marks where on a page the badge should attach. Without inner content it
//! expands to a hidden placeholder; with content it wraps that content in
//! a text link. Nothing is emitted until an API key is stored.

use awb_core::OptionStore;

use crate::shortcode::{shortcode_atts, ShortcodeAttrs};

/// Tag authors type into content.
pub const SHORTCODE_TAG: &str = "accessible_web_target_snippet";

/// Attributes the shortcode accepts, with defaults. None yet.
const ACCEPTED_ATTRS: &[(&str, &str)] = &[];

const BUTTON_TARGET: &str = "<!-- Begin Accessible Web A11Y Center Button Target Snippet -->
<div data-awam-target style=\"display:none;\"></div>
<!-- End Accessible Web A11Y Center Button Target Snippet -->";

/// Handler for [`SHORTCODE_TAG`], gated on one option key.
#[derive(Debug, Clone)]
pub struct TargetSnippet {
    option_key: String,
}

impl TargetSnippet {
    pub fn new(option_key: impl Into<String>) -> Self {
        Self {
            option_key: option_key.into(),
        }
    }

    /// Expand one occurrence of the shortcode.
    ///
    /// Inner content is emitted as given; it was written by a content author.
    pub fn render(
        &self,
        attrs: &ShortcodeAttrs,
        content: Option<&str>,
        store: &dyn OptionStore,
    ) -> String {
        match store.get(&self.option_key) {
            Ok(Some(_)) => {}
            Ok(None) => return String::new(),
            Err(e) => {
                tracing::warn!("Skipping target snippet, failed to read '{}': {}", self.option_key, e);
                return String::new();
            }
        }

        let _attrs = shortcode_atts(ACCEPTED_ATTRS, attrs);

        match content {
            Some(content) if !content.is_empty() => format!(
                "<!-- Begin Accessible Web Text Only Target Snippet -->\
                 <a href=\"#\" data-awam-target>{}</a>\
                 <!-- End Accessible Web Text Only Target Snippet -->",
                content
            ),
            _ => BUTTON_TARGET.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use awb_core::MemoryOptionStore;

    fn handler() -> TargetSnippet {
        TargetSnippet::new("aweb_api_key")
    }

    #[test]
    fn test_absent_key_renders_nothing() {
        let store = MemoryOptionStore::new();
        let mut attrs = ShortcodeAttrs::new();
        attrs.insert("class".to_string(), "x".to_string());

        assert_eq!(handler().render(&attrs, None, &store), "");
        assert_eq!(handler().render(&attrs, Some("View"), &store), "");
    }

    #[test]
    fn test_button_target() {
        let store = MemoryOptionStore::with_values([("aweb_api_key", "XYZ123")]);
        let html = handler().render(&ShortcodeAttrs::new(), None, &store);

        insta::assert_snapshot!(html, @r###"
        <!-- Begin Accessible Web A11Y Center Button Target Snippet -->
        <div data-awam-target style="display:none;"></div>
        <!-- End Accessible Web A11Y Center Button Target Snippet -->
        "###);
    }

    #[test]
    fn test_text_target_wraps_content() {
        let store = MemoryOptionStore::with_values([("aweb_api_key", "XYZ123")]);
        let html = handler().render(
            &ShortcodeAttrs::new(),
            Some("View our Accessibility Center"),
            &store,
        );

        assert_eq!(
            html,
            "<!-- Begin Accessible Web Text Only Target Snippet -->\
             <a href=\"#\" data-awam-target>View our Accessibility Center</a>\
             <!-- End Accessible Web Text Only Target Snippet -->"
        );
    }

    #[test]
    fn test_empty_key_still_counts_as_present() {
        let store = MemoryOptionStore::with_values([("aweb_api_key", "")]);
        let html = handler().render(&ShortcodeAttrs::new(), Some(""), &store);
        assert!(html.contains("data-awam-target style=\"display:none;\""));
    }
}
