//! Admin menu placement.
//!
//! `MenuSettings` is the value passed through the `<prefix>menu_settings`
//! filter; `AdminMenu` is the request-scoped list of pages the host knows
//! how to route to.

use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;

use crate::host::HookContext;

/// Where a settings page is attached in the admin menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuLocation {
    /// Under the general options menu.
    Options,
    /// As a top-level menu entry.
    Menu,
    /// Under an arbitrary parent menu.
    Submenu,
    /// Anything else. Registers nothing.
    Other(String),
}

impl From<&str> for MenuLocation {
    fn from(location: &str) -> Self {
        match location {
            "options" => MenuLocation::Options,
            "menu" => MenuLocation::Menu,
            "submenu" => MenuLocation::Submenu,
            other => MenuLocation::Other(other.to_string()),
        }
    }
}

/// Menu placement arguments for the settings page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuSettings {
    pub location: MenuLocation,
    pub parent_slug: String,
    pub page_title: String,
    pub menu_title: String,
    pub capability: String,
    pub menu_slug: String,
    pub icon_url: String,
    pub position: Option<i32>,
}

/// Renders an admin page body.
pub type PageCallback = Arc<dyn Fn(&HookContext<'_>) -> String + Send + Sync>;

/// A page registered in the admin menu.
#[derive(Clone)]
pub struct MenuPage {
    pub slug: String,
    /// `None` for top-level pages.
    pub parent_slug: Option<String>,
    pub page_title: String,
    pub menu_title: String,
    pub capability: String,
    pub icon_url: String,
    pub position: Option<i32>,
    pub callback: PageCallback,
}

impl fmt::Debug for MenuPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MenuPage")
            .field("slug", &self.slug)
            .field("parent_slug", &self.parent_slug)
            .field("page_title", &self.page_title)
            .field("menu_title", &self.menu_title)
            .field("capability", &self.capability)
            .field("position", &self.position)
            .finish()
    }
}

/// Pages added to the admin menu during the current request.
#[derive(Default)]
pub struct AdminMenu {
    pages: RwLock<Vec<MenuPage>>,
}

impl AdminMenu {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a page. A page with the same slug is replaced.
    pub fn add_page(&self, page: MenuPage) {
        let mut pages = self.pages.write();
        pages.retain(|p| p.slug != page.slug);
        tracing::info!(
            "Registered admin page '{}' (parent: {:?})",
            page.slug,
            page.parent_slug
        );
        pages.push(page);
    }

    /// Look up a page by slug.
    pub fn page(&self, slug: &str) -> Option<MenuPage> {
        self.pages.read().iter().find(|p| p.slug == slug).cloned()
    }

    /// Slugs of all registered pages, in registration order.
    pub fn slugs(&self) -> Vec<String> {
        self.pages.read().iter().map(|p| p.slug.clone()).collect()
    }

    pub fn count(&self) -> usize {
        self.pages.read().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(slug: &str, title: &str) -> MenuPage {
        MenuPage {
            slug: slug.to_string(),
            parent_slug: Some("options-general.php".to_string()),
            page_title: title.to_string(),
            menu_title: title.to_string(),
            capability: "manage_options".to_string(),
            icon_url: String::new(),
            position: None,
            callback: Arc::new(|_: &HookContext<'_>| String::new()),
        }
    }

    #[test]
    fn test_location_from_str() {
        assert_eq!(MenuLocation::from("options"), MenuLocation::Options);
        assert_eq!(MenuLocation::from("menu"), MenuLocation::Menu);
        assert_eq!(MenuLocation::from("submenu"), MenuLocation::Submenu);
        assert_eq!(
            MenuLocation::from("sidebar"),
            MenuLocation::Other("sidebar".to_string())
        );
    }

    #[test]
    fn test_add_page_replaces_same_slug() {
        let menu = AdminMenu::new();
        menu.add_page(page("a", "First"));
        menu.add_page(page("b", "Other"));
        menu.add_page(page("a", "Second"));

        assert_eq!(menu.count(), 2);
        assert_eq!(menu.page("a").unwrap().page_title, "Second");
        assert!(menu.page("missing").is_none());
    }
}
