//! Request context threaded into every request-dependent operation.
//!
//! Query and form values are never read ambiently; whatever needs the
//! `tab` parameter or posted form data receives a `RequestContext`.

use crate::html::{query_pairs, sanitize_text_field};

/// HTTP method of the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// Where the host should route a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Public page render.
    Front,
    /// Admin screen selected by the `page` query parameter.
    AdminPage(String),
    /// Admin request with no plugin page selected.
    AdminHome,
    /// Settings form submission endpoint.
    SettingsSubmit,
}

/// A single incoming request.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub method: Method,

    /// Request URI including the query string, e.g.
    /// `options-general.php?page=aweb_badge_plugin_settings`.
    pub uri: String,

    /// Decoded query parameters, in order.
    pub query: Vec<(String, String)>,

    /// Decoded form fields, in order. Empty for GET.
    pub post: Vec<(String, String)>,

    /// Whether this is an administrative request.
    pub is_admin: bool,

    /// Form token echoed into settings forms.
    pub nonce: String,
}

impl RequestContext {
    fn new(method: Method, uri: &str, is_admin: bool) -> Self {
        Self {
            method,
            uri: uri.to_string(),
            query: query_pairs(uri),
            post: Vec::new(),
            is_admin,
            nonce: generate_nonce(),
        }
    }

    /// Public GET request.
    pub fn front(uri: &str) -> Self {
        Self::new(Method::Get, uri, false)
    }

    /// Admin GET request.
    pub fn admin(uri: &str) -> Self {
        Self::new(Method::Get, uri, true)
    }

    /// Admin POST request with form fields.
    pub fn admin_post<I, K, V>(uri: &str, form: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut request = Self::new(Method::Post, uri, true);
        request.post = form.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
        request
    }

    pub fn with_nonce(mut self, nonce: impl Into<String>) -> Self {
        self.nonce = nonce.into();
        self
    }

    /// First query value for `name`.
    pub fn query_param(&self, name: &str) -> Option<&str> {
        find(&self.query, name)
    }

    /// First form value for `name`.
    pub fn post_param(&self, name: &str) -> Option<&str> {
        find(&self.post, name)
    }

    /// The requested tab: posted form data first, then the query string.
    ///
    /// Empty values are treated as absent. The value is sanitized but not
    /// checked against any schema.
    pub fn tab(&self) -> Option<String> {
        [self.post_param("tab"), self.query_param("tab")]
            .into_iter()
            .flatten()
            .map(sanitize_text_field)
            .find(|tab| !tab.is_empty())
    }

    /// Path component of the URI.
    pub fn path(&self) -> &str {
        let end = self.uri.find(|c| c == '?' || c == '#').unwrap_or(self.uri.len());
        &self.uri[..end]
    }

    pub fn route(&self) -> Route {
        if !self.is_admin {
            return Route::Front;
        }
        if self.method == Method::Post && self.path().ends_with("options.php") {
            return Route::SettingsSubmit;
        }
        match self.query_param("page") {
            Some(page) if !page.is_empty() => Route::AdminPage(page.to_string()),
            _ => Route::AdminHome,
        }
    }
}

fn find<'a>(pairs: &'a [(String, String)], name: &str) -> Option<&'a str> {
    pairs
        .iter()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.as_str())
}

fn generate_nonce() -> String {
    let mut nonce = uuid::Uuid::new_v4().simple().to_string();
    nonce.truncate(10);
    nonce
}
