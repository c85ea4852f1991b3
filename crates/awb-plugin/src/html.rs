//! Escaping, sanitizing and query-string helpers for generated markup.

use url::form_urlencoded;

/// Escape text for use inside an HTML element.
pub fn esc_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escape text for use inside a double- or single-quoted attribute.
pub fn esc_attr(text: &str) -> String {
    esc_html(text)
}

/// Reduce user input to a single line of plain text.
///
/// Strips tags, turns line breaks and tabs into spaces, collapses runs of
/// whitespace and trims the ends.
pub fn sanitize_text_field(raw: &str) -> String {
    let mut stripped = String::with_capacity(raw.len());
    let mut in_tag = false;
    for c in raw.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if in_tag => {}
            _ => stripped.push(c),
        }
    }

    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Split a URI into (path, query, fragment) without decoding anything.
fn split_uri(uri: &str) -> (&str, &str, Option<&str>) {
    let (rest, fragment) = match uri.split_once('#') {
        Some((rest, fragment)) => (rest, Some(fragment)),
        None => (uri, None),
    };
    match rest.split_once('?') {
        Some((path, query)) => (path, query, fragment),
        None => (rest, "", fragment),
    }
}

/// Parse the query component of a URI into ordered pairs.
pub fn query_pairs(uri: &str) -> Vec<(String, String)> {
    let (_, query, _) = split_uri(uri);
    form_urlencoded::parse(query.as_bytes())
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}

fn rebuild_uri(path: &str, pairs: &[(String, String)], fragment: Option<&str>) -> String {
    let mut uri = path.to_string();
    if !pairs.is_empty() {
        let query = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(pairs.iter())
            .finish();
        uri.push('?');
        uri.push_str(&query);
    }
    if let Some(fragment) = fragment {
        uri.push('#');
        uri.push_str(fragment);
    }
    uri
}

/// Set `key` to `value` in the URI's query string.
///
/// An existing key keeps its position; duplicates of it are dropped. A new
/// key is appended. Works on relative URIs.
pub fn add_query_arg(uri: &str, key: &str, value: &str) -> String {
    let (path, _, fragment) = split_uri(uri);
    let mut pairs = query_pairs(uri);

    match pairs.iter().position(|(k, _)| k == key) {
        Some(pos) => {
            pairs[pos].1 = value.to_string();
            let mut seen = false;
            pairs.retain(|(k, _)| {
                if k != key {
                    return true;
                }
                let keep = !seen;
                seen = true;
                keep
            });
        }
        None => pairs.push((key.to_string(), value.to_string())),
    }

    rebuild_uri(path, &pairs, fragment)
}

/// Remove every occurrence of `key` from the URI's query string.
pub fn remove_query_arg(uri: &str, key: &str) -> String {
    let (path, _, fragment) = split_uri(uri);
    let pairs: Vec<_> = query_pairs(uri)
        .into_iter()
        .filter(|(k, _)| k != key)
        .collect();
    rebuild_uri(path, &pairs, fragment)
}
