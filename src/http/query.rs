//! Query string helpers

use url::form_urlencoded;

/// First value of `key` in a raw query string, empty when absent
///
/// Values are percent-decoded with `+` read as a space.
pub fn query_value(raw_query: Option<&str>, key: &str) -> String {
    raw_query
        .and_then(|query| {
            form_urlencoded::parse(query.as_bytes())
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.into_owned())
        })
        .unwrap_or_default()
}

/// Append the raw query to a path, keeping it byte for byte
pub fn with_query(path: &str, raw_query: Option<&str>) -> String {
    match raw_query {
        Some(query) if !query.is_empty() => format!("{path}?{query}"),
        _ => path.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_value_first_match_wins() {
        assert_eq!(query_value(Some("name=Users&name=orders"), "name"), "Users");
        assert_eq!(query_value(Some("a=1&name=my%20api"), "name"), "my api");
        assert_eq!(query_value(Some("a=1"), "name"), "");
        assert_eq!(query_value(None, "name"), "");
    }

    #[test]
    fn test_with_query() {
        assert_eq!(with_query("/foo", Some("x=1")), "/foo?x=1");
        assert_eq!(with_query("/foo", Some("")), "/foo");
        assert_eq!(with_query("/foo", None), "/foo");
    }
}
