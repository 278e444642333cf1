//! Canonical percent-encoding used when building the string to sign

use std::borrow::Cow;

/// Percent-encode `value` so that only RFC 3986 unreserved characters remain
/// literal. Spaces become `%20`, `*` becomes `%2A` and `~` stays as is. When
/// `path` is set, `/` is kept literal as well.
pub fn encode_url(value: &str, path: bool) -> String {
    let encoded = urlencoding::encode(value);
    if path {
        encoded.replace("%2F", "/")
    } else {
        encoded.into_owned()
    }
}

/// Canonical form of a request path. The raw path is decoded first so an
/// already-escaped href is not escaped twice.
pub fn canonicalize_resource_path(raw_path: &str) -> String {
    if raw_path.is_empty() {
        return "/".to_string();
    }

    let decoded = urlencoding::decode(raw_path).unwrap_or(Cow::Borrowed(raw_path));
    encode_url(&decoded, true)
}

/// Canonical query string: encoded `key=value` pairs sorted by key and joined
/// with `&`. Pairs sharing a key keep their relative order.
pub fn canonicalize_query_string(params: &[(String, String)]) -> String {
    let mut encoded: Vec<(String, String)> = params
        .iter()
        .map(|(key, value)| (encode_url(key, false), encode_url(value, false)))
        .collect();
    encoded.sort_by(|a, b| a.0.cmp(&b.0));

    encoded
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("&")
}
