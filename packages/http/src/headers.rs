use http::HeaderMap;

/// Merge default and request-specific headers into a new map.
///
/// Values are appended, never replaced: every default value comes first in
/// its original order, then every request value. Neither input is touched
/// and the result owns its values.
pub fn merge_headers(defaults: Option<&HeaderMap>, extra: Option<&HeaderMap>) -> HeaderMap {
    let capacity = defaults.map_or(0, HeaderMap::len) + extra.map_or(0, HeaderMap::len);
    let mut merged = HeaderMap::with_capacity(capacity);

    for source in [defaults, extra].into_iter().flatten() {
        for (name, value) in source {
            merged.append(name.clone(), value.clone());
        }
    }

    merged
}
