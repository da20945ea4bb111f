//! Per-request URL construction from the client's base endpoint.

use percent_encoding::percent_decode_str;
use url::Url;

use crate::error::PrepareError;
use crate::query::QueryParams;

/// Build the URL for one request.
///
/// The base is cloned, never modified. A non-empty `extra_path` is joined
/// onto the base path and the result cleaned (see [`join_path`]). The extra
/// path is literal text: `%`, `?` and spaces in it are escaped, never
/// interpreted. Non-empty `params` are added to whatever query the base
/// already carries.
pub fn build_url(
    base: Option<&Url>,
    extra_path: &str,
    params: Option<&QueryParams>,
) -> Result<Url, PrepareError> {
    let base = base.ok_or(PrepareError::MissingBase)?;
    let mut url = base.clone();

    if !extra_path.is_empty() {
        let joined = join_path(
            &percent_decode_str(url.path()).decode_utf8_lossy(),
            extra_path,
        );
        set_path_segments(&mut url, &joined)?;
    }

    if let Some(params) = params.filter(|p| !p.is_empty()) {
        let mut query = QueryParams::parse(url.query().unwrap_or(""));
        query.append(params);
        url.set_query(Some(&query.encode()));
    }

    Ok(url)
}

/// Replace the path of `url` with the decoded `path`, escaping each segment.
fn set_path_segments(url: &mut Url, path: &str) -> Result<(), PrepareError> {
    let mut segments = url
        .path_segments_mut()
        .map_err(|()| PrepareError::BaseWithoutPath)?;
    segments.clear();
    let path = path.trim_start_matches('/');
    if !path.is_empty() {
        segments.extend(path.split('/'));
    }
    Ok(())
}

/// Join two path fragments with a separator and clean the result.
///
/// Empty fragments are skipped. A leading separator on `extra` does not
/// reset to the root: `join_path("/api", "/v1")` is `/api/v1`.
pub fn join_path(base: &str, extra: &str) -> String {
    match (base.is_empty(), extra.is_empty()) {
        (true, true) => String::new(),
        (true, false) => clean_path(extra),
        (false, true) => clean_path(base),
        (false, false) => clean_path(&format!("{base}/{extra}")),
    }
}

/// Lexically normalize a slash-separated path.
///
/// Collapses repeated separators, drops `.` segments, resolves `..` against
/// the preceding segment and removes the trailing separator. `..` at the
/// start of a rooted path is dropped; at the start of a relative path it is
/// kept. An empty result is `/` for rooted input and `.` otherwise.
pub fn clean_path(path: &str) -> String {
    if path.is_empty() {
        return ".".to_string();
    }

    let rooted = path.starts_with('/');
    let mut segments: Vec<&str> = Vec::new();

    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => match segments.last() {
                Some(&last) if last != ".." => {
                    segments.pop();
                }
                _ if rooted => {}
                _ => segments.push(".."),
            },
            _ => segments.push(segment),
        }
    }

    let joined = segments.join("/");
    match (rooted, joined.is_empty()) {
        (true, _) => format!("/{joined}"),
        (false, true) => ".".to_string(),
        (false, false) => joined,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(raw: &str) -> Url {
        Url::parse(raw).unwrap()
    }

    #[test]
    fn missing_base_is_rejected() {
        assert!(matches!(
            build_url(None, "x", None),
            Err(PrepareError::MissingBase)
        ));
    }

    #[test]
    fn empty_inputs_copy_the_base() {
        let base = parse("https://api.example.com/api?foo=1");
        let mut built = build_url(Some(&base), "", None).unwrap();
        assert_eq!(built, base);

        built.set_path("/changed");
        built.set_query(Some("x=y"));
        assert_eq!(base.path(), "/api");
        assert_eq!(base.query(), Some("foo=1"));
    }

    #[test]
    fn empty_params_keep_base_query_untouched() {
        let base = parse("https://h/api?b=2&a=1");
        let built = build_url(Some(&base), "", Some(&QueryParams::new())).unwrap();
        assert_eq!(built.query(), Some("b=2&a=1"));
    }

    #[test]
    fn leading_separator_collapses_onto_base() {
        let base = parse("https://h/api");
        let built = build_url(Some(&base), "/v12//items", None).unwrap();
        assert_eq!(built.path(), "/api/v12/items");
    }

    #[test]
    fn relative_traversal_is_resolved() {
        let base = parse("https://h/base");
        let built = build_url(Some(&base), "v1/../v2/items", None).unwrap();
        assert_eq!(built.path(), "/base/v2/items");
    }

    #[test]
    fn traversal_never_climbs_above_root() {
        let base = parse("https://h/a");
        let built = build_url(Some(&base), "../../../b", None).unwrap();
        assert_eq!(built.path(), "/b");
    }

    #[test]
    fn trailing_separator_is_dropped() {
        let base = parse("https://h/");
        let built = build_url(Some(&base), "items/", None).unwrap();
        assert_eq!(built.path(), "/items");
        assert_eq!(built.as_str(), "https://h/items");
    }

    #[test]
    fn params_are_added_to_existing_query() {
        let base = parse("https://h/api?foo=1");
        let params = QueryParams::new()
            .with("foo", "2")
            .with("bar", "a")
            .with("bar", "b");
        let built = build_url(Some(&base), "", Some(&params)).unwrap();

        let query = QueryParams::parse(built.query().unwrap());
        let mut foo = query.get_all("foo").to_vec();
        foo.sort();
        assert_eq!(foo, ["1", "2"]);
        let mut bar = query.get_all("bar").to_vec();
        bar.sort();
        assert_eq!(bar, ["a", "b"]);
        assert_eq!(base.query(), Some("foo=1"));
    }

    #[test]
    fn path_and_query_together() {
        let base = parse("http://host/api");
        let params = QueryParams::new().with("p", "1").with("p", "2");
        let built = build_url(Some(&base), "v1/items", Some(&params)).unwrap();
        assert_eq!(built.as_str(), "http://host/api/v1/items?p=1&p=2");
    }

    #[test]
    fn special_characters_in_path_are_escaped() {
        let base = parse("http://host/");
        let built = build_url(Some(&base), "a b/c?d", None).unwrap();
        assert_eq!(built.path(), "/a%20b/c%3Fd");
        assert_eq!(built.query(), None);
    }

    #[test]
    fn percent_in_path_is_literal() {
        let base = parse("http://host/api");
        let built = build_url(Some(&base), "50%off", None).unwrap();
        assert_eq!(built.path(), "/api/50%25off");

        let built = build_url(Some(&base), "a%2Fb", None).unwrap();
        assert_eq!(built.path(), "/api/a%252Fb");
    }

    #[test]
    fn escaped_base_path_survives_join() {
        let base = parse("http://host/my%20api");
        let built = build_url(Some(&base), "v1/items", None).unwrap();
        assert_eq!(built.path(), "/my%20api/v1/items");
    }

    #[test]
    fn base_without_path_is_rejected() {
        let base = parse("mailto:ops@example.com");
        assert!(matches!(
            build_url(Some(&base), "x", None),
            Err(PrepareError::BaseWithoutPath)
        ));
    }

    #[test]
    fn clean_path_cases() {
        let cases = [
            ("", "."),
            ("/", "/"),
            ("//", "/"),
            ("a/b/", "a/b"),
            ("/a/./b", "/a/b"),
            ("/a/b/..", "/a"),
            ("/../a", "/a"),
            ("../a", "../a"),
            ("a/../..", ".."),
            ("a/..", "."),
            ("/a//b///c", "/a/b/c"),
        ];
        for (input, expected) in cases {
            assert_eq!(clean_path(input), expected, "input {input:?}");
        }
    }

    #[test]
    fn join_path_skips_empty_fragments() {
        assert_eq!(join_path("", ""), "");
        assert_eq!(join_path("", "a//b"), "a/b");
        assert_eq!(join_path("/a/", ""), "/a");
        assert_eq!(join_path("/", "x"), "/x");
    }
}
