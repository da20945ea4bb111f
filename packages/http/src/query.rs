//! Multi-valued query parameters.

use std::collections::BTreeMap;

use url::form_urlencoded;

/// Query parameters: each name maps to an ordered list of values.
///
/// Names are kept sorted so encoding is deterministic. Values for one name
/// keep the order they were added in and are encoded as repeated keys
/// (`p=1&p=2`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    values: BTreeMap<String, Vec<String>>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode an already-encoded query string, keeping every pair.
    pub fn parse(query: &str) -> Self {
        form_urlencoded::parse(query.as_bytes())
            .into_owned()
            .collect()
    }

    /// Append a value, keeping any existing values for `name`.
    pub fn add(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.values
            .entry(name.into())
            .or_default()
            .push(value.into());
        self
    }

    /// Builder form of [`add`](Self::add).
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.add(name, value);
        self
    }

    /// Replace all values for `name` with a single value.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.values.insert(name.into(), vec![value.into()]);
        self
    }

    /// First value for `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values
            .get(name)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    pub fn get_all(&self, name: &str) -> &[String] {
        self.values.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn remove(&mut self, name: &str) -> Option<Vec<String>> {
        self.values.remove(name)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of distinct names.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Every `(name, value)` pair, names in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().flat_map(|(name, values)| {
            values
                .iter()
                .map(move |value| (name.as_str(), value.as_str()))
        })
    }

    /// Add every pair of `other` after the values already present.
    pub fn append(&mut self, other: &QueryParams) {
        for (name, value) in other.iter() {
            self.add(name, value);
        }
    }

    /// Encode as `application/x-www-form-urlencoded`, sorted by name.
    pub fn encode(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (name, value) in self.iter() {
            serializer.append_pair(name, value);
        }
        serializer.finish()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = QueryParams::new();
        params.extend(iter);
        params
    }
}

impl<K: Into<String>, V: Into<String>> Extend<(K, V)> for QueryParams {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (name, value) in iter {
            self.add(name, value);
        }
    }
}

impl<K: Into<String>, V: Into<String>, const N: usize> From<[(K, V); N]> for QueryParams {
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_keys_keep_order() {
        let params = QueryParams::new().with("p", "2").with("p", "1");
        assert_eq!(params.get_all("p"), ["2", "1"]);
        assert_eq!(params.get("p"), Some("2"));
        assert_eq!(params.encode(), "p=2&p=1");
    }

    #[test]
    fn encode_sorts_names_and_escapes() {
        let params = QueryParams::from([("q", "a b&c"), ("a", "1")]);
        assert_eq!(params.encode(), "a=1&q=a+b%26c");
    }

    #[test]
    fn parse_keeps_every_pair() {
        let params = QueryParams::parse("foo=1&bar=x%20y&foo=2");
        assert_eq!(params.get_all("foo"), ["1", "2"]);
        assert_eq!(params.get("bar"), Some("x y"));
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn append_adds_after_existing() {
        let mut params = QueryParams::parse("foo=1");
        params.append(&QueryParams::new().with("foo", "2").with("bar", "a"));
        assert_eq!(params.get_all("foo"), ["1", "2"]);
        assert_eq!(params.get_all("bar"), ["a"]);
    }

    #[test]
    fn set_and_remove() {
        let mut params = QueryParams::from([("k", "1"), ("k", "2")]);
        params.set("k", "3");
        assert_eq!(params.get_all("k"), ["3"]);
        assert_eq!(params.remove("k"), Some(vec!["3".to_string()]));
        assert!(params.is_empty());
        assert!(params.get_all("k").is_empty());
        assert_eq!(params.encode(), "");
    }
}
