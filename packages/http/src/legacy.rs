//! Deprecated single-value API kept for older callers.
//!
//! [`LegacyClient`] maps the old `send_*` calls, which take string maps for
//! headers and query parameters, onto [`Client::send_request`]. New code
//! should use [`Client`] directly.
#![allow(deprecated)]

use std::collections::BTreeMap;
use std::time::Duration;

use http::header::{HeaderName, HeaderValue};
use http::{HeaderMap, StatusCode};
use serde::{Deserialize, Serialize};

use crate::client::Client;
use crate::context::Context;
use crate::error::{Error, PrepareError};
use crate::headers::merge_headers;
use crate::options::ClientOptions;
use crate::query::QueryParams;

#[deprecated(note = "use http::header::CONTENT_TYPE")]
pub const CONTENT_TYPE_HEADER: &str = "Content-Type";

#[deprecated(note = "use a literal \"application/json\" header value")]
pub const CONTENT_TYPE_JSON: &str = "application/json";

#[deprecated(note = "use http::header::AUTHORIZATION")]
pub const AUTHORIZATION_HEADER: &str = "Authorization";

/// One value per header name.
#[deprecated(note = "use http::HeaderMap")]
pub type Headers = BTreeMap<String, String>;

/// One value per parameter name.
#[deprecated(note = "use QueryParams")]
pub type Params = BTreeMap<String, String>;

#[deprecated]
pub type Href = String;

#[deprecated]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub href: Href,
}

/// Pagination links of a collection response.
#[deprecated]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinksResponse {
    #[serde(rename = "self")]
    pub self_link: Link,
    pub first: Link,
    pub last: Link,
    pub prev: Link,
    pub next: Link,
}

/// Pagination counters of a collection response.
#[deprecated]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetaResponse {
    pub total_count: i64,
    pub page_count: i64,
    pub current_page: i64,
    pub per_page: i64,
}

#[deprecated(note = "use basic_auth_token")]
pub fn prepare_basic_auth(username: &str, password: &str) -> String {
    crate::util::basic_auth_token(username, password)
}

/// The old client shape: string-map headers, `(body, status)` results.
#[deprecated(note = "use Client")]
pub struct LegacyClient {
    client: Client,
    headers: Headers,
}

impl LegacyClient {
    /// `timeout_secs` of `None` uses the default timeout.
    pub fn new(base_url: &str, timeout_secs: Option<u64>) -> Result<Self, Error> {
        let mut options = ClientOptions::new();
        if let Some(secs) = timeout_secs {
            options = options.with_timeout(Duration::from_secs(secs));
        }
        Ok(Self::from_client(Client::new(base_url, options)?))
    }

    pub fn from_client(client: Client) -> Self {
        Self {
            client,
            headers: Headers::new(),
        }
    }

    /// Set a header sent with every request, replacing any earlier value.
    pub fn set_header(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn send_get(
        &self,
        path: &str,
        params: &Params,
        headers: &Headers,
    ) -> Result<(Vec<u8>, StatusCode), Error> {
        self.send("GET", path, None, params, headers)
    }

    pub fn send_post(
        &self,
        path: &str,
        json_data: &[u8],
        params: &Params,
        headers: &Headers,
    ) -> Result<(Vec<u8>, StatusCode), Error> {
        self.send("POST", path, Some(json_data), params, headers)
    }

    pub fn send_put(
        &self,
        path: &str,
        json_data: &[u8],
        params: &Params,
        headers: &Headers,
    ) -> Result<(Vec<u8>, StatusCode), Error> {
        self.send("PUT", path, Some(json_data), params, headers)
    }

    pub fn send_patch(
        &self,
        path: &str,
        json_data: &[u8],
        params: &Params,
        headers: &Headers,
    ) -> Result<(Vec<u8>, StatusCode), Error> {
        self.send("PATCH", path, Some(json_data), params, headers)
    }

    pub fn send_delete(
        &self,
        path: &str,
        params: &Params,
        headers: &Headers,
    ) -> Result<(Vec<u8>, StatusCode), Error> {
        self.send("DELETE", path, None, params, headers)
    }

    fn send(
        &self,
        method: &str,
        path: &str,
        body: Option<&[u8]>,
        params: &Params,
        headers: &Headers,
    ) -> Result<(Vec<u8>, StatusCode), Error> {
        let request_headers = merge_headers(
            Some(&to_header_map(&self.headers)?),
            Some(&to_header_map(headers)?),
        );
        let params: QueryParams = params.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();

        let response = self.client.send_request(
            &Context::background(),
            method,
            path,
            Some(&params),
            Some(&request_headers),
            body.map(Into::into),
        )?;

        Ok((response.body, response.status))
    }
}

fn to_header_map(headers: &Headers) -> Result<HeaderMap, PrepareError> {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        map.insert(
            HeaderName::from_bytes(name.as_bytes())?,
            HeaderValue::from_str(value)?,
        );
    }
    Ok(map)
}
