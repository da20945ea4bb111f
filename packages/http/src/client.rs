use std::time::{Duration, Instant};

use http::header::{HeaderName, HeaderValue};
use http::HeaderMap;
use tracing::Dispatch;
use url::Url;

use crate::body::BodyGuard;
use crate::context::Context;
use crate::endpoint::build_url;
use crate::error::{Error, PrepareError};
use crate::headers::merge_headers;
use crate::method::validate_method;
use crate::options::ClientOptions;
use crate::query::QueryParams;
use crate::transport::{ReqwestTransport, Transport, TransportResponse};
use crate::types::{OutgoingRequest, RequestBody, Response};

/// HTTP client bound to a base URL.
///
/// Each request joins its path onto the base URL, appends its query
/// parameters, and merges its headers after the client's default headers.
/// Responses outside 2xx come back as [`Error::Status`] with the full
/// [`Response`] attached.
///
/// Requests take `&self`, so one client can serve many threads at once.
/// Changing the default headers takes `&mut self` and therefore cannot
/// overlap with a request in flight.
///
/// # Example
///
/// ```ignore
/// use basehttp::{Client, ClientOptions, Context, QueryParams};
///
/// let client = Client::new("https://api.example.com/api", ClientOptions::new())?;
///
/// // GET https://api.example.com/api/v1/items?id=42
/// let params = QueryParams::new().with("id", "42");
/// let response = client.get(&Context::background(), "v1/items", Some(&params), None)?;
/// ```
pub struct Client {
    base: Url,
    headers: HeaderMap,
    timeout: Duration,
    transport: Box<dyn Transport>,
    logger: Dispatch,
}

impl Client {
    /// Create a client that sends requests with reqwest.
    ///
    /// Calls block the current thread, so do not make them from inside an
    /// async task; use `spawn_blocking` there.
    pub fn new(base_url: &str, options: ClientOptions) -> Result<Self, Error> {
        let base = parse_base(base_url)?;
        let resolved = options.resolve();
        let transport = ReqwestTransport::new(resolved.timeout, resolved.user_agent.as_deref())
            .map_err(Error::Transport)?;

        Ok(Self {
            base,
            headers: resolved.headers,
            timeout: resolved.timeout,
            transport: Box::new(transport),
            logger: resolved.logger,
        })
    }

    /// Create a client with a custom transport.
    ///
    /// The configured timeout and user agent are only recorded; enforcing
    /// them is up to `transport`.
    pub fn with_transport(
        base_url: &str,
        options: ClientOptions,
        transport: impl Transport + 'static,
    ) -> Result<Self, Error> {
        let base = parse_base(base_url)?;
        let resolved = options.resolve();

        Ok(Self {
            base,
            headers: resolved.headers,
            timeout: resolved.timeout,
            transport: Box::new(transport),
            logger: resolved.logger,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn default_headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Append values to a default header, keeping any it already has.
    pub fn add_header(
        &mut self,
        name: HeaderName,
        values: impl IntoIterator<Item = HeaderValue>,
    ) -> &mut Self {
        for value in values {
            self.headers.append(name.clone(), value);
        }
        self
    }

    /// Append every value of `headers` to the default headers.
    pub fn add_headers(&mut self, headers: &HeaderMap) -> &mut Self {
        for (name, value) in headers {
            self.headers.append(name.clone(), value.clone());
        }
        self
    }

    /// Replace the whole default header set.
    pub fn replace_headers(&mut self, headers: HeaderMap) -> &mut Self {
        self.headers = headers;
        self
    }

    /// Assemble a request without sending it.
    ///
    /// Builds the URL, validates the method, then attaches the merged
    /// default and request headers. The first failing step decides the error.
    pub fn prepare_request(
        &self,
        ctx: &Context,
        method: &str,
        path: &str,
        params: Option<&QueryParams>,
        headers: Option<&HeaderMap>,
        body: Option<RequestBody>,
    ) -> Result<OutgoingRequest, PrepareError> {
        let url = build_url(Some(&self.base), path, params)?;
        let method = validate_method(method)?;

        Ok(OutgoingRequest {
            method,
            url,
            headers: merge_headers(Some(&self.headers), headers),
            body,
            context: ctx.clone(),
        })
    }

    /// Build, send and read one request.
    ///
    /// On a body read failure the error carries the status and headers; on a
    /// non-2xx status it carries the whole response. Nothing is retried.
    pub fn send_request(
        &self,
        ctx: &Context,
        method: &str,
        path: &str,
        params: Option<&QueryParams>,
        headers: Option<&HeaderMap>,
        body: Option<RequestBody>,
    ) -> Result<Response, Error> {
        let start = Instant::now();

        let request = match self.prepare_request(ctx, method, path, params, headers, body) {
            Ok(request) => request,
            Err(err) => {
                let query = params.map(QueryParams::encode).unwrap_or_default();
                self.log(|| {
                    tracing::error!(
                        error = %err,
                        method,
                        path,
                        query = query.as_str(),
                        "failed to prepare request"
                    )
                });
                return Err(Error::Prepare(err));
            }
        };

        let method = request.method.to_string();
        let url = request.url.to_string();

        let TransportResponse {
            status,
            headers,
            body,
        } = match self.transport.execute(request) {
            Ok(response) => response,
            Err(err) => {
                self.log(|| {
                    tracing::error!(
                        error = %err,
                        method = method.as_str(),
                        url = url.as_str(),
                        duration = ?start.elapsed(),
                        "failed to send request"
                    )
                });
                return Err(Error::Send(err));
            }
        };

        let mut body = BodyGuard::new(body, &self.logger, &method, &url);

        let bytes = match body.read_all(ctx) {
            Ok(bytes) => bytes,
            Err(err) => {
                self.log(|| {
                    tracing::error!(
                        error = %err,
                        method = method.as_str(),
                        url = url.as_str(),
                        status = status.as_u16(),
                        duration = ?start.elapsed(),
                        "failed to read response body"
                    )
                });
                return Err(Error::ReadBody {
                    response: Box::new(Response {
                        status,
                        headers,
                        body: Vec::new(),
                    }),
                    source: err,
                });
            }
        };

        self.log(|| {
            tracing::debug!(
                method = method.as_str(),
                url = url.as_str(),
                status = status.as_u16(),
                duration = ?start.elapsed(),
                resp_bytes = bytes.len(),
                "request completed"
            )
        });

        let response = Response {
            status,
            headers,
            body: bytes,
        };

        if !response.is_success() {
            return Err(Error::Status {
                response: Box::new(response),
            });
        }

        Ok(response)
    }

    /// Sends an HTTP GET request.
    pub fn get(
        &self,
        ctx: &Context,
        path: &str,
        params: Option<&QueryParams>,
        headers: Option<&HeaderMap>,
    ) -> Result<Response, Error> {
        self.send_request(ctx, "GET", path, params, headers, None)
    }

    /// Sends an HTTP HEAD request.
    pub fn head(
        &self,
        ctx: &Context,
        path: &str,
        params: Option<&QueryParams>,
        headers: Option<&HeaderMap>,
    ) -> Result<Response, Error> {
        self.send_request(ctx, "HEAD", path, params, headers, None)
    }

    /// Sends an HTTP OPTIONS request.
    pub fn options(
        &self,
        ctx: &Context,
        path: &str,
        params: Option<&QueryParams>,
        headers: Option<&HeaderMap>,
    ) -> Result<Response, Error> {
        self.send_request(ctx, "OPTIONS", path, params, headers, None)
    }

    /// Sends an HTTP POST request with an optional body.
    pub fn post(
        &self,
        ctx: &Context,
        path: &str,
        params: Option<&QueryParams>,
        headers: Option<&HeaderMap>,
        body: Option<RequestBody>,
    ) -> Result<Response, Error> {
        self.send_request(ctx, "POST", path, params, headers, body)
    }

    /// Sends an HTTP PUT request with an optional body.
    pub fn put(
        &self,
        ctx: &Context,
        path: &str,
        params: Option<&QueryParams>,
        headers: Option<&HeaderMap>,
        body: Option<RequestBody>,
    ) -> Result<Response, Error> {
        self.send_request(ctx, "PUT", path, params, headers, body)
    }

    /// Sends an HTTP PATCH request with an optional body.
    pub fn patch(
        &self,
        ctx: &Context,
        path: &str,
        params: Option<&QueryParams>,
        headers: Option<&HeaderMap>,
        body: Option<RequestBody>,
    ) -> Result<Response, Error> {
        self.send_request(ctx, "PATCH", path, params, headers, body)
    }

    /// Sends an HTTP DELETE request with an optional body.
    pub fn delete(
        &self,
        ctx: &Context,
        path: &str,
        params: Option<&QueryParams>,
        headers: Option<&HeaderMap>,
        body: Option<RequestBody>,
    ) -> Result<Response, Error> {
        self.send_request(ctx, "DELETE", path, params, headers, body)
    }

    fn log(&self, f: impl FnOnce()) {
        tracing::dispatcher::with_default(&self.logger, f);
    }
}

fn parse_base(base_url: &str) -> Result<Url, Error> {
    let base = Url::parse(base_url)?;
    if base.cannot_be_a_base() {
        return Err(Error::UnsupportedBaseUrl {
            url: base_url.to_string(),
        });
    }
    Ok(base)
}
