//! The network boundary.
//!
//! [`Client`](crate::Client) hands each assembled request to a [`Transport`]
//! and only ever sees a status, a header map and a readable body back. The
//! production implementation drives async reqwest on a runtime it owns; tests
//! plug in a mock.

use std::io::{self, Read};
use std::sync::Arc;
use std::time::Duration;

use http::{HeaderMap, StatusCode};
use reqwest::Client;
use tokio::runtime::Runtime;

use crate::context::Context;
use crate::error::TransportError;
use crate::types::{OutgoingRequest, RequestBody};

/// Readable response body with an explicit release step.
pub trait ResponseBody: Read + Send {
    /// Release the underlying resources. Called exactly once, after reading.
    fn close(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl ResponseBody for io::Cursor<Vec<u8>> {}

/// What a transport returns for a request that reached the server.
pub struct TransportResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Box<dyn ResponseBody>,
}

/// Trait for executing HTTP requests.
///
/// Implementations must give up promptly once `request.context` is cancelled
/// or past its deadline, returning [`TransportError::Context`], and the body
/// they hand back must do the same while a read is blocked.
pub trait Transport: Send + Sync {
    fn execute(&self, request: OutgoingRequest) -> Result<TransportResponse, TransportError>;
}

/// Production transport using reqwest.
///
/// Owns a one-worker tokio runtime that keeps pooled connections alive.
/// Callers block in [`Runtime::block_on`], so the transport must not be used
/// from inside another runtime's async task; wrap calls in
/// `spawn_blocking` there. When the context ends first the pending future
/// is dropped, which closes its connection instead of leaving it running.
pub struct ReqwestTransport {
    client: Client,
    runtime: Arc<Runtime>,
}

impl ReqwestTransport {
    /// Create a new transport with the given overall request timeout.
    pub fn new(timeout: Duration, user_agent: Option<&str>) -> Result<Self, TransportError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("basehttp-io")
            .enable_all()
            .build()
            .map_err(TransportError::Runtime)?;

        let mut builder = Client::builder().timeout(timeout);
        if let Some(user_agent) = user_agent {
            builder = builder.user_agent(user_agent);
        }

        Ok(Self {
            client: builder.build()?,
            runtime: Arc::new(runtime),
        })
    }
}

impl Transport for ReqwestTransport {
    fn execute(&self, request: OutgoingRequest) -> Result<TransportResponse, TransportError> {
        let ctx = request.context;
        if let Some(err) = ctx.err() {
            return Err(err.into());
        }

        let mut req_builder = self
            .client
            .request(request.method, request.url)
            .headers(request.headers);

        if let Some(body) = request.body {
            let bytes = body.into_bytes().map_err(TransportError::RequestBody)?;
            req_builder = req_builder.body(bytes);
        }

        let response = self.runtime.block_on(ctx.run(req_builder.send()))??;

        Ok(TransportResponse {
            status: response.status(),
            headers: response.headers().clone(),
            body: Box::new(ReqwestBody {
                response: Some(response),
                chunk: io::Cursor::new(Vec::new()),
                ctx,
                runtime: Arc::clone(&self.runtime),
            }),
        })
    }
}

/// Response body that pulls chunks on the transport runtime, racing each
/// pull against the request context.
struct ReqwestBody {
    /// `None` once the body is finished or abandoned.
    response: Option<reqwest::Response>,
    chunk: io::Cursor<Vec<u8>>,
    ctx: Context,
    runtime: Arc<Runtime>,
}

impl Read for ReqwestBody {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        loop {
            let n = self.chunk.read(buf)?;
            if n > 0 || buf.is_empty() {
                return Ok(n);
            }

            let Some(response) = self.response.as_mut() else {
                return Ok(0);
            };

            match self.runtime.block_on(self.ctx.run(response.chunk())) {
                Ok(Ok(Some(chunk))) => self.chunk = io::Cursor::new(chunk.to_vec()),
                Ok(Ok(None)) => {
                    self.response = None;
                    return Ok(0);
                }
                Ok(Err(err)) => {
                    self.response = None;
                    return Err(io::Error::other(err));
                }
                Err(err) => {
                    // Dropping the response aborts the connection.
                    self.response = None;
                    return Err(err.into());
                }
            }
        }
    }
}

impl ResponseBody for ReqwestBody {
    fn close(&mut self) -> io::Result<()> {
        self.response = None;
        Ok(())
    }
}

/// Mock transport for testing.
///
/// Returns a configurable reply for every request and records what it was
/// sent.
#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::{Arc, Mutex};

    use http::HeaderValue;
    use url::Url;

    /// A request as the mock saw it, with the body drained.
    #[derive(Debug, Clone)]
    pub struct RecordedRequest {
        pub method: http::Method,
        pub url: Url,
        pub headers: HeaderMap,
        pub body: Option<Vec<u8>>,
    }

    /// How the mock's response body behaves.
    #[derive(Debug, Clone)]
    pub enum MockBody {
        Bytes(Vec<u8>),
        /// Every read fails with this message.
        FailRead(String),
        /// Reads succeed; closing fails with this message.
        FailClose(Vec<u8>, String),
    }

    #[derive(Debug, Clone)]
    pub struct MockReply {
        pub status: StatusCode,
        pub headers: HeaderMap,
        pub body: MockBody,
    }

    impl MockReply {
        pub fn new(status: u16, body: MockBody) -> Self {
            Self {
                status: StatusCode::from_u16(status).unwrap(),
                headers: HeaderMap::new(),
                body,
            }
        }

        pub fn ok(body: &str) -> Self {
            Self::new(200, MockBody::Bytes(body.as_bytes().to_vec()))
        }

        pub fn with_header(mut self, name: &'static str, value: &'static str) -> Self {
            self.headers.append(name, HeaderValue::from_static(value));
            self
        }
    }

    struct FailingBody {
        message: String,
    }

    impl Read for FailingBody {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::other(self.message.clone()))
        }
    }

    impl ResponseBody for FailingBody {}

    /// Body whose close fails; the flag records that close was attempted.
    pub struct FailingCloseBody {
        data: io::Cursor<Vec<u8>>,
        message: String,
        closed: Arc<Mutex<bool>>,
    }

    impl Read for FailingCloseBody {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.data.read(buf)
        }
    }

    impl ResponseBody for FailingCloseBody {
        fn close(&mut self) -> io::Result<()> {
            *self.closed.lock().unwrap() = true;
            Err(io::Error::other(self.message.clone()))
        }
    }

    #[derive(Clone)]
    pub struct MockTransport {
        reply: Arc<Mutex<Option<MockReply>>>,
        error_message: Arc<Mutex<Option<String>>>,
        recorded_requests: Arc<Mutex<Vec<RecordedRequest>>>,
        closed: Arc<Mutex<bool>>,
    }

    impl MockTransport {
        /// A transport that answers every request with an empty 200.
        pub fn new() -> Self {
            Self::replying(MockReply::ok(""))
        }

        pub fn replying(reply: MockReply) -> Self {
            Self {
                reply: Arc::new(Mutex::new(Some(reply))),
                error_message: Arc::new(Mutex::new(None)),
                recorded_requests: Arc::new(Mutex::new(Vec::new())),
                closed: Arc::new(Mutex::new(false)),
            }
        }

        /// Configure to fail all requests with an error.
        pub fn fail_with(self, message: impl Into<String>) -> Self {
            *self.error_message.lock().unwrap() = Some(message.into());
            self
        }

        pub fn recorded_requests(&self) -> Vec<RecordedRequest> {
            self.recorded_requests.lock().unwrap().clone()
        }

        /// Whether a `FailClose` body has been closed.
        pub fn close_attempted(&self) -> bool {
            *self.closed.lock().unwrap()
        }
    }

    impl Transport for MockTransport {
        fn execute(&self, request: OutgoingRequest) -> Result<TransportResponse, TransportError> {
            let ctx = request.context;
            let body = request
                .body
                .map(RequestBody::into_bytes)
                .transpose()
                .map_err(|e| TransportError::Other(e.to_string()))?;
            self.recorded_requests.lock().unwrap().push(RecordedRequest {
                method: request.method,
                url: request.url,
                headers: request.headers,
                body,
            });

            if let Some(err) = ctx.err() {
                return Err(err.into());
            }
            if let Some(message) = self.error_message.lock().unwrap().clone() {
                return Err(TransportError::Other(message));
            }

            let reply = self
                .reply
                .lock()
                .unwrap()
                .clone()
                .unwrap_or_else(|| MockReply::ok(""));
            let body: Box<dyn ResponseBody> = match reply.body {
                MockBody::Bytes(bytes) => Box::new(io::Cursor::new(bytes)),
                MockBody::FailRead(message) => Box::new(FailingBody { message }),
                MockBody::FailClose(bytes, message) => Box::new(FailingCloseBody {
                    data: io::Cursor::new(bytes),
                    message,
                    closed: self.closed.clone(),
                }),
            };

            Ok(TransportResponse {
                status: reply.status,
                headers: reply.headers,
                body,
            })
        }
    }
}
