//! # basehttp
//!
//! A thin HTTP client wrapper bound to one base URL.
//!
//! Every request goes through the same pipeline:
//!
//! 1. the path is joined onto the base URL path and cleaned
//!    (`/api` + `v1/../v2/items` → `/api/v2/items`),
//! 2. query parameters are added to any query already on the base,
//! 3. the method is validated and canonicalized,
//! 4. the client's default headers and the request's headers are merged with
//!    append semantics (a name set in both keeps both values, defaults first),
//! 5. the request is sent through a [`Transport`] and the whole body read.
//!
//! ## Example
//!
//! ```ignore
//! use basehttp::{Client, ClientOptions, Context, QueryParams};
//! use http::{HeaderMap, HeaderValue};
//! use std::time::Duration;
//!
//! let mut defaults = HeaderMap::new();
//! defaults.insert("accept", HeaderValue::from_static("application/json"));
//!
//! let client = Client::new(
//!     "https://api.example.com",
//!     ClientOptions::new()
//!         .with_timeout(Duration::from_secs(5))
//!         .with_headers(defaults),
//! )?;
//!
//! let ctx = Context::background().with_timeout(Duration::from_secs(2));
//! let params = QueryParams::new().with("id", "42");
//! match client.get(&ctx, "/v1/items", Some(&params), None) {
//!     Ok(response) => println!("{}", response.text()),
//!     Err(err) if err.is_status() => {
//!         let response = err.response().unwrap();
//!         eprintln!("rejected with {}", response.status);
//!     }
//!     Err(err) => eprintln!("request failed: {err}"),
//! }
//! ```
//!
//! ## Errors
//!
//! [`Error::Status`] and [`Error::ReadBody`] still carry a [`Response`]: the
//! first the complete response, the second its status and headers. Use
//! [`Error::kind`] or [`Error::response`] to tell them apart from requests
//! that never completed.
//!
//! ## Logging
//!
//! Diagnostics go through `tracing`, dispatched to the logger configured
//! with [`ClientOptions::with_logger`]. Without one the client is silent.

pub mod context;
pub mod endpoint;
pub mod error;
pub mod headers;
pub mod legacy;
pub mod method;
pub mod options;
pub mod query;
pub mod transport;
pub mod types;
pub mod util;

mod body;
mod client;

pub use client::Client;
pub use context::{CancelHandle, Context, ContextError};
pub use endpoint::build_url;
pub use error::{Error, ErrorKind, PrepareError, TransportError};
pub use headers::merge_headers;
pub use method::validate_method;
pub use options::{ClientOptions, ResolvedOptions, DEFAULT_TIMEOUT};
pub use query::QueryParams;
pub use transport::{ReqwestTransport, ResponseBody, Transport, TransportResponse};
pub use types::{OutgoingRequest, RequestBody, Response};
pub use util::{basic_auth_header, basic_auth_token};
