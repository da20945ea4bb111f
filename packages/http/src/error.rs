//! Error types for request preparation, transport, and response handling.

use std::io;

use crate::context::ContextError;
use crate::types::Response;

/// Failures while assembling a request, before anything touches the network.
#[derive(thiserror::Error, Debug)]
pub enum PrepareError {
    #[error("http method is empty")]
    EmptyMethod,

    #[error("unsupported http method {0:?}")]
    UnsupportedMethod(String),

    #[error("base URL is missing")]
    MissingBase,

    #[error("base URL cannot carry a path")]
    BaseWithoutPath,

    #[error("Invalid header name: {0}")]
    InvalidHeaderName(#[from] http::header::InvalidHeaderName),

    #[error("Invalid header value: {0}")]
    InvalidHeaderValue(#[from] http::header::InvalidHeaderValue),
}

/// Failures reported by a [`Transport`](crate::Transport) while sending.
#[derive(thiserror::Error, Debug)]
pub enum TransportError {
    #[error(transparent)]
    Context(#[from] ContextError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("failed to read request body: {0}")]
    RequestBody(#[source] io::Error),

    #[error("failed to start transport runtime: {0}")]
    Runtime(#[source] io::Error),

    #[error("{0}")]
    Other(String),
}

/// Coarse classification of [`Error`] for programmatic matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The client could not be constructed.
    Config,
    /// The request could not be assembled.
    Prepare,
    /// The transport failed to deliver the request.
    Send,
    /// The response arrived but its body could not be read.
    ReadBody,
    /// The exchange completed with a status outside 200..=299.
    StatusNotSuccess,
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),

    #[error("base URL {url:?} cannot carry a path")]
    UnsupportedBaseUrl { url: String },

    #[error("failed to build transport: {0}")]
    Transport(#[source] TransportError),

    #[error("failed to prepare a request: {0}")]
    Prepare(#[from] PrepareError),

    #[error("failed to send a request: {0}")]
    Send(#[source] TransportError),

    /// Status and headers are kept; the body is empty.
    #[error("failed to read response body: {source}")]
    ReadBody {
        response: Box<Response>,
        #[source]
        source: io::Error,
    },

    /// The full response is kept for inspection.
    #[error("status code is not success: {}", .response.status.as_u16())]
    Status { response: Box<Response> },
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidBaseUrl(_) | Error::UnsupportedBaseUrl { .. } | Error::Transport(_) => {
                ErrorKind::Config
            }
            Error::Prepare(_) => ErrorKind::Prepare,
            Error::Send(_) => ErrorKind::Send,
            Error::ReadBody { .. } => ErrorKind::ReadBody,
            Error::Status { .. } => ErrorKind::StatusNotSuccess,
        }
    }

    pub fn is_status(&self) -> bool {
        self.kind() == ErrorKind::StatusNotSuccess
    }

    pub fn is_read_body(&self) -> bool {
        self.kind() == ErrorKind::ReadBody
    }

    /// The numeric status of a non-2xx response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Status { response } => Some(response.status.as_u16()),
            _ => None,
        }
    }

    /// The response that accompanied this error, if one was received.
    pub fn response(&self) -> Option<&Response> {
        match self {
            Error::ReadBody { response, .. } | Error::Status { response } => Some(response),
            _ => None,
        }
    }

    pub fn into_response(self) -> Option<Response> {
        match self {
            Error::ReadBody { response, .. } | Error::Status { response } => Some(*response),
            _ => None,
        }
    }
}
