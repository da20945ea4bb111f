use std::fmt;
use std::io::{self, Read};

use http::{HeaderMap, Method, StatusCode};
use serde::de::DeserializeOwned;
use url::Url;

use crate::context::Context;

/// Body of an outgoing request.
pub enum RequestBody {
    Bytes(Vec<u8>),
    /// Drained by the transport on the calling thread before sending.
    Reader(Box<dyn Read + Send>),
}

impl RequestBody {
    pub fn reader(reader: impl Read + Send + 'static) -> Self {
        RequestBody::Reader(Box::new(reader))
    }

    /// Drain the body into memory.
    pub fn into_bytes(self) -> io::Result<Vec<u8>> {
        match self {
            RequestBody::Bytes(bytes) => Ok(bytes),
            RequestBody::Reader(mut reader) => {
                let mut bytes = Vec::new();
                reader.read_to_end(&mut bytes)?;
                Ok(bytes)
            }
        }
    }
}

impl fmt::Debug for RequestBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestBody::Bytes(bytes) => f.debug_tuple("Bytes").field(&bytes.len()).finish(),
            RequestBody::Reader(_) => f.write_str("Reader(..)"),
        }
    }
}

impl From<Vec<u8>> for RequestBody {
    fn from(bytes: Vec<u8>) -> Self {
        RequestBody::Bytes(bytes)
    }
}

impl From<&[u8]> for RequestBody {
    fn from(bytes: &[u8]) -> Self {
        RequestBody::Bytes(bytes.to_vec())
    }
}

impl From<String> for RequestBody {
    fn from(text: String) -> Self {
        RequestBody::Bytes(text.into_bytes())
    }
}

impl From<&str> for RequestBody {
    fn from(text: &str) -> Self {
        RequestBody::Bytes(text.as_bytes().to_vec())
    }
}

impl From<Box<dyn Read + Send>> for RequestBody {
    fn from(reader: Box<dyn Read + Send>) -> Self {
        RequestBody::Reader(reader)
    }
}

/// A fully assembled request, handed to a [`Transport`](crate::Transport).
///
/// `headers` is the complete header set: client defaults merged with the
/// request's own headers. `context` bounds the send and the body read.
#[derive(Debug)]
pub struct OutgoingRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Option<RequestBody>,
    pub context: Context,
}

/// A completed HTTP exchange.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status: StatusCode,

    /// Owned snapshot of the response headers.
    pub headers: HeaderMap,

    /// Raw body bytes. Empty when the body could not be read.
    pub body: Vec<u8>,
}

impl Response {
    pub fn status_code(&self) -> u16 {
        self.status.as_u16()
    }

    /// Check if the status is in 200..=299
    pub fn is_success(&self) -> bool {
        (200..=299).contains(&self.status.as_u16())
    }

    /// First value of a header, if it is valid visible ASCII.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Body as text, replacing invalid UTF-8.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Try to deserialize the body into a specific type
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }
}
