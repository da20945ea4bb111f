use http::Method;

use crate::error::PrepareError;

/// Methods a request may use.
pub const SUPPORTED_METHODS: [Method; 9] = [
    Method::GET,
    Method::POST,
    Method::PUT,
    Method::PATCH,
    Method::DELETE,
    Method::HEAD,
    Method::OPTIONS,
    Method::TRACE,
    Method::CONNECT,
];

/// Canonicalize a method token to its uppercase form.
///
/// Whitespace is not trimmed. Errors name the input as given.
pub fn validate_method(method: &str) -> Result<Method, PrepareError> {
    if method.is_empty() {
        return Err(PrepareError::EmptyMethod);
    }

    let upper = method.to_ascii_uppercase();
    SUPPORTED_METHODS
        .iter()
        .find(|supported| supported.as_str() == upper)
        .cloned()
        .ok_or_else(|| PrepareError::UnsupportedMethod(method.to_string()))
}
