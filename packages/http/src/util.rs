use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use http::HeaderValue;

use crate::error::PrepareError;

/// Base64 of `username:password`, as used in HTTP Basic authentication.
pub fn basic_auth_token(username: &str, password: &str) -> String {
    STANDARD.encode(format!("{username}:{password}"))
}

/// A complete `Authorization` value: `Basic <token>`.
pub fn basic_auth_header(username: &str, password: &str) -> Result<HeaderValue, PrepareError> {
    let mut value =
        HeaderValue::from_str(&format!("Basic {}", basic_auth_token(username, password)))?;
    value.set_sensitive(true);
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_encodes_credentials() {
        assert_eq!(basic_auth_token("user", "pass"), "dXNlcjpwYXNz");
        assert_eq!(basic_auth_token("", ""), "Og==");
        assert_eq!(basic_auth_token("a:b", "c"), "YTpiOmM=");
    }

    #[test]
    fn header_value_is_sensitive() {
        let value = basic_auth_header("user", "pass").unwrap();
        assert_eq!(value, "Basic dXNlcjpwYXNz");
        assert!(value.is_sensitive());
    }
}
