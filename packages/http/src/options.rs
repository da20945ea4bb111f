//! Client construction options.

use std::time::Duration;

use http::HeaderMap;
use tracing::Dispatch;

/// Timeout used when none (or zero) is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Settings collected before a [`Client`](crate::Client) is built.
///
/// Each `with_*` call overwrites the previous value for that setting, so the
/// last call wins.
///
/// ```ignore
/// let options = ClientOptions::new()
///     .with_timeout(Duration::from_secs(5))
///     .with_logger(Dispatch::new(subscriber))
///     .with_headers(headers);
/// let client = Client::new("https://api.example.com", options)?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct ClientOptions {
    logger: Option<Dispatch>,
    timeout: Option<Duration>,
    headers: Option<HeaderMap>,
    user_agent: Option<String>,
}

/// [`ClientOptions`] with defaults filled in.
#[derive(Debug, Clone)]
pub struct ResolvedOptions {
    pub logger: Dispatch,
    pub timeout: Duration,
    pub headers: HeaderMap,
    pub user_agent: Option<String>,
}

impl ClientOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Route the client's diagnostics to this dispatcher.
    /// Without one the client logs nothing.
    pub fn with_logger(mut self, logger: Dispatch) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Overall timeout handed to the transport. Zero means [`DEFAULT_TIMEOUT`].
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Default headers sent with every request.
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = Some(headers);
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn resolve(self) -> ResolvedOptions {
        ResolvedOptions {
            logger: self.logger.unwrap_or_else(Dispatch::none),
            timeout: normalize_timeout(self.timeout),
            headers: self.headers.unwrap_or_default(),
            user_agent: self.user_agent,
        }
    }
}

fn normalize_timeout(timeout: Option<Duration>) -> Duration {
    match timeout {
        Some(timeout) if !timeout.is_zero() => timeout,
        _ => DEFAULT_TIMEOUT,
    }
}
