//! Client configuration.

use std::time::Duration;

/// Environment variable holding the API base URL.
pub const BASE_URL_ENV: &str = "SHIPDESK_API_BASE_URL";

/// Path of the token refresh endpoint.
pub const DEFAULT_REFRESH_PATH: &str = "/buysellapi/token/refresh/";

/// Configuration for talking to the shipdesk API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL without trailing slash; empty means relative paths only.
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// `User-Agent` header value.
    pub user_agent: String,
    /// Token refresh endpoint.
    pub refresh_path: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            timeout: Self::DEFAULT_TIMEOUT,
            user_agent: format!("shipdesk/{}", env!("CARGO_PKG_VERSION")),
            refresh_path: DEFAULT_REFRESH_PATH.to_string(),
        }
    }
}

impl ClientConfig {
    /// Default request timeout (15 seconds).
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

    /// Creates a config with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a config with the base URL taken from `SHIPDESK_API_BASE_URL`.
    #[must_use]
    pub fn from_env() -> Self {
        let base_url = std::env::var(BASE_URL_ENV).unwrap_or_default();
        Self::new().base_url(&base_url)
    }

    /// Sets the base URL. Surrounding whitespace and trailing slashes are
    /// removed.
    #[must_use]
    pub fn base_url(mut self, url: &str) -> Self {
        self.base_url = url.trim().trim_end_matches('/').to_string();
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the user agent.
    #[must_use]
    pub fn user_agent(mut self, user_agent: &str) -> Self {
        self.user_agent = user_agent.to_string();
        self
    }

    /// Sets the token refresh endpoint.
    #[must_use]
    pub fn refresh_path(mut self, path: &str) -> Self {
        self.refresh_path = path.to_string();
        self
    }

    /// Returns the timeout in milliseconds.
    #[must_use]
    pub fn timeout_ms(&self) -> u64 {
        u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX)
    }
}
