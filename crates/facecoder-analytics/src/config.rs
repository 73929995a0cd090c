//! Public configuration for the analytics client.

use std::time::Duration;

/// Default bound on one encode exchange, retries included.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default number of retries after the first attempt.
pub const DEFAULT_MAX_RETRIES: u8 = 2;

/// Configuration for the analytics client.
///
/// # Example
///
/// ```
/// use facecoder_analytics::AnalyticsClientConfig;
/// use std::time::Duration;
///
/// let config = AnalyticsClientConfig::from_host_port("10.0.0.7", 5000)
///     .with_timeout(Duration::from_secs(60))
///     .with_max_retries(1);
/// ```
#[derive(Debug, Clone)]
pub struct AnalyticsClientConfig {
    /// Base URL of the analytics service, e.g. `http://127.0.0.1:5000`
    pub(crate) base_url: String,
    /// User agent string for HTTP requests
    pub(crate) user_agent: String,
    /// Bound on the whole exchange, retries included
    pub(crate) timeout: Duration,
    /// Maximum number of retry attempts for transient errors
    pub(crate) max_retries: u8,
    /// Base delay for exponential backoff
    pub(crate) retry_base_delay: Duration,
}

impl Default for AnalyticsClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            user_agent: concat!("facecoder-analytics/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout: DEFAULT_TIMEOUT,
            max_retries: DEFAULT_MAX_RETRIES,
            retry_base_delay: Duration::from_millis(500),
        }
    }
}

impl AnalyticsClientConfig {
    /// Create a new configuration with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Point the client at `http://{host}:{port}`.
    #[must_use]
    pub fn from_host_port(host: &str, port: u16) -> Self {
        Self::new().with_base_url(format!("http://{host}:{port}"))
    }

    /// Base URL of the analytics service.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Set the base URL of the analytics service.
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the user agent string for HTTP requests.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the request timeout.
    ///
    /// Defaults to 30 seconds.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the maximum number of retry attempts for transient errors.
    ///
    /// Defaults to 2 retries.
    #[must_use]
    pub const fn with_max_retries(mut self, retries: u8) -> Self {
        self.max_retries = retries;
        self
    }

    /// Set the base delay for exponential backoff retries.
    ///
    /// Defaults to 500ms.
    #[must_use]
    pub const fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_base_delay = delay;
        self
    }
}
