//! HTTP client configuration.

use std::time::Duration;

/// Default backend base URL, including the API prefix.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Settings for [`crate::HttpTransport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL every request path is appended to.
    pub base_url: String,
    /// Per-request timeout. Elapsing it counts as "no response".
    pub timeout: Duration,
}

impl ClientConfig {
    /// Creates a configuration for `base_url` with the default timeout.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Sets the per-request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Base URL without a trailing slash.
    #[must_use]
    pub fn normalized_base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// Checks that the base URL is an absolute http(s) URL.
    pub fn validate(&self) -> crate::ClientResult<()> {
        let url = self.normalized_base_url();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(crate::ClientError::Config(format!(
                "base URL must start with http:// or https://, got '{}'",
                self.base_url
            )));
        }
        if self.timeout.is_zero() {
            return Err(crate::ClientError::Config(
                "timeout must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}
