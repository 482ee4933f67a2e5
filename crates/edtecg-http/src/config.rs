//! Client configuration.

use std::time::Duration;

use edtecg_core::ApiUrl;

/// API base URL used when none is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Per-request timeout used when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Settings for the HTTP transport.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL every endpoint path is resolved against.
    pub api_url: ApiUrl,
    /// Timeout applied to each request, refresh calls included.
    pub timeout: Duration,
    /// `User-Agent` header value.
    pub user_agent: String,
}

impl ClientConfig {
    pub fn new(api_url: ApiUrl) -> Self {
        Self {
            api_url,
            timeout: DEFAULT_TIMEOUT,
            user_agent: concat!("edtecg/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ClientConfig::new(ApiUrl::new(DEFAULT_API_URL).unwrap());
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert!(config.user_agent.starts_with("edtecg/"));
    }

    #[test]
    fn builders_override() {
        let config = ClientConfig::new(ApiUrl::new(DEFAULT_API_URL).unwrap())
            .with_timeout(Duration::from_millis(30_000))
            .with_user_agent("edtecg-cli/test");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.user_agent, "edtecg-cli/test");
    }
}
