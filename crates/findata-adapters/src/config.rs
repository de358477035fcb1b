//! Configuration for the data adapters

use std::time::Duration;

use findata_core::{AdapterError, HealthCheckPolicy, Result};
use serde::{Deserialize, Serialize};

/// Environment variable holding the NewsAPI key
pub const NEWSAPI_KEY_ENV: &str = "NEWSAPI_KEY";

/// Environment variable holding the sec-api.io key
pub const SEC_API_KEY_ENV: &str = "SEC_API_KEY";

/// Configuration shared by all adapters.
///
/// Adapters read credentials only from here, never from the process
/// environment.
#[derive(Clone, Serialize, Deserialize)]
pub struct AdapterConfig {
    /// NewsAPI key (optional; news falls back to stub articles without it)
    pub news_api_key: Option<String>,

    /// sec-api.io key (optional; filings fall back to stub records without it)
    pub sec_api_key: Option<String>,

    /// Construction-time health check behaviour
    pub health_check: HealthCheckPolicy,

    /// Deadline for data fetches
    pub request_timeout: Duration,

    /// Deadline for health probes, never longer than `request_timeout`
    pub health_check_timeout: Duration,

    /// Skip every live call and serve stub data
    pub offline: bool,

    /// Ticker fetched by the price health probe
    pub price_test_ticker: String,

    /// User agent sent with HTTP requests
    pub user_agent: String,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            news_api_key: None,
            sec_api_key: None,
            health_check: HealthCheckPolicy::report_only(),
            request_timeout: Duration::from_secs(20),
            health_check_timeout: Duration::from_secs(10),
            offline: false,
            price_test_ticker: "AAPL".to_string(),
            user_agent: format!("findata/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl std::fmt::Debug for AdapterConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdapterConfig")
            .field("news_api_key", &self.news_api_key.as_ref().map(|_| "<redacted>"))
            .field("sec_api_key", &self.sec_api_key.as_ref().map(|_| "<redacted>"))
            .field("health_check", &self.health_check)
            .field("request_timeout", &self.request_timeout)
            .field("health_check_timeout", &self.health_check_timeout)
            .field("offline", &self.offline)
            .field("price_test_ticker", &self.price_test_ticker)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl AdapterConfig {
    /// Create a new configuration builder
    pub fn builder() -> AdapterConfigBuilder {
        AdapterConfigBuilder::default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.request_timeout.is_zero() {
            return Err(AdapterError::Config(
                "request_timeout must be greater than 0".to_string(),
            ));
        }

        if self.health_check_timeout.is_zero() {
            return Err(AdapterError::Config(
                "health_check_timeout must be greater than 0".to_string(),
            ));
        }

        if self.health_check_timeout > self.request_timeout {
            return Err(AdapterError::Config(format!(
                "health_check_timeout ({:?}) must not exceed request_timeout ({:?})",
                self.health_check_timeout, self.request_timeout
            )));
        }

        if self.price_test_ticker.trim().is_empty() {
            return Err(AdapterError::Config(
                "price_test_ticker must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}

/// Builder for AdapterConfig
#[derive(Debug, Default)]
pub struct AdapterConfigBuilder {
    news_api_key: Option<String>,
    sec_api_key: Option<String>,
    health_check: Option<HealthCheckPolicy>,
    request_timeout: Option<Duration>,
    health_check_timeout: Option<Duration>,
    offline: Option<bool>,
    price_test_ticker: Option<String>,
    user_agent: Option<String>,
}

impl AdapterConfigBuilder {
    /// Set the NewsAPI key
    pub fn news_api_key(mut self, key: impl Into<String>) -> Self {
        self.news_api_key = Some(key.into());
        self
    }

    /// Set the sec-api.io key
    pub fn sec_api_key(mut self, key: impl Into<String>) -> Self {
        self.sec_api_key = Some(key.into());
        self
    }

    /// Load both API keys from `NEWSAPI_KEY` and `SEC_API_KEY`.
    ///
    /// Keys already set on the builder win over the environment.
    pub fn with_env_credentials(mut self) -> Self {
        if self.news_api_key.is_none() {
            self.news_api_key = findata_utils::env_secret(NEWSAPI_KEY_ENV);
        }
        if self.sec_api_key.is_none() {
            self.sec_api_key = findata_utils::env_secret(SEC_API_KEY_ENV);
        }
        self
    }

    /// Set the construction-time health check policy
    pub fn health_check(mut self, policy: HealthCheckPolicy) -> Self {
        self.health_check = Some(policy);
        self
    }

    /// Set the data fetch timeout
    pub fn request_timeout(mut self, duration: Duration) -> Self {
        self.request_timeout = Some(duration);
        self
    }

    /// Set the health probe timeout
    pub fn health_check_timeout(mut self, duration: Duration) -> Self {
        self.health_check_timeout = Some(duration);
        self
    }

    /// Serve stub data without attempting live calls
    pub fn offline(mut self, offline: bool) -> Self {
        self.offline = Some(offline);
        self
    }

    /// Set the ticker used by the price health probe
    pub fn price_test_ticker(mut self, ticker: impl Into<String>) -> Self {
        self.price_test_ticker = Some(ticker.into());
        self
    }

    /// Set the HTTP user agent
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<AdapterConfig> {
        let defaults = AdapterConfig::default();

        let config = AdapterConfig {
            news_api_key: self.news_api_key.or(defaults.news_api_key),
            sec_api_key: self.sec_api_key.or(defaults.sec_api_key),
            health_check: self.health_check.unwrap_or(defaults.health_check),
            request_timeout: self.request_timeout.unwrap_or(defaults.request_timeout),
            health_check_timeout: self
                .health_check_timeout
                .unwrap_or(defaults.health_check_timeout),
            offline: self.offline.unwrap_or(defaults.offline),
            price_test_ticker: self
                .price_test_ticker
                .unwrap_or(defaults.price_test_ticker),
            user_agent: self.user_agent.unwrap_or(defaults.user_agent),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AdapterConfig::default();
        assert_eq!(config.request_timeout, Duration::from_secs(20));
        assert_eq!(config.health_check_timeout, Duration::from_secs(10));
        assert_eq!(config.price_test_ticker, "AAPL");
        assert!(config.health_check.enabled);
        assert!(!config.health_check.fail_on_error);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = AdapterConfig::builder()
            .news_api_key("news")
            .health_check(HealthCheckPolicy::disabled())
            .request_timeout(Duration::from_secs(30))
            .offline(true)
            .build()
            .unwrap();

        assert_eq!(config.news_api_key.as_deref(), Some("news"));
        assert!(config.sec_api_key.is_none());
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert!(config.offline);
    }

    #[test]
    fn test_explicit_key_wins_over_env() {
        let config = AdapterConfig::builder()
            .sec_api_key("explicit")
            .with_env_credentials()
            .build()
            .unwrap();
        assert_eq!(config.sec_api_key.as_deref(), Some("explicit"));
    }

    #[test]
    fn test_validation_zero_timeout() {
        let config = AdapterConfig {
            request_timeout: Duration::ZERO,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(AdapterError::Config(_))));
    }

    #[test]
    fn test_validation_health_timeout_longer_than_request() {
        let result = AdapterConfig::builder()
            .request_timeout(Duration::from_secs(5))
            .health_check_timeout(Duration::from_secs(6))
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_validation_empty_test_ticker() {
        let result = AdapterConfig::builder().price_test_ticker("  ").build();
        assert!(result.is_err());
    }

    #[test]
    fn test_debug_redacts_keys() {
        let config = AdapterConfig::builder()
            .news_api_key("super-secret")
            .build()
            .unwrap();
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
