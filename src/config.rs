/// Configuration management for the Linkdeck client
use crate::error::{ClientError, ClientResult};
use serde::{Deserialize, Serialize};
use std::env;
use url::Url;

/// Default client-side cap on social links, matching the backend
pub const DEFAULT_MAX_SOCIAL_LINKS: usize = 5;

/// Client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the backend API (e.g. https://api.linkdeck.example)
    pub api_base_url: String,
    /// User-Agent header for HTTP requests
    pub user_agent: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Service code used for subscription status lookups
    pub service_code: String,
    /// Client-side cap on social links, enforced before submission
    pub max_social_links: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8005".to_string(),
            user_agent: format!("Linkdeck/{}", env!("CARGO_PKG_VERSION")),
            timeout_secs: 10,
            service_code: "linkdeck".to_string(),
            max_social_links: DEFAULT_MAX_SOCIAL_LINKS,
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> ClientResult<Self> {
        dotenv::dotenv().ok();

        let defaults = Self::default();

        let api_base_url =
            env::var("LINKDECK_API_URL").unwrap_or(defaults.api_base_url);
        let user_agent =
            env::var("LINKDECK_USER_AGENT").unwrap_or(defaults.user_agent);
        let timeout_secs = env::var("LINKDECK_TIMEOUT_SECS")
            .unwrap_or_else(|_| defaults.timeout_secs.to_string())
            .parse()
            .map_err(|_| ClientError::Config("Invalid timeout value".to_string()))?;
        let service_code =
            env::var("LINKDECK_SERVICE_CODE").unwrap_or(defaults.service_code);
        let max_social_links = env::var("LINKDECK_MAX_SOCIAL_LINKS")
            .unwrap_or_else(|_| defaults.max_social_links.to_string())
            .parse()
            .unwrap_or(DEFAULT_MAX_SOCIAL_LINKS);

        let config = Self {
            api_base_url,
            user_agent,
            timeout_secs,
            service_code,
            max_social_links,
        };
        config.validate()?;

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> ClientResult<()> {
        if self.api_base_url.is_empty() {
            return Err(ClientError::Config(
                "API base URL cannot be empty".to_string(),
            ));
        }

        Url::parse(&self.api_base_url).map_err(|e| {
            ClientError::Config(format!("Invalid API base URL: {}", e))
        })?;

        if self.timeout_secs == 0 {
            return Err(ClientError::Config(
                "Timeout must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ClientConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_social_links, DEFAULT_MAX_SOCIAL_LINKS);
        assert_eq!(config.timeout_secs, 10);
    }

    #[test]
    fn test_validate_rejects_bad_url() {
        let config = ClientConfig {
            api_base_url: "not a url".to_string(),
            ..ClientConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let config = ClientConfig {
            timeout_secs: 0,
            ..ClientConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
