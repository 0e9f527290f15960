use std::fmt;
use std::time::Duration;

use tracing::warn;

use crate::error::{Result, SearchError};

pub const DEFAULT_BASE_URL: &str = "https://api.yelp.com/v3/businesses/search";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub const API_KEY_ENV: &str = "YELP_API_KEY";
pub const BASE_URL_ENV: &str = "DISHDECK_SEARCH_URL";
pub const REQUEST_TIMEOUT_ENV: &str = "DISHDECK_REQUEST_TIMEOUT_SECS";

/// Connection settings for the business search endpoint.
///
/// The API key is never compiled in; build one with [`ClientConfig::builder`]
/// or read it from the environment with [`ClientConfig::from_env`].
#[derive(Clone)]
pub struct ClientConfig {
    pub api_key: String,
    pub base_url: String,
    /// Upper bound on the whole request, connect through body
    pub request_timeout: Duration,
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

impl ClientConfig {
    pub fn builder(api_key: impl Into<String>) -> ClientConfigBuilder {
        ClientConfigBuilder::new(api_key)
    }

    /// Load configuration from `YELP_API_KEY`, `DISHDECK_SEARCH_URL` and
    /// `DISHDECK_REQUEST_TIMEOUT_SECS`. Only the key is required.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`Self::from_env`] but with a caller-supplied variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let api_key = lookup(API_KEY_ENV)
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| SearchError::Config(format!("{API_KEY_ENV} is not set")))?;

        let mut builder = Self::builder(api_key);
        if let Some(url) = lookup(BASE_URL_ENV) {
            builder = builder.base_url(url);
        }
        if let Some(raw) = lookup(REQUEST_TIMEOUT_ENV) {
            match raw.trim().parse::<u64>() {
                Ok(secs) => builder = builder.request_timeout(Duration::from_secs(secs)),
                Err(_) => warn!(value = %raw, "Ignoring unparsable {REQUEST_TIMEOUT_ENV}"),
            }
        }
        builder.build()
    }
}

/// Builder for [`ClientConfig`] with the endpoint defaults filled in.
#[derive(Debug, Clone)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            config: ClientConfig {
                api_key: api_key.into(),
                base_url: DEFAULT_BASE_URL.to_string(),
                request_timeout: DEFAULT_REQUEST_TIMEOUT,
            },
        }
    }

    /// Point the client at a different search URL (proxy, staging host)
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.config.request_timeout = timeout;
        self
    }

    pub fn build(self) -> Result<ClientConfig> {
        let config = self.config;
        if config.api_key.trim().is_empty() {
            return Err(SearchError::Config("API key must not be empty".to_string()));
        }
        if !(config.base_url.starts_with("https://") || config.base_url.starts_with("http://")) {
            return Err(SearchError::Config(format!(
                "Search URL must be http(s), got '{}'",
                config.base_url
            )));
        }
        if config.request_timeout.is_zero() {
            return Err(SearchError::Config(
                "Request timeout must be greater than zero".to_string(),
            ));
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_builder_defaults() {
        let config = ClientConfig::builder("secret").build().unwrap();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.request_timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_builder_rejects_empty_key() {
        assert!(ClientConfig::builder("  ").build().is_err());
    }

    #[test]
    fn test_builder_rejects_bad_url_and_zero_timeout() {
        assert!(
            ClientConfig::builder("k")
                .base_url("ftp://example.com")
                .build()
                .is_err()
        );
        assert!(
            ClientConfig::builder("k")
                .request_timeout(Duration::ZERO)
                .build()
                .is_err()
        );
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = ClientConfig::builder("super-secret-token").build().unwrap();
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("super-secret-token"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn test_from_lookup_requires_key() {
        let err = ClientConfig::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(matches!(err, SearchError::Config(_)));
    }

    #[test]
    fn test_from_lookup_reads_overrides() {
        let config = ClientConfig::from_lookup(lookup_from(&[
            (API_KEY_ENV, "abc"),
            (BASE_URL_ENV, "http://localhost:8080/search"),
            (REQUEST_TIMEOUT_ENV, "3"),
        ]))
        .unwrap();

        assert_eq!(config.api_key, "abc");
        assert_eq!(config.base_url, "http://localhost:8080/search");
        assert_eq!(config.request_timeout, Duration::from_secs(3));
    }

    #[test]
    fn test_from_lookup_ignores_bad_timeout() {
        let config = ClientConfig::from_lookup(lookup_from(&[
            (API_KEY_ENV, "abc"),
            (REQUEST_TIMEOUT_ENV, "soon"),
        ]))
        .unwrap();
        assert_eq!(config.request_timeout, DEFAULT_REQUEST_TIMEOUT);
    }
}
