//! Client configuration.
//!
//! # Example
//!
//! ```rust
//! use skillmart::ClientConfig;
//! use std::time::Duration;
//!
//! let config = ClientConfig::new("https://api.skillmart.example/api/v1".parse().unwrap())
//!     .with_timeout(Duration::from_secs(10));
//! ```

use std::time::Duration;

use url::Url;

/// Configuration for the API client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the REST collaborator, including any path prefix.
    pub base_url: Url,

    /// Per-request timeout.
    ///
    /// Default: 30 seconds. A request that never resolves would
    /// otherwise leave its resource in `Loading` forever.
    pub request_timeout: Duration,
}

impl ClientConfig {
    /// Creates a configuration with the default timeout.
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            request_timeout: Duration::from_secs(30),
        }
    }

    /// Configuration pointing at a local development backend.
    ///
    /// # Panics
    ///
    /// Never panics; the development URL is statically valid.
    pub fn development() -> Self {
        Self::new(
            Url::parse("http://localhost:5000/api/v1").expect("static development URL is valid"),
        )
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_timeout() {
        let config = ClientConfig::new("http://localhost:5000".parse().unwrap());
        assert_eq!(config.request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_development_base_url() {
        let config = ClientConfig::development();
        assert_eq!(config.base_url.as_str(), "http://localhost:5000/api/v1");
    }

    #[test]
    fn test_with_timeout() {
        let config = ClientConfig::development().with_timeout(Duration::from_secs(5));
        assert_eq!(config.request_timeout, Duration::from_secs(5));
    }
}
