//! The `reqwest` client behind [`HttpFetcher`](super::HttpFetcher).
//!
//! The pipeline never retries or times out on its own. Whatever a caller
//! wants from the network (retries on transient failures, a connect or
//! overall deadline, a proxy, extra headers) is configured here and lives in
//! the client.
//!
//! # Examples
//!
//! ```rust
//! use packfetch::http::{create_http_client, HttpClientConfig};
//! use std::time::Duration;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = HttpClientConfig {
//!     retries: 5,
//!     timeout: Some(Duration::from_secs(300)),
//!     ..HttpClientConfig::default()
//! };
//! let client = create_http_client(config)?;
//! # Ok(())
//! # }
//! ```

use reqwest::{header::HeaderMap, Client, Proxy};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{policies::ExponentialBackoff, RetryTransientMiddleware};
use reqwest_tracing::TracingMiddleware;
use std::time::Duration;

/// User agent sent when none is configured.
pub const DEFAULT_USER_AGENT: &str = concat!("packfetch/", env!("CARGO_PKG_VERSION"));

/// Connect deadline applied unless the caller overrides it.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Network settings for mod downloads.
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Retries of a request that failed transiently (connection reset, 5xx, 429).
    pub retries: u32,
    /// Deadline for a whole request, body included. Unset by default since
    /// mod archives vary widely in size.
    pub timeout: Option<Duration>,
    /// Deadline for establishing a connection.
    pub connect_timeout: Option<Duration>,
    pub proxy: Option<Proxy>,
    /// Headers sent with every request, e.g. a provider API key.
    pub headers: Option<HeaderMap>,
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            retries: 3,
            timeout: None,
            connect_timeout: Some(DEFAULT_CONNECT_TIMEOUT),
            proxy: None,
            headers: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl HttpClientConfig {
    fn inner_client(&self) -> Result<Client, reqwest::Error> {
        let mut builder = Client::builder().user_agent(self.user_agent.as_str());
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(timeout) = self.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }
        if let Some(proxy) = &self.proxy {
            builder = builder.proxy(proxy.clone());
        }
        if let Some(headers) = &self.headers {
            builder = builder.default_headers(headers.clone());
        }
        builder.build()
    }
}

/// Builds the client: tracing spans for every request, then retries.
pub fn create_http_client(config: HttpClientConfig) -> Result<ClientWithMiddleware, reqwest::Error> {
    let inner = config.inner_client()?;
    let policy = ExponentialBackoff::builder().build_with_max_retries(config.retries);
    Ok(ClientBuilder::new(inner)
        .with(TracingMiddleware::default())
        .with(RetryTransientMiddleware::new_with_policy(policy))
        .build())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_leave_body_unbounded() {
        let config = HttpClientConfig::default();
        assert_eq!(config.timeout, None);
        assert_eq!(config.connect_timeout, Some(DEFAULT_CONNECT_TIMEOUT));
        assert!(config.user_agent.starts_with("packfetch/"));
    }

    #[test]
    fn test_inner_client_accepts_all_settings() {
        let config = HttpClientConfig {
            timeout: Some(Duration::from_millis(500)),
            connect_timeout: None,
            proxy: Some(Proxy::all("http://127.0.0.1:3128").unwrap()),
            ..HttpClientConfig::default()
        };
        assert!(config.inner_client().is_ok());
    }
}
