//! HTTP transport for fetching raw page bodies
//!
//! This module handles the actual network round trip:
//! - Building a reqwest client with user agent and timeouts
//! - GET requests with a persistent-connection header
//! - Mapping non-success statuses and network failures to `FetchError`
//!
//! The `Transport` trait is the seam the fetcher talks through, so tests and
//! embedders can substitute the network entirely.

use crate::config::HttpConfig;
use crate::FetchError;
use async_trait::async_trait;
use reqwest::header::CONNECTION;
use reqwest::Client;
use std::time::Duration;

/// Issues a request for a URL and returns the raw response body
#[async_trait]
pub trait Transport: Send + Sync {
    /// Fetches `url`, resolving with the body text on a 2xx response
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// Builds the reqwest client used by `HttpTransport`
///
/// # Arguments
///
/// * `config` - The HTTP configuration (user agent and timeouts)
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(config: &HttpConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Production transport over a shared reqwest client
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Creates a transport with a client built from the given configuration
    pub fn new(config: &HttpConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(config)?,
        })
    }

    /// Creates a transport around an existing client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url)
            .header(CONNECTION, "keep-alive")
            .send()
            .await
            .map_err(|error| FetchError::Transport {
                url: url.to_string(),
                message: classify_error(&error),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|error| FetchError::Transport {
            url: url.to_string(),
            message: classify_error(&error),
        })
    }
}

/// Maps a reqwest error to a short, stable description
fn classify_error(error: &reqwest::Error) -> String {
    if error.is_timeout() {
        "request timeout".to_string()
    } else if error.is_connect() {
        "connection refused".to_string()
    } else {
        error.to_string()
    }
}
