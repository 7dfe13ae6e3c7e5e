//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the collector:
//! - Building the HTTP client with a proper user agent string
//! - Rejecting URLs outside the allowed domain before any request
//! - GET requests with bounded retry and linear backoff

use crate::config::{Config, FetchConfig, UserAgentConfig};
use crate::url::validate_source_url;
use crate::TallyError;
use reqwest::Client;
use std::time::Duration;

/// Result of a single fetch attempt
#[derive(Debug)]
pub enum FetchResult {
    /// The server answered with a success status
    Success {
        /// Final URL after redirects
        final_url: String,
        /// HTTP status code
        status_code: u16,
        /// Page body content
        body: String,
    },

    /// The server answered with a non-success status
    HttpError {
        /// The HTTP status code
        status_code: u16,
    },

    /// No usable response (connection refused, reset, body decode failure)
    NetworkError {
        /// Error description
        error: String,
    },
}

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use beast_tally::config::UserAgentConfig;
/// use beast_tally::collector::build_http_client;
///
/// let client = build_http_client(&UserAgentConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &UserAgentConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.header_value())
        .gzip(true)
        .brotli(true)
        .build()
}

/// Performs one GET request and classifies the outcome
pub async fn fetch_url(client: &Client, url: &str) -> FetchResult {
    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(e) => {
            let error = if e.is_connect() {
                format!("connection failed: {}", e)
            } else if e.is_timeout() {
                "request timeout".to_string()
            } else {
                e.to_string()
            };
            return FetchResult::NetworkError { error };
        }
    };

    let status = response.status();
    if !status.is_success() {
        return FetchResult::HttpError {
            status_code: status.as_u16(),
        };
    }

    let final_url = response.url().to_string();
    match response.text().await {
        Ok(body) => FetchResult::Success {
            final_url,
            status_code: status.as_u16(),
            body,
        },
        Err(e) => FetchResult::NetworkError {
            error: e.to_string(),
        },
    }
}

/// Fetches listing pages from a single allowed domain
///
/// # Retry Logic
///
/// | Condition | Action |
/// |-----------|--------|
/// | URL outside allowed domain | Immediate `InvalidInput` error, no request |
/// | HTTP 2xx | Return body |
/// | Any other status | Retry |
/// | Network error | Retry |
/// | Attempts exhausted | Return `None` |
///
/// After failed attempt `n` the fetcher waits `n` backoff units before
/// trying again, so the default settings wait 1s then 2s.
#[derive(Debug, Clone)]
pub struct PageFetcher {
    client: Client,
    allowed_domain: String,
    max_attempts: u32,
    backoff_unit: Duration,
}

impl PageFetcher {
    pub fn new(client: Client, allowed_domain: &str, fetch: &FetchConfig) -> Self {
        Self {
            client,
            allowed_domain: allowed_domain.to_string(),
            max_attempts: fetch.max_attempts.max(1),
            backoff_unit: Duration::from_millis(fetch.backoff_unit_ms),
        }
    }

    /// Builds a fetcher, and its HTTP client, from the configuration
    pub fn from_config(config: &Config) -> Result<Self, TallyError> {
        let client = build_http_client(&config.user_agent)?;
        Ok(Self::new(client, &config.site.allowed_domain, &config.fetch))
    }

    /// Fetches `url`, returning its body or `None` once retries run out
    ///
    /// # Returns
    ///
    /// * `Ok(Some(body))` - A success status was received
    /// * `Ok(None)` - Every attempt failed
    /// * `Err(TallyError::InvalidInput)` - The URL is not on the allowed domain
    pub async fn fetch(&self, url: &str) -> Result<Option<String>, TallyError> {
        let url = match validate_source_url(url, &self.allowed_domain) {
            Ok(url) => url,
            Err(e) => {
                tracing::error!("Refusing to fetch {}: {}", url, e);
                return Err(e.into());
            }
        };

        for attempt in 1..=self.max_attempts {
            match fetch_url(&self.client, url.as_str()).await {
                FetchResult::Success {
                    final_url,
                    status_code,
                    body,
                } => {
                    tracing::debug!(
                        "Fetched {} (HTTP {}, {} bytes)",
                        final_url,
                        status_code,
                        body.len()
                    );
                    return Ok(Some(body));
                }
                FetchResult::HttpError { status_code } => {
                    tracing::warn!(
                        "HTTP {} from {} (attempt {}/{})",
                        status_code,
                        url,
                        attempt,
                        self.max_attempts
                    );
                }
                FetchResult::NetworkError { error } => {
                    tracing::warn!(
                        "Request to {} failed: {} (attempt {}/{})",
                        url,
                        error,
                        attempt,
                        self.max_attempts
                    );
                }
            }

            if attempt < self.max_attempts {
                tokio::time::sleep(self.backoff_unit * attempt).await;
            }
        }

        Ok(None)
    }
}
