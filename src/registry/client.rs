//! HTTP client shared foundation
//!
//! This module provides a shared HTTP client with:
//! - A per-request timeout capped at 15 seconds
//! - `Accept: application/json` and a skillscout User-Agent on every request
//! - Exponential backoff retry for rate limiting and connection failures,
//!   bounded by the same timeout as a single request
//! - Status and body errors mapped to `FetchFailure`

use crate::error::{ConfigError, FetchFailure};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{Client, StatusCode};
use std::time::Duration;

/// Default timeout for HTTP requests (10 seconds)
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Upper bound for any configured timeout
pub const MAX_TIMEOUT: Duration = Duration::from_secs(15);

/// Default User-Agent header
const DEFAULT_USER_AGENT: &str = concat!("skillscout/", env!("CARGO_PKG_VERSION"));

/// Maximum number of retry attempts
const MAX_RETRIES: u32 = 2;

/// Base delay for exponential backoff (in milliseconds)
const BASE_DELAY_MS: u64 = 200;

/// HTTP client wrapper with retry logic
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    max_retries: u32,
    /// Ceiling for one lookup, retries and body included
    deadline: Duration,
}

impl HttpClient {
    /// Create a new HTTP client with default settings
    pub fn new() -> Result<Self, ConfigError> {
        Self::with_config(DEFAULT_TIMEOUT, DEFAULT_USER_AGENT)
    }

    /// Create a new HTTP client with custom configuration
    ///
    /// The timeout is clamped to `MAX_TIMEOUT`.
    pub fn with_config(timeout: Duration, user_agent: &str) -> Result<Self, ConfigError> {
        let timeout = timeout.min(MAX_TIMEOUT);
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .default_headers(headers)
            .build()
            .map_err(|e| ConfigError::HttpClient {
                message: e.to_string(),
            })?;

        Ok(Self {
            client,
            max_retries: MAX_RETRIES,
            deadline: timeout,
        })
    }

    /// Create a client with a custom timeout and the default User-Agent
    pub fn with_timeout(timeout: Duration) -> Result<Self, ConfigError> {
        Self::with_config(timeout, DEFAULT_USER_AGENT)
    }

    /// Set the maximum number of retries
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Perform a GET request, retrying on rate limits and refused connections
    async fn send_with_retry(
        &self,
        url: &str,
        package: &str,
        registry: &str,
    ) -> Result<reqwest::Response, FetchFailure> {
        let mut delay = BASE_DELAY_MS;
        let mut attempt = 0;

        loop {
            tracing::debug!(url, attempt, "registry request");

            let retryable = match self.client.get(url).send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        return Ok(response);
                    }
                    match status {
                        StatusCode::TOO_MANY_REQUESTS => {
                            FetchFailure::rate_limited(package, registry)
                        }
                        StatusCode::NOT_FOUND => {
                            return Err(FetchFailure::not_found(package, registry))
                        }
                        _ => {
                            return Err(FetchFailure::http_status(
                                package,
                                registry,
                                status.as_u16(),
                            ))
                        }
                    }
                }
                Err(e) if e.is_timeout() => return Err(FetchFailure::timeout(package, registry)),
                Err(e) if e.is_connect() => FetchFailure::network(package, registry, e.to_string()),
                Err(e) => return Err(FetchFailure::network(package, registry, e.to_string())),
            };

            if attempt >= self.max_retries {
                return Err(retryable);
            }

            // Wait before retrying with exponential backoff
            tokio::time::sleep(Duration::from_millis(delay)).await;
            delay *= 2;
            attempt += 1;
        }
    }

    /// Perform a GET request and parse the JSON response
    ///
    /// All attempts and the body read together stay within the configured timeout.
    pub async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        package: &str,
        registry: &str,
    ) -> Result<T, FetchFailure> {
        let fetch = async {
            let response = self.send_with_retry(url, package, registry).await?;

            response.json::<T>().await.map_err(|e| {
                if e.is_timeout() {
                    FetchFailure::timeout(package, registry)
                } else {
                    FetchFailure::invalid_response(
                        package,
                        registry,
                        format!("failed to parse JSON: {}", e),
                    )
                }
            })
        };

        tokio::time::timeout(self.deadline, fetch)
            .await
            .unwrap_or_else(|_| Err(FetchFailure::timeout(package, registry)))
    }
}
