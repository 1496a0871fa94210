//! HTTP fetcher for channel preview pages
//!
//! One page per request, sequential, with a fixed timeout and a rate limiter
//! between requests. The body is repaired to UTF-8 before it reaches any
//! parser, since the preview pages do not reliably declare their encoding.

use async_trait::async_trait;
use governor::{
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter,
};
use reqwest::Client;
use std::num::NonZeroU32;
use std::time::Duration;

use crate::crawler::url::{preview_path, preview_url};
use crate::parser::encoding;
use crate::utils::error::FetchError;

/// Default per-request timeout, matching the tens-of-seconds the source
/// tolerates before a page is considered failed
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

/// Capability to fetch one page of a channel's public message-list view
///
/// `before` requests messages strictly older than the given message id.
#[async_trait]
pub trait FetchPage: Send + Sync {
    async fn fetch_page(&self, channel: &str, before: Option<u64>) -> Result<String, FetchError>;
}

/// Preview-page fetcher backed by reqwest
pub struct PageFetcher {
    /// HTTP client with configured timeout and compression
    client: Client,

    /// Rate limiter applied between page requests
    rate_limiter: RateLimiter<NotKeyed, InMemoryState, DefaultClock>,

    /// Optional base URL override for testing with mock servers
    base_url: Option<String>,
}

impl PageFetcher {
    /// Create a new fetcher with default settings
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Http` if the HTTP client cannot be created
    pub fn new() -> Result<Self, FetchError> {
        Self::with_config(DEFAULT_TIMEOUT, 1, &default_user_agent())
    }

    /// Create a new fetcher with custom configuration
    ///
    /// # Arguments
    ///
    /// * `timeout` - Request timeout duration
    /// * `requests_per_second` - Maximum number of page requests per second
    /// * `user_agent` - User-Agent header value
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Http` if the HTTP client cannot be created
    pub fn with_config(
        timeout: Duration,
        requests_per_second: u32,
        user_agent: &str,
    ) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .gzip(true)
            .user_agent(user_agent)
            .build()?;

        let rate = NonZeroU32::new(requests_per_second).unwrap_or(NonZeroU32::MIN);
        let rate_limiter = RateLimiter::direct(Quota::per_second(rate));

        Ok(Self {
            client,
            rate_limiter,
            base_url: None,
        })
    }

    /// Create a new fetcher with a custom base URL for testing
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Http` if the HTTP client cannot be created
    pub fn with_base_url(base_url: &str) -> Result<Self, FetchError> {
        let mut fetcher = Self::new()?;
        fetcher.base_url = Some(base_url.trim_end_matches('/').to_string());
        Ok(fetcher)
    }

    fn page_url(&self, channel: &str, before: Option<u64>) -> String {
        match &self.base_url {
            Some(base) => format!("{base}{}", preview_path(channel, before)),
            None => preview_url(channel, before),
        }
    }
}

#[async_trait]
impl FetchPage for PageFetcher {
    async fn fetch_page(&self, channel: &str, before: Option<u64>) -> Result<String, FetchError> {
        self.rate_limiter.until_ready().await;

        let url = self.page_url(channel, before);
        tracing::debug!(url = %url, "Fetching preview page");

        let response = self.client.get(&url).send().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout
            } else {
                FetchError::Http(e)
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::ServerError(status.as_u16()));
        }

        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Err(FetchError::EmptyBody);
        }

        Ok(encoding::to_utf8(&bytes))
    }
}

fn default_user_agent() -> String {
    format!("telepost/{}", env!("CARGO_PKG_VERSION"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetcher_creation() {
        assert!(PageFetcher::new().is_ok());
        assert!(PageFetcher::with_config(Duration::from_secs(5), 2, "test-agent").is_ok());
    }

    #[test]
    fn test_page_url_without_base() {
        let fetcher = PageFetcher::new().unwrap();
        assert_eq!(fetcher.page_url("chan", None), "https://t.me/s/chan");
        assert_eq!(fetcher.page_url("chan", Some(48)), "https://t.me/s/chan?before=48");
    }

    #[test]
    fn test_page_url_with_base_override() {
        let fetcher = PageFetcher::with_base_url("http://localhost:8080/").unwrap();
        assert_eq!(fetcher.page_url("chan", None), "http://localhost:8080/s/chan");
        assert_eq!(
            fetcher.page_url("chan", Some(7)),
            "http://localhost:8080/s/chan?before=7"
        );
    }

    #[test]
    fn test_default_user_agent_names_crate() {
        assert!(default_user_agent().starts_with("telepost/"));
    }
}
