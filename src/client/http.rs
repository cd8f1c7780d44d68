//! reqwest-backed fetcher

use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use reqwest::Client as HttpClient;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, USER_AGENT};

use super::PageFetcher;
use crate::error::{FetchError, Result};

/// Desktop browser user-agent; the site serves a stripped page to unknown agents
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

const ACCEPT_LANGUAGE_VALUE: &str = "en-US,en;q=0.9";

/// Ceiling on outbound requests regardless of caller-side delays
const RATE_LIMIT_PER_SECOND: u32 = 4;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP fetcher with browser-like headers and a request rate ceiling
pub struct HttpFetcher {
    http: HttpClient,
    rate_limiter: Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>,
}

impl HttpFetcher {
    pub fn new() -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(FetchError::from)?;

        let quota = Quota::per_second(
            NonZeroU32::new(RATE_LIMIT_PER_SECOND).unwrap_or(NonZeroU32::MIN),
        );

        Ok(Self {
            http,
            rate_limiter: Arc::new(RateLimiter::direct(quota)),
        })
    }

    async fn get(&self, url: &str, accept: Option<&str>) -> Result<reqwest::Response> {
        self.rate_limiter.until_ready().await;

        let mut request = self
            .http
            .get(url)
            .header(USER_AGENT, BROWSER_USER_AGENT)
            .header(ACCEPT_LANGUAGE, ACCEPT_LANGUAGE_VALUE);
        if let Some(accept) = accept {
            request = request.header(ACCEPT, accept);
        }

        let response = request.send().await.map_err(FetchError::from)?;

        let status = response.status();
        if !status.is_success() {
            log::debug!("GET {} -> {}", url, status);
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            }
            .into());
        }

        Ok(response)
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch_html(&self, url: &str) -> Result<String> {
        let response = self.get(url, None).await?;
        let body = response
            .text()
            .await
            .map_err(|e| FetchError::InvalidResponse(format!("Failed to read body: {}", e)))?;
        Ok(body)
    }

    async fn fetch_image(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.get(url, Some("image/*")).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| FetchError::InvalidResponse(format!("Failed to read image: {}", e)))?;
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_fetcher_creation() {
        assert!(HttpFetcher::new().is_ok());
    }

    #[tokio::test]
    async fn test_fetch_html_sends_browser_headers() {
        let mut server = mockito::Server::new_async().await;
        let page = server
            .mock("GET", "/someone")
            .match_header("user-agent", BROWSER_USER_AGENT)
            .match_header("accept-language", "en-US,en;q=0.9")
            .with_status(200)
            .with_body("<html>ok</html>")
            .create_async()
            .await;

        let fetcher = HttpFetcher::new().unwrap();
        let body = fetcher
            .fetch_html(&format!("{}/someone", server.url()))
            .await
            .unwrap();

        assert_eq!(body, "<html>ok</html>");
        page.assert_async().await;
    }

    #[tokio::test]
    async fn test_non_success_status_is_error() {
        let mut server = mockito::Server::new_async().await;
        let _page = server
            .mock("GET", "/gone")
            .with_status(404)
            .create_async()
            .await;

        let fetcher = HttpFetcher::new().unwrap();
        let err = fetcher
            .fetch_html(&format!("{}/gone", server.url()))
            .await
            .unwrap_err();

        match err {
            Error::Fetch(FetchError::Status { status, .. }) => assert_eq!(status, 404),
            other => panic!("Expected status error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fetch_image_asks_for_images() {
        let mut server = mockito::Server::new_async().await;
        let _img = server
            .mock("GET", "/cover.png")
            .match_header("accept", "image/*")
            .with_status(200)
            .with_body(vec![0x89, b'P', b'N', b'G'])
            .create_async()
            .await;

        let fetcher = HttpFetcher::new().unwrap();
        let bytes = fetcher
            .fetch_image(&format!("{}/cover.png", server.url()))
            .await
            .unwrap();

        assert_eq!(bytes, vec![0x89, b'P', b'N', b'G']);
    }
}
