//! Outbound HTTP access to the portfolio site
//!
//! The scraper never talks to `reqwest` directly; it goes through
//! [`PageFetcher`] so cache tiers and the pagination walker can be
//! exercised against a recorded mock.

use async_trait::async_trait;

use crate::error::Result;

pub mod http;
#[cfg(test)]
pub mod mock;

pub use http::HttpFetcher;
#[cfg(test)]
pub use mock::MockFetcher;

/// Fetch primitive used by the scraper and the image downloader
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch a page and return its body as text.
    ///
    /// Any non-success status is an error.
    async fn fetch_html(&self, url: &str) -> Result<String>;

    /// Fetch raw image bytes.
    async fn fetch_image(&self, url: &str) -> Result<Vec<u8>>;
}
