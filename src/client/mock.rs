//! Mock fetcher for testing
//!
//! Serves canned pages by URL and records every request, so tests can assert
//! how many fetches a code path made (or that it made none).

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::PageFetcher;
use crate::error::{FetchError, Result};

/// Mock fetcher. Clones share state.
#[derive(Clone, Default)]
pub struct MockFetcher {
    /// Pages by URL
    pages: Arc<Mutex<HashMap<String, String>>>,
    /// Image bodies by URL
    images: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    /// Fail every request when set
    fail_all: Arc<Mutex<bool>>,
    /// Every requested URL, in order
    requests: Arc<Mutex<Vec<String>>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `html` for `url`
    pub async fn with_page(self, url: &str, html: &str) -> Self {
        self.pages
            .lock()
            .await
            .insert(url.to_string(), html.to_string());
        self
    }

    /// Serve `bytes` for `url`
    pub async fn with_image(self, url: &str, bytes: &[u8]) -> Self {
        self.images
            .lock()
            .await
            .insert(url.to_string(), bytes.to_vec());
        self
    }

    /// Make every request fail with a network error
    pub async fn failing(self) -> Self {
        *self.fail_all.lock().await = true;
        self
    }

    /// URLs requested so far
    pub async fn requests(&self) -> Vec<String> {
        self.requests.lock().await.clone()
    }

    pub async fn call_count(&self) -> usize {
        self.requests.lock().await.len()
    }

    async fn record(&self, url: &str) -> Result<()> {
        self.requests.lock().await.push(url.to_string());
        if *self.fail_all.lock().await {
            return Err(FetchError::Network("mock network down".to_string()).into());
        }
        Ok(())
    }
}

#[async_trait]
impl PageFetcher for MockFetcher {
    async fn fetch_html(&self, url: &str) -> Result<String> {
        self.record(url).await?;
        self.pages.lock().await.get(url).cloned().ok_or_else(|| {
            FetchError::Status {
                status: 404,
                url: url.to_string(),
            }
            .into()
        })
    }

    async fn fetch_image(&self, url: &str) -> Result<Vec<u8>> {
        self.record(url).await?;
        self.images.lock().await.get(url).cloned().ok_or_else(|| {
            FetchError::Status {
                status: 404,
                url: url.to_string(),
            }
            .into()
        })
    }
}
