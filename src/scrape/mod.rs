//! Live scraping on top of a [`PageFetcher`]

use crate::client::PageFetcher;
use crate::error::Result;
use crate::extract::extract_detail;
use crate::models::ProjectDetail;

pub mod pagination;

pub use pagination::scrape_profile;

/// Fetch a project page and extract its detail.
pub async fn fetch_detail<F: PageFetcher + ?Sized>(
    fetcher: &F,
    project_url: &str,
) -> Result<ProjectDetail> {
    log::info!("Fetching project page {}", project_url);
    let html = fetcher.fetch_html(project_url).await?;
    Ok(extract_detail(&html))
}
