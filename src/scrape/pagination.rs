//! Walks a profile's listing pages following next-page links

use std::collections::HashSet;
use std::time::Duration;

use log::{debug, info};

use crate::client::PageFetcher;
use crate::error::Result;
use crate::extract::extract_listing;
use crate::models::ProjectSummary;

/// Scrape up to `max` projects starting at `profile_url`.
///
/// Pages already visited are never fetched again, so cyclic next links
/// terminate. `max` is an absolute ceiling on the result count. Fetch
/// errors propagate to the caller.
pub async fn scrape_profile<F: PageFetcher + ?Sized>(
    fetcher: &F,
    profile_url: &str,
    max: usize,
    delay: Duration,
) -> Result<Vec<ProjectSummary>> {
    let mut results: Vec<ProjectSummary> = Vec::new();
    let mut seen_projects: HashSet<String> = HashSet::new();
    let mut visited_pages: HashSet<String> = HashSet::new();
    let mut current = Some(profile_url.to_string());

    while let Some(page_url) = current.take() {
        if results.len() >= max {
            break;
        }
        if !visited_pages.insert(page_url.clone()) {
            debug!("Already visited {}, stopping", page_url);
            break;
        }

        info!("Fetching listing page {}", page_url);
        let html = fetcher.fetch_html(&page_url).await?;
        let page = extract_listing(&html, &page_url);
        debug!(
            "{} projects on {} (next: {:?})",
            page.projects.len(),
            page_url,
            page.next_page_url
        );

        for project in page.projects {
            if results.len() >= max {
                break;
            }
            if seen_projects.insert(project.url.clone()) {
                results.push(project);
            }
        }

        if let Some(next) = page.next_page_url
            && !visited_pages.contains(&next)
            && results.len() < max
        {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            current = Some(next);
        }
    }

    info!("Scraped {} projects from {}", results.len(), profile_url);
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MockFetcher;

    const PROFILE: &str = "https://www.behance.net/someone";
    const PAGE_2: &str = "https://www.behance.net/someone?page=2";

    fn listing(ids: &[u32], next: Option<&str>) -> String {
        let mut html = String::from("<html><body>");
        for id in ids {
            html.push_str(&format!(
                r#"<a href="/gallery/{id}/Work-{id}" title="Work {id}">Work {id}</a>"#
            ));
        }
        if let Some(next) = next {
            html.push_str(&format!(r#"<a rel="next" href="{next}">more</a>"#));
        }
        html.push_str("</body></html>");
        html
    }

    #[tokio::test]
    async fn test_follows_next_pages() {
        let fetcher = MockFetcher::new()
            .with_page(PROFILE, &listing(&[1, 2], Some(PAGE_2)))
            .await
            .with_page(PAGE_2, &listing(&[3], None))
            .await;

        let projects = scrape_profile(&fetcher, PROFILE, 50, Duration::ZERO)
            .await
            .unwrap();

        let ids: Vec<_> = projects.iter().filter_map(|p| p.id.as_deref()).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
        assert_eq!(fetcher.requests().await, vec![PROFILE, PAGE_2]);
    }

    #[tokio::test]
    async fn test_cyclic_next_links_terminate() {
        let fetcher = MockFetcher::new()
            .with_page(PROFILE, &listing(&[1], Some(PAGE_2)))
            .await
            .with_page(PAGE_2, &listing(&[2], Some(PROFILE)))
            .await;

        let projects = scrape_profile(&fetcher, PROFILE, 50, Duration::ZERO)
            .await
            .unwrap();

        assert_eq!(projects.len(), 2);
        assert_eq!(fetcher.call_count().await, 2);
    }

    #[tokio::test]
    async fn test_max_is_a_ceiling() {
        let fetcher = MockFetcher::new()
            .with_page(PROFILE, &listing(&[1, 2, 3, 4], Some(PAGE_2)))
            .await
            .with_page(PAGE_2, &listing(&[5, 6], None))
            .await;

        let projects = scrape_profile(&fetcher, PROFILE, 3, Duration::ZERO)
            .await
            .unwrap();

        assert_eq!(projects.len(), 3);
        // Cap reached on the first page, so the second is never requested
        assert_eq!(fetcher.call_count().await, 1);
    }

    #[tokio::test]
    async fn test_duplicates_across_pages_are_dropped() {
        let fetcher = MockFetcher::new()
            .with_page(PROFILE, &listing(&[1, 2], Some(PAGE_2)))
            .await
            .with_page(PAGE_2, &listing(&[2, 3], None))
            .await;

        let projects = scrape_profile(&fetcher, PROFILE, 50, Duration::ZERO)
            .await
            .unwrap();

        assert_eq!(projects.len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_delay_applied_between_pages() {
        let fetcher = MockFetcher::new()
            .with_page(PROFILE, &listing(&[1], Some(PAGE_2)))
            .await
            .with_page(PAGE_2, &listing(&[2], None))
            .await;

        let start = tokio::time::Instant::now();
        let projects = scrape_profile(&fetcher, PROFILE, 50, Duration::from_millis(250))
            .await
            .unwrap();
        let elapsed = start.elapsed();

        assert_eq!(projects.len(), 2);
        // One pause for the single next link, none after the last page
        assert!(elapsed >= Duration::from_millis(250));
        assert!(elapsed < Duration::from_millis(500));
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_delay_without_next_page() {
        let fetcher = MockFetcher::new()
            .with_page(PROFILE, &listing(&[1, 2], None))
            .await;

        let start = tokio::time::Instant::now();
        scrape_profile(&fetcher, PROFILE, 50, Duration::from_secs(5))
            .await
            .unwrap();

        assert!(start.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_fetch_error_propagates() {
        let fetcher = MockFetcher::new().failing().await;
        let result = scrape_profile(&fetcher, PROFILE, 50, Duration::ZERO).await;
        assert!(result.is_err());
    }
}
