//! Two-tier cached access to a profile's projects
//!
//! Listings and details are resolved through an ordered list of sources.
//! The first source that produces a value wins; live failures never
//! escape this module.

use std::fmt;
use std::sync::Mutex;

use log::{debug, error, warn};
use serde::{Serialize, de::DeserializeOwned};

use crate::cache::key::{CacheKind, cache_key};
use crate::cache::memory::MemoryCache;
use crate::cache::{CacheTtl, storage};
use crate::client::PageFetcher;
use crate::config::Config;
use crate::error::Result;
use crate::fallback::manual_projects;
use crate::models::{CacheSnapshot, ProjectDetail, ProjectSummary};
use crate::scrape::{fetch_detail, scrape_profile};
use crate::text::normalize_profile_url;

/// Where a project listing can come from, in lookup order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingSource {
    /// The on-disk snapshot (static-cache mode only)
    StaticSnapshot,
    /// This service's in-memory cache
    ProcessCache,
    /// A fresh scrape of the profile
    LiveScrape,
    /// The hand-maintained dataset
    ManualFallback,
}

impl ListingSource {
    pub const ORDER: [ListingSource; 4] = [
        ListingSource::StaticSnapshot,
        ListingSource::ProcessCache,
        ListingSource::LiveScrape,
        ListingSource::ManualFallback,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ListingSource::StaticSnapshot => "static snapshot",
            ListingSource::ProcessCache => "process cache",
            ListingSource::LiveScrape => "live scrape",
            ListingSource::ManualFallback => "manual fallback",
        }
    }
}

impl fmt::Display for ListingSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Where a project detail can come from, in lookup order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailSource {
    /// `meta.json` and downloaded images (static-cache mode only)
    LocalMeta,
    ProcessCache,
    LiveFetch,
}

impl DetailSource {
    pub const ORDER: [DetailSource; 3] = [
        DetailSource::LocalMeta,
        DetailSource::ProcessCache,
        DetailSource::LiveFetch,
    ];

    pub fn label(self) -> &'static str {
        match self {
            DetailSource::LocalMeta => "local metadata",
            DetailSource::ProcessCache => "process cache",
            DetailSource::LiveFetch => "live fetch",
        }
    }
}

impl fmt::Display for DetailSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A resolved listing and the source that served it
#[derive(Debug, Clone)]
pub struct Listing {
    pub source: ListingSource,
    pub projects: Vec<ProjectSummary>,
}

/// A resolved detail and the source that served it
#[derive(Debug, Clone)]
pub struct Detail {
    pub source: DetailSource,
    pub detail: ProjectDetail,
}

/// Arguments shared by every listing source
struct ListingQuery<'a> {
    profile_url: &'a str,
    max: usize,
    force_refresh: bool,
}

/// Arguments shared by every detail source
struct DetailQuery<'a> {
    url: &'a str,
    slug: Option<&'a str>,
    force_refresh: bool,
}

/// Project access with snapshot, in-memory and live tiers.
///
/// Construct once per process and pass by reference. The in-memory cache
/// lives and dies with this value.
pub struct PortfolioService<F: PageFetcher> {
    fetcher: F,
    config: Config,
    cache: Mutex<MemoryCache>,
}

impl<F: PageFetcher> PortfolioService<F> {
    pub fn new(fetcher: F, config: Config) -> Self {
        Self {
            fetcher,
            config,
            cache: Mutex::new(MemoryCache::new(
                CacheTtl::MAX_ENTRIES,
                CacheTtl::PROCESS,
            )),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Try to get cached data
    fn get_cached<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let mut guard = self.cache.lock().ok()?;
        guard
            .get(key)
            .and_then(|data| serde_json::from_slice(&data).ok())
    }

    /// Store data in cache
    fn set_cached<T: Serialize>(&self, key: &str, data: &T) {
        if let Ok(mut guard) = self.cache.lock()
            && let Ok(json) = serde_json::to_vec(data)
        {
            guard.put(key, json);
        }
    }

    fn snapshot_projects(&self) -> Option<Vec<ProjectSummary>> {
        let path = self.config.snapshot_path();
        match storage::read_snapshot(&path) {
            Ok(Some(snapshot)) if !snapshot.projects.is_empty() => Some(snapshot.projects),
            Ok(_) => {
                debug!("No usable snapshot at {}", path.display());
                None
            }
            Err(e) => {
                warn!("Ignoring snapshot: {}", e);
                None
            }
        }
    }

    async fn try_listing(
        &self,
        source: ListingSource,
        query: &ListingQuery<'_>,
    ) -> Option<Vec<ProjectSummary>> {
        let key = cache_key(CacheKind::Projects, query.profile_url);

        match source {
            ListingSource::StaticSnapshot => {
                if query.force_refresh || !self.config.static_cache {
                    return None;
                }
                self.snapshot_projects()
            }
            ListingSource::ProcessCache => {
                if query.force_refresh {
                    return None;
                }
                let cached = self.get_cached(&key);
                if cached.is_some() {
                    debug!("Cache hit: {}", key);
                }
                cached
            }
            ListingSource::LiveScrape => {
                let scraped = scrape_profile(
                    &self.fetcher,
                    query.profile_url,
                    query.max,
                    self.config.page_delay(),
                )
                .await;
                match scraped {
                    Ok(projects) if !projects.is_empty() => {
                        self.set_cached(&key, &projects);
                        Some(projects)
                    }
                    Ok(_) => {
                        warn!(
                            "No projects parsed from {}, using manual fallback",
                            query.profile_url
                        );
                        None
                    }
                    Err(e) => {
                        error!("Failed to fetch profile projects: {}", e);
                        None
                    }
                }
            }
            ListingSource::ManualFallback => Some(manual_projects()),
        }
    }

    /// Resolve a listing and report which source served it.
    ///
    /// `profile_url` defaults to the configured profile and is normalized;
    /// `max` defaults to the configured cap.
    pub async fn resolve_projects(
        &self,
        profile_url: Option<&str>,
        max: Option<usize>,
        force_refresh: bool,
    ) -> Listing {
        let profile_url =
            normalize_profile_url(profile_url.unwrap_or(self.config.profile_url.as_str()));
        let query = ListingQuery {
            profile_url: &profile_url,
            max: max.unwrap_or(self.config.max_projects),
            force_refresh,
        };

        for source in ListingSource::ORDER {
            if let Some(projects) = self.try_listing(source, &query).await {
                debug!("Listing for {} served from {}", profile_url, source);
                return Listing { source, projects };
            }
        }

        Listing {
            source: ListingSource::ManualFallback,
            projects: manual_projects(),
        }
    }

    /// Project listing for a profile. Never fails.
    pub async fn get_projects(
        &self,
        profile_url: Option<&str>,
        max: Option<usize>,
        force_refresh: bool,
    ) -> Vec<ProjectSummary> {
        self.resolve_projects(profile_url, max, force_refresh)
            .await
            .projects
    }

    fn local_detail(&self, slug: &str) -> Option<ProjectDetail> {
        match storage::read_meta(&self.config.projects_dir(), slug) {
            Ok(Some(meta)) if !meta.gallery().is_empty() => Some(meta.to_detail()),
            Ok(_) => None,
            Err(e) => {
                debug!("Local metadata for {} unusable: {}", slug, e);
                None
            }
        }
    }

    async fn try_detail(
        &self,
        source: DetailSource,
        query: &DetailQuery<'_>,
    ) -> Option<ProjectDetail> {
        let key = cache_key(CacheKind::Detail, query.url);

        match source {
            DetailSource::LocalMeta => {
                if query.force_refresh || !self.config.static_cache {
                    return None;
                }
                self.local_detail(query.slug?)
            }
            DetailSource::ProcessCache => {
                if query.force_refresh {
                    return None;
                }
                let cached = self.get_cached(&key);
                if cached.is_some() {
                    debug!("Cache hit: {}", key);
                }
                cached
            }
            DetailSource::LiveFetch => match fetch_detail(&self.fetcher, query.url).await {
                Ok(detail) => {
                    self.set_cached(&key, &detail);
                    Some(detail)
                }
                Err(e) => {
                    error!("Failed to fetch project detail {}: {}", query.url, e);
                    None
                }
            },
        }
    }

    /// Resolve a project detail and report which source served it.
    pub async fn resolve_detail(
        &self,
        url: &str,
        force_refresh: bool,
        slug: Option<&str>,
    ) -> Option<Detail> {
        let query = DetailQuery {
            url,
            slug,
            force_refresh,
        };

        for source in DetailSource::ORDER {
            if let Some(detail) = self.try_detail(source, &query).await {
                debug!("Detail for {} served from {}", url, source);
                return Some(Detail { source, detail });
            }
        }
        None
    }

    /// Project detail, or `None` when every source came up empty.
    pub async fn get_project_detail(
        &self,
        url: &str,
        force_refresh: bool,
        slug: Option<&str>,
    ) -> Option<ProjectDetail> {
        self.resolve_detail(url, force_refresh, slug)
            .await
            .map(|d| d.detail)
    }

    /// Scrape afresh and replace the on-disk snapshot.
    pub async fn generate_snapshot(
        &self,
        profile_url: Option<&str>,
        max: Option<usize>,
    ) -> Result<CacheSnapshot> {
        let profile_url =
            normalize_profile_url(profile_url.unwrap_or(self.config.profile_url.as_str()));
        let projects = self.get_projects(Some(&profile_url), max, true).await;

        let snapshot = CacheSnapshot::new(profile_url, projects);
        storage::write_snapshot(&self.config.snapshot_path(), &snapshot)?;
        Ok(snapshot)
    }
}
