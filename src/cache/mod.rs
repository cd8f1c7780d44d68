//! Project caching
//!
//! Two tiers sit in front of live scraping: a durable JSON snapshot on disk
//! (with per-project `meta.json` files) and a bounded in-memory cache owned
//! by [`PortfolioService`].

pub mod key;
pub mod memory;
pub mod rebuild;
pub mod service;
pub mod storage;

use std::time::Duration;

/// In-memory cache policy
pub struct CacheTtl;

impl CacheTtl {
    // Listings and details both go stale slowly
    pub const PROCESS: Duration = Duration::from_secs(30 * 60); // 30 min

    pub const MAX_ENTRIES: usize = 50;
}

// Re-export main types
pub use key::{CacheKind, cache_key};
pub use memory::MemoryCache;
pub use rebuild::rebuild_snapshot;
pub use service::{DetailSource, ListingSource, PortfolioService};
