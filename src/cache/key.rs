//! Process cache key generation

/// What a process cache entry holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheKind {
    /// A profile listing, keyed by normalized profile URL
    Projects,
    /// A single project detail, keyed by project URL
    Detail,
}

impl CacheKind {
    pub fn prefix(self) -> &'static str {
        match self {
            CacheKind::Projects => "projects",
            CacheKind::Detail => "detail",
        }
    }
}

/// Build the key for `url` under `kind`, e.g. `projects:https://...`.
///
/// Callers normalize profile URLs first; the key is taken verbatim.
pub fn cache_key(kind: CacheKind, url: &str) -> String {
    format!("{}:{}", kind.prefix(), url)
}
