use serde::{Deserialize, Serialize};

/// Prefix of cache keys holding `/search/{topic}` responses.
pub const SEARCH_PREFIX: &str = "search";
/// Prefix of cache keys holding `/info/{id}` responses.
pub const INFO_PREFIX: &str = "info";

/// Topic matching is case-insensitive in the catalog, so the key is too.
pub fn search_key(topic: &str) -> String {
    format!("{}:{}", SEARCH_PREFIX, topic.to_lowercase())
}

pub fn info_key(book_id: u64) -> String {
    format!("{}:{}", INFO_PREFIX, book_id)
}

/// Snapshot of the cache counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub invalidations: u64,
    pub size: usize,
    pub capacity: usize,
}

impl CacheStats {
    pub fn total_requests(&self) -> u64 {
        self.hits + self.misses
    }

    /// `hits / (hits + misses)`, or 0 before the first lookup.
    pub fn hit_rate(&self) -> f64 {
        match self.total_requests() {
            0 => 0.0,
            total => self.hits as f64 / total as f64,
        }
    }
}
