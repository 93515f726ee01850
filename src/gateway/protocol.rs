use crate::cache::types::CacheStats;

use serde::{Deserialize, Serialize};

/// `data` of the `/cache-stats` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheStatsView {
    pub hits: u64,
    pub misses: u64,
    pub invalidations: u64,
    pub total_requests: u64,
    /// Fraction in `[0, 1]`.
    pub hit_rate: f64,
    pub hit_rate_percent: f64,
    pub size: usize,
    pub capacity: usize,
}

impl From<CacheStats> for CacheStatsView {
    fn from(stats: CacheStats) -> Self {
        let hit_rate = stats.hit_rate();
        Self {
            hits: stats.hits,
            misses: stats.misses,
            invalidations: stats.invalidations,
            total_requests: stats.total_requests(),
            hit_rate,
            hit_rate_percent: (hit_rate * 10_000.0).round() / 100.0,
            size: stats.size,
            capacity: stats.capacity,
        }
    }
}
