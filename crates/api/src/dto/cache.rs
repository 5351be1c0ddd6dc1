use cinefetch_application::services::CacheStatsSnapshot;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CacheStatsResponse {
    pub memory_entries: u64,
    pub persistent_entries: Option<u64>,
    pub hits: u64,
    pub memory_hits: u64,
    pub persistent_hits: u64,
    pub misses: u64,
    pub promotions: u64,
    pub lazy_evictions: u64,
    pub insertions: u64,
    pub write_failures: u64,
    pub hit_rate: f64,
}

impl From<CacheStatsSnapshot> for CacheStatsResponse {
    fn from(s: CacheStatsSnapshot) -> Self {
        Self {
            memory_entries: s.memory_entries,
            persistent_entries: s.persistent_entries,
            hits: s.hits,
            memory_hits: s.memory_hits,
            persistent_hits: s.persistent_hits,
            misses: s.misses,
            promotions: s.promotions,
            lazy_evictions: s.lazy_evictions,
            insertions: s.insertions,
            write_failures: s.write_failures,
            hit_rate: s.hit_rate,
        }
    }
}
