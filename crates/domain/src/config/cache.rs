use serde::{Deserialize, Serialize};

/// What the aggregator does when every live tier fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StalePolicy {
    /// Serve the last-known-good copy flagged as partial
    #[default]
    ServeStale,
    /// Return an explicit empty result
    ExplicitEmpty,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    /// Capacity of the in-memory LRU tier (default: 10000)
    #[serde(default = "default_memory_max_entries")]
    pub memory_max_entries: usize,

    /// Search results TTL in seconds (default: 7200)
    #[serde(default = "default_search_ttl")]
    pub search_ttl_secs: u64,

    /// Movie detail TTL in seconds (default: 3600)
    #[serde(default = "default_details_ttl")]
    pub details_ttl_secs: u64,

    /// Retention of last-known-good copies in seconds (default: 7 days)
    #[serde(default = "default_stale_retention")]
    pub stale_retention_secs: u64,

    #[serde(default)]
    pub stale_policy: StalePolicy,

    /// Interval between expired-entry sweeps in seconds (default: 300)
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_secs: u64,

    /// Disable to run memory-only (tests, throwaway instances)
    #[serde(default = "default_true")]
    pub persistent: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            memory_max_entries: default_memory_max_entries(),
            search_ttl_secs: default_search_ttl(),
            details_ttl_secs: default_details_ttl(),
            stale_retention_secs: default_stale_retention(),
            stale_policy: StalePolicy::default(),
            sweep_interval_secs: default_sweep_interval(),
            persistent: true,
        }
    }
}

fn default_memory_max_entries() -> usize {
    10_000
}

fn default_search_ttl() -> u64 {
    7200
}

fn default_details_ttl() -> u64 {
    3600
}

fn default_stale_retention() -> u64 {
    7 * 24 * 3600
}

fn default_sweep_interval() -> u64 {
    300
}

fn default_true() -> bool {
    true
}
