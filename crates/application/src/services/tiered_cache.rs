use cinefetch_domain::{CacheEntry, CacheValue};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::ports::{CacheTier, Clock};

#[derive(Default)]
pub struct CacheMetrics {
    pub memory_hits: AtomicU64,
    pub persistent_hits: AtomicU64,
    pub misses: AtomicU64,
    pub promotions: AtomicU64,
    pub lazy_evictions: AtomicU64,
    pub insertions: AtomicU64,
    pub write_failures: AtomicU64,
    pub read_failures: AtomicU64,
}

impl CacheMetrics {
    pub fn hits(&self) -> u64 {
        self.memory_hits.load(AtomicOrdering::Relaxed)
            + self.persistent_hits.load(AtomicOrdering::Relaxed)
    }

    pub fn hit_rate(&self) -> f64 {
        let hits = self.hits() as f64;
        let total = hits + self.misses.load(AtomicOrdering::Relaxed) as f64;

        if total > 0.0 {
            (hits / total) * 100.0
        } else {
            0.0
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub memory_removed: u64,
    pub persistent_removed: u64,
}

impl SweepReport {
    pub fn total(&self) -> u64 {
        self.memory_removed + self.persistent_removed
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CacheStatsSnapshot {
    pub memory_entries: u64,
    /// `None` when running memory-only or when the tier could not be read.
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

/// Memory tier in front of an optional persistent tier.
///
/// Reads go memory then persistent; a live persistent hit is promoted.
/// Writes go to both; persistent failures are logged and counted but never
/// surface to the caller.
pub struct TieredCache {
    memory: Arc<dyn CacheTier>,
    persistent: Option<Arc<dyn CacheTier>>,
    clock: Arc<dyn Clock>,
    metrics: Arc<CacheMetrics>,
}

impl TieredCache {
    pub fn new(
        memory: Arc<dyn CacheTier>,
        persistent: Option<Arc<dyn CacheTier>>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        info!(
            memory_tier = memory.name(),
            persistent_tier = persistent.as_ref().map(|p| p.name()).unwrap_or("none"),
            "Initializing tiered cache"
        );
        Self {
            memory,
            persistent,
            clock,
            metrics: Arc::new(CacheMetrics::default()),
        }
    }

    pub fn metrics(&self) -> Arc<CacheMetrics> {
        Arc::clone(&self.metrics)
    }

    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    pub async fn get(&self, key: &str) -> Option<CacheValue> {
        self.get_entry(key).await.map(|entry| entry.value)
    }

    pub async fn get_entry(&self, key: &str) -> Option<CacheEntry> {
        let now = self.clock.now_ms();

        match self.memory.get(key).await {
            Ok(Some(entry)) if !entry.is_expired(now) => {
                self.metrics.memory_hits.fetch_add(1, AtomicOrdering::Relaxed);
                debug!(key = %key, tier = "memory", "Cache HIT");
                return Some(entry);
            }
            Ok(Some(_)) => {
                self.evict(self.memory.as_ref(), key).await;
            }
            Ok(None) => {}
            Err(e) => {
                self.metrics.read_failures.fetch_add(1, AtomicOrdering::Relaxed);
                warn!(key = %key, error = %e, "Memory tier read failed");
            }
        }

        if let Some(persistent) = &self.persistent {
            match persistent.get(key).await {
                Ok(Some(entry)) if !entry.is_expired(now) => {
                    self.metrics.persistent_hits.fetch_add(1, AtomicOrdering::Relaxed);
                    if let Err(e) = self.memory.put(entry.clone()).await {
                        warn!(key = %key, error = %e, "Failed to promote entry into memory tier");
                    } else {
                        self.metrics.promotions.fetch_add(1, AtomicOrdering::Relaxed);
                    }
                    debug!(key = %key, tier = "persistent", "Cache HIT (promoted)");
                    return Some(entry);
                }
                Ok(Some(_)) => {
                    self.evict(persistent.as_ref(), key).await;
                }
                Ok(None) => {}
                Err(e) => {
                    self.metrics.read_failures.fetch_add(1, AtomicOrdering::Relaxed);
                    warn!(key = %key, error = %e, "Persistent tier read failed");
                }
            }
        }

        self.metrics.misses.fetch_add(1, AtomicOrdering::Relaxed);
        debug!(key = %key, "Cache MISS");
        None
    }

    /// Last write wins. A zero TTL is clamped to 1 ms.
    pub async fn set(&self, key: &str, value: CacheValue, ttl: Duration) {
        let now = self.clock.now_ms();
        let ttl_ms = u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX);
        let entry = CacheEntry::new(key, value, now, ttl_ms);

        if let Err(e) = self.memory.put(entry.clone()).await {
            warn!(key = %key, error = %e, "Memory tier write failed");
        }

        if let Some(persistent) = &self.persistent {
            if let Err(e) = persistent.put(entry).await {
                self.metrics.write_failures.fetch_add(1, AtomicOrdering::Relaxed);
                warn!(key = %key, error = %e, "Persistent tier write failed, continuing memory-only for this entry");
            }
        }

        self.metrics.insertions.fetch_add(1, AtomicOrdering::Relaxed);
        debug!(key = %key, ttl_ms = ttl_ms, "Inserted into cache");
    }

    pub async fn get_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.get(key).await?;
        match value.decode::<T>() {
            Ok(decoded) => Some(decoded),
            Err(e) => {
                warn!(key = %key, error = %e, "Discarding undecodable cache entry");
                self.invalidate(key).await;
                None
            }
        }
    }

    pub async fn set_json<T: Serialize>(&self, key: &str, value: &T, ttl: Duration) {
        match CacheValue::from_serialize(value) {
            Ok(v) => self.set(key, v, ttl).await,
            Err(e) => warn!(key = %key, error = %e, "Failed to serialize cache value"),
        }
    }

    pub async fn invalidate(&self, key: &str) {
        if let Err(e) = self.memory.remove(key).await {
            warn!(key = %key, error = %e, "Memory tier remove failed");
        }
        if let Some(persistent) = &self.persistent {
            if let Err(e) = persistent.remove(key).await {
                warn!(key = %key, error = %e, "Persistent tier remove failed");
            }
        }
    }

    pub async fn sweep(&self) -> SweepReport {
        let now = self.clock.now_ms();
        let mut report = SweepReport::default();

        match self.memory.remove_expired(now).await {
            Ok(n) => report.memory_removed = n,
            Err(e) => warn!(error = %e, "Memory tier sweep failed"),
        }

        if let Some(persistent) = &self.persistent {
            match persistent.remove_expired(now).await {
                Ok(n) => report.persistent_removed = n,
                Err(e) => warn!(error = %e, "Persistent tier sweep failed"),
            }
        }

        report
    }

    pub async fn stats(&self) -> CacheStatsSnapshot {
        let memory_entries = self.memory.len().await.unwrap_or(0);
        let persistent_entries = match &self.persistent {
            Some(p) => p.len().await.ok(),
            None => None,
        };
        let m = &self.metrics;

        CacheStatsSnapshot {
            memory_entries,
            persistent_entries,
            hits: m.hits(),
            memory_hits: m.memory_hits.load(AtomicOrdering::Relaxed),
            persistent_hits: m.persistent_hits.load(AtomicOrdering::Relaxed),
            misses: m.misses.load(AtomicOrdering::Relaxed),
            promotions: m.promotions.load(AtomicOrdering::Relaxed),
            lazy_evictions: m.lazy_evictions.load(AtomicOrdering::Relaxed),
            insertions: m.insertions.load(AtomicOrdering::Relaxed),
            write_failures: m.write_failures.load(AtomicOrdering::Relaxed),
            hit_rate: m.hit_rate(),
        }
    }

    async fn evict(&self, tier: &dyn CacheTier, key: &str) {
        match tier.remove(key).await {
            Ok(_) => {
                self.metrics.lazy_evictions.fetch_add(1, AtomicOrdering::Relaxed);
                debug!(key = %key, tier = tier.name(), "Evicted expired entry");
            }
            Err(e) => warn!(key = %key, tier = tier.name(), error = %e, "Failed to evict expired entry"),
        }
    }
}
