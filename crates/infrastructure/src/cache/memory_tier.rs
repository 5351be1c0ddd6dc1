use async_trait::async_trait;
use cinefetch_application::ports::CacheTier;
use cinefetch_domain::{CacheEntry, DomainError};
use lru::LruCache;
use rustc_hash::FxBuildHasher;
use std::num::NonZeroUsize;
use std::sync::{Mutex, MutexGuard};
use tracing::info;

/// Bounded in-process tier. Least recently used entries are dropped when
/// `max_entries` is reached.
pub struct MemoryCacheTier {
    entries: Mutex<LruCache<String, CacheEntry, FxBuildHasher>>,
}

impl MemoryCacheTier {
    pub fn new(max_entries: usize) -> Self {
        let capacity = NonZeroUsize::new(max_entries).unwrap_or(NonZeroUsize::MIN);
        info!(max_entries = capacity.get(), "Initializing memory cache tier");
        Self {
            entries: Mutex::new(LruCache::with_hasher(capacity, FxBuildHasher)),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, LruCache<String, CacheEntry, FxBuildHasher>>, DomainError> {
        self.entries
            .lock()
            .map_err(|_| DomainError::IoError("memory cache lock poisoned".to_string()))
    }
}

#[async_trait]
impl CacheTier for MemoryCacheTier {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn get(&self, key: &str) -> Result<Option<CacheEntry>, DomainError> {
        Ok(self.lock()?.get(key).cloned())
    }

    async fn put(&self, entry: CacheEntry) -> Result<(), DomainError> {
        self.lock()?.put(entry.key.clone(), entry);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<bool, DomainError> {
        Ok(self.lock()?.pop(key).is_some())
    }

    async fn remove_expired(&self, now_ms: u64) -> Result<u64, DomainError> {
        let mut entries = self.lock()?;
        let expired: Vec<String> = entries
            .iter()
            .filter(|(_, e)| e.is_expired(now_ms))
            .map(|(k, _)| k.clone())
            .collect();
        for key in &expired {
            entries.pop(key);
        }
        Ok(expired.len() as u64)
    }

    async fn len(&self) -> Result<u64, DomainError> {
        Ok(self.lock()?.len() as u64)
    }
}
