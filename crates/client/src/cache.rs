use cinefetch_domain::config::ClientConfig;
use lru::LruCache;
use rustc_hash::FxBuildHasher;
use std::num::NonZeroUsize;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TtlClass {
    Search,
    Details,
    /// Trending/popular shelves.
    Lists,
}

#[derive(Debug, Clone, Copy)]
pub struct ClientTtls {
    pub search: Duration,
    pub details: Duration,
    pub lists: Duration,
}

impl ClientTtls {
    pub fn from_config(config: &ClientConfig) -> Self {
        Self {
            search: Duration::from_secs(config.search_ttl_secs),
            details: Duration::from_secs(config.details_ttl_secs),
            lists: Duration::from_secs(config.list_ttl_secs),
        }
    }

    pub fn for_class(&self, class: TtlClass) -> Duration {
        match class {
            TtlClass::Search => self.search,
            TtlClass::Details => self.details,
            TtlClass::Lists => self.lists,
        }
    }
}

impl Default for ClientTtls {
    fn default() -> Self {
        Self::from_config(&ClientConfig::default())
    }
}

struct Timed<V> {
    value: V,
    expires_at: Instant,
}

/// Bounded LRU with per-class TTLs, independent of the server caches.
/// Expired entries are dropped on read.
pub struct ClientCache<V> {
    entries: Mutex<LruCache<String, Timed<V>, FxBuildHasher>>,
    ttls: ClientTtls,
}

impl<V: Clone> ClientCache<V> {
    pub fn new(max_entries: usize, ttls: ClientTtls) -> Self {
        let capacity = NonZeroUsize::new(max_entries).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::with_hasher(capacity, FxBuildHasher)),
            ttls,
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.cache_max_entries, ClientTtls::from_config(config))
    }

    pub fn get(&self, key: &str) -> Option<V> {
        let mut entries = self.lock();
        let expired = match entries.get(key) {
            Some(timed) if Instant::now() < timed.expires_at => return Some(timed.value.clone()),
            Some(_) => true,
            None => false,
        };
        if expired {
            entries.pop(key);
            debug!(key = %key, "Client cache entry expired");
        }
        None
    }

    pub fn insert(&self, key: impl Into<String>, value: V, class: TtlClass) {
        let expires_at = Instant::now() + self.ttls.for_class(class);
        self.lock().put(key.into(), Timed { value, expires_at });
    }

    pub fn invalidate(&self, key: &str) -> bool {
        self.lock().pop(key).is_some()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, LruCache<String, Timed<V>, FxBuildHasher>> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
