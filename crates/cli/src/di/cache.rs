use cinefetch_application::ports::{CacheTier, Clock};
use cinefetch_application::services::TieredCache;
use cinefetch_domain::Config;
use cinefetch_infrastructure::cache::{MemoryCacheTier, SqliteCacheTier};
use cinefetch_infrastructure::clock::SystemClock;
use sqlx::SqlitePool;
use std::sync::Arc;
use tracing::info;

/// One process-lifetime cache shared by every use case.
pub struct CacheServices {
    pub clock: Arc<dyn Clock>,
    pub cache: Arc<TieredCache>,
}

impl CacheServices {
    pub fn new(config: &Config, pool: Option<SqlitePool>) -> Self {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let memory: Arc<dyn CacheTier> = Arc::new(MemoryCacheTier::new(config.cache.memory_max_entries));
        let persistent = pool.map(|pool| Arc::new(SqliteCacheTier::new(pool)) as Arc<dyn CacheTier>);

        info!(
            memory_max_entries = config.cache.memory_max_entries,
            persistent = persistent.is_some(),
            "Cache tiers initialized"
        );

        Self {
            cache: Arc::new(TieredCache::new(memory, persistent, clock.clone())),
            clock,
        }
    }
}
