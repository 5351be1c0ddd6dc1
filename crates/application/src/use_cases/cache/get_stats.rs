use std::sync::Arc;

use crate::services::{CacheStatsSnapshot, TieredCache};

pub struct GetCacheStatsUseCase {
    cache: Arc<TieredCache>,
}

impl GetCacheStatsUseCase {
    pub fn new(cache: Arc<TieredCache>) -> Self {
        Self { cache }
    }

    pub async fn execute(&self) -> CacheStatsSnapshot {
        self.cache.stats().await
    }
}
