use cinefetch_domain::config::CacheConfig;
use cinefetch_domain::{MovieRecord, ProviderResult, SearchQuery, StalePolicy};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use crate::services::{ProviderTier, TieredCache};

/// TTLs and stale behaviour for one kind of aggregated lookup.
#[derive(Debug, Clone, Copy)]
pub struct TierCachePolicy {
    pub ttl: Duration,
    pub stale_retention: Duration,
    pub stale_policy: StalePolicy,
}

impl TierCachePolicy {
    pub fn for_search(config: &CacheConfig) -> Self {
        Self {
            ttl: Duration::from_secs(config.search_ttl_secs),
            stale_retention: Duration::from_secs(config.stale_retention_secs),
            stale_policy: config.stale_policy,
        }
    }

    pub fn for_details(config: &CacheConfig) -> Self {
        Self {
            ttl: Duration::from_secs(config.details_ttl_secs),
            stale_retention: Duration::from_secs(config.stale_retention_secs),
            stale_policy: config.stale_policy,
        }
    }
}

pub fn stale_key(key: &str) -> String {
    format!("stale:{}", key)
}

/// Search Aggregator: cache, then each provider tier in order, then the
/// last-known-good copy, then an explicit empty result.
pub struct SearchMoviesUseCase {
    cache: Arc<TieredCache>,
    tiers: Vec<ProviderTier>,
    policy: TierCachePolicy,
}

impl SearchMoviesUseCase {
    pub fn new(cache: Arc<TieredCache>, tiers: Vec<ProviderTier>, policy: TierCachePolicy) -> Self {
        Self {
            cache,
            tiers,
            policy,
        }
    }

    #[instrument(skip(self), fields(q = %query.text))]
    pub async fn execute(&self, query: &SearchQuery) -> ProviderResult {
        if query.is_blank() {
            debug!("Blank search query, nothing to fetch");
            return ProviderResult::exhausted();
        }

        let key = query.cache_key();

        if let Some(items) = self.cache.get_json::<Vec<MovieRecord>>(&key).await {
            debug!(key = %key, count = items.len(), "Search served from cache");
            return ProviderResult::cached(items);
        }

        for tier in &self.tiers {
            match tier.search(query).await {
                Ok(items) => {
                    let items = query.filters.apply(items);
                    if items.is_empty() {
                        debug!(provider = %tier.name(), "Provider returned no matching items");
                        continue;
                    }

                    self.cache.set_json(&key, &items, self.policy.ttl).await;
                    self.cache
                        .set_json(&stale_key(&key), &items, self.policy.stale_retention)
                        .await;

                    info!(
                        provider = %tier.name(),
                        source = %tier.source(),
                        count = items.len(),
                        "Search resolved"
                    );
                    return ProviderResult::from_provider(tier.source(), items);
                }
                Err(e) => {
                    warn!(
                        provider = %tier.name(),
                        error = %e,
                        kind = e.kind(),
                        "Provider tier failed, falling through"
                    );
                }
            }
        }

        if self.policy.stale_policy == StalePolicy::ServeStale {
            if let Some(items) = self
                .cache
                .get_json::<Vec<MovieRecord>>(&stale_key(&key))
                .await
                .filter(|items| !items.is_empty())
            {
                warn!(key = %key, count = items.len(), "All providers failed, serving stale result");
                return ProviderResult::stale(items);
            }
        }

        warn!(key = %key, "All tiers exhausted");
        ProviderResult::exhausted()
    }
}
