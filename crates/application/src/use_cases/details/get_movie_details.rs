use cinefetch_domain::{MovieRecord, ProviderResult, StalePolicy};
use std::sync::Arc;
use tracing::{debug, instrument, warn};

use crate::services::{ProviderTier, TieredCache};
use crate::use_cases::search::{stale_key, TierCachePolicy};

pub struct GetMovieDetailsUseCase {
    cache: Arc<TieredCache>,
    tiers: Vec<ProviderTier>,
    policy: TierCachePolicy,
}

impl GetMovieDetailsUseCase {
    pub fn new(cache: Arc<TieredCache>, tiers: Vec<ProviderTier>, policy: TierCachePolicy) -> Self {
        Self {
            cache,
            tiers,
            policy,
        }
    }

    pub fn cache_key(id: &str) -> String {
        format!("details:{}", id.trim())
    }

    #[instrument(skip(self))]
    pub async fn execute(&self, id: &str) -> ProviderResult {
        if id.trim().is_empty() {
            debug!("Blank movie id rejected");
            return ProviderResult::exhausted();
        }

        let key = Self::cache_key(id);

        if let Some(movie) = self.cache.get_json::<MovieRecord>(&key).await {
            return ProviderResult::cached(vec![movie]);
        }

        for tier in &self.tiers {
            match tier.details(id.trim()).await {
                Ok(Some(movie)) => {
                    self.cache.set_json(&key, &movie, self.policy.ttl).await;
                    self.cache
                        .set_json(&stale_key(&key), &movie, self.policy.stale_retention)
                        .await;
                    return ProviderResult::from_provider(tier.source(), vec![movie]);
                }
                Ok(None) => {
                    debug!(provider = %tier.name(), id = %id, "Provider has no such movie");
                }
                Err(e) => {
                    warn!(provider = %tier.name(), id = %id, error = %e, "Details lookup failed");
                }
            }
        }

        if self.policy.stale_policy == StalePolicy::ServeStale {
            if let Some(movie) = self.cache.get_json::<MovieRecord>(&stale_key(&key)).await {
                warn!(id = %id, "Serving stale movie details");
                return ProviderResult::stale(vec![movie]);
            }
        }

        ProviderResult::exhausted()
    }
}
