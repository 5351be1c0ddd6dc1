use cinefetch_application::ports::{Clock, MovieProvider};
use cinefetch_application::services::{ProviderBackoff, ProviderTier};
use cinefetch_domain::config::{BackoffConfig, ProviderConfig};
use cinefetch_domain::{Config, ResultSource};
use cinefetch_infrastructure::providers::{OmdbProvider, TmdbProvider};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Enabled providers in fallback order. Search and details receive clones
/// of the same tiers, so concurrency ceilings and backoff windows are
/// per provider, not per use case.
pub struct ProviderServices {
    tiers: Vec<ProviderTier>,
}

impl ProviderServices {
    pub fn new(config: &Config, clock: Arc<dyn Clock>) -> Self {
        let providers = &config.providers;
        let candidates = [
            (
                &providers.primary,
                ResultSource::Primary,
                Arc::new(OmdbProvider::new(&providers.primary)) as Arc<dyn MovieProvider>,
            ),
            (
                &providers.secondary,
                ResultSource::Secondary,
                Arc::new(TmdbProvider::new(&providers.secondary)) as Arc<dyn MovieProvider>,
            ),
        ];

        let tiers: Vec<ProviderTier> = candidates
            .into_iter()
            .filter_map(|(cfg, source, provider)| {
                wire(cfg, source, provider, &providers.backoff, &clock)
            })
            .collect();

        if tiers.is_empty() {
            warn!("No providers enabled; only cached data will be served");
        }
        Self { tiers }
    }

    pub fn tiers(&self) -> Vec<ProviderTier> {
        self.tiers.clone()
    }
}

fn wire(
    cfg: &ProviderConfig,
    source: ResultSource,
    provider: Arc<dyn MovieProvider>,
    backoff: &BackoffConfig,
    clock: &Arc<dyn Clock>,
) -> Option<ProviderTier> {
    if !cfg.enabled {
        info!(tier = %source, provider = provider.name(), "Provider disabled");
        return None;
    }
    if cfg.api_key.is_none() {
        warn!(tier = %source, provider = provider.name(), "Provider has no API key configured");
    }
    info!(
        tier = %source,
        provider = provider.name(),
        base_url = %cfg.base_url,
        timeout_ms = cfg.timeout_ms,
        max_concurrency = cfg.max_concurrency,
        "Provider enabled"
    );

    let backoff = Arc::new(ProviderBackoff::new(provider.name(), backoff.clone(), clock.clone()));
    Some(ProviderTier::new(
        provider,
        source,
        Duration::from_millis(cfg.timeout_ms),
        cfg.max_concurrency,
        backoff,
    ))
}
