pub mod provider_backoff;
pub mod provider_tier;
pub mod tiered_cache;

pub use provider_backoff::ProviderBackoff;
pub use provider_tier::ProviderTier;
pub use tiered_cache::{CacheMetrics, CacheStatsSnapshot, SweepReport, TieredCache};
