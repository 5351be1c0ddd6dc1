use async_trait::async_trait;
use cinefetch_domain::{CacheEntry, DomainError};

/// One storage level of the tiered cache.
///
/// Tiers store entries as given and never judge expiry on `get`; the
/// `TieredCache` evaluates expiry against its clock and asks the tier to
/// evict.
#[async_trait]
pub trait CacheTier: Send + Sync {
    fn name(&self) -> &'static str;

    async fn get(&self, key: &str) -> Result<Option<CacheEntry>, DomainError>;

    /// Insert or fully replace the entry under `entry.key`.
    async fn put(&self, entry: CacheEntry) -> Result<(), DomainError>;

    async fn remove(&self, key: &str) -> Result<bool, DomainError>;

    /// Remove every entry with `expires_at_ms < now_ms`, returning the count.
    async fn remove_expired(&self, now_ms: u64) -> Result<u64, DomainError>;

    async fn len(&self) -> Result<u64, DomainError>;
}
