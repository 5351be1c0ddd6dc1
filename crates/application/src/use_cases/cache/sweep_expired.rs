use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::services::{SweepReport, TieredCache};

/// Physically removes expired entries from every cache tier.
pub struct SweepExpiredEntriesUseCase {
    cache: Arc<TieredCache>,
}

impl SweepExpiredEntriesUseCase {
    pub fn new(cache: Arc<TieredCache>) -> Self {
        Self { cache }
    }

    #[instrument(skip(self))]
    pub async fn execute(&self) -> SweepReport {
        let report = self.cache.sweep().await;
        if report.total() > 0 {
            info!(
                memory_removed = report.memory_removed,
                persistent_removed = report.persistent_removed,
                "Expired cache entries swept"
            );
        } else {
            debug!("Cache sweep found nothing to remove");
        }
        report
    }
}
