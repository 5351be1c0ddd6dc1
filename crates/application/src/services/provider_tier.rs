use cinefetch_domain::{FetchError, MovieRecord, ResultSource, SearchQuery};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tracing::debug;

use super::ProviderBackoff;
use crate::ports::MovieProvider;

/// A provider plus the guards the aggregator applies around every call:
/// backoff skip, a concurrency ceiling shared across requests, and a timeout.
/// Clones share the semaphore and backoff state.
#[derive(Clone)]
pub struct ProviderTier {
    provider: Arc<dyn MovieProvider>,
    source: ResultSource,
    timeout: Duration,
    permits: Arc<Semaphore>,
    backoff: Arc<ProviderBackoff>,
}

impl ProviderTier {
    pub fn new(
        provider: Arc<dyn MovieProvider>,
        source: ResultSource,
        timeout: Duration,
        max_concurrency: usize,
        backoff: Arc<ProviderBackoff>,
    ) -> Self {
        Self {
            provider,
            source,
            timeout,
            permits: Arc::new(Semaphore::new(max_concurrency.max(1))),
            backoff,
        }
    }

    pub fn source(&self) -> ResultSource {
        self.source
    }

    pub fn name(&self) -> &str {
        self.provider.name()
    }

    pub fn backoff(&self) -> &ProviderBackoff {
        &self.backoff
    }

    pub async fn search(&self, query: &SearchQuery) -> Result<Vec<MovieRecord>, FetchError> {
        self.guarded(self.provider.search(query)).await
    }

    pub async fn details(&self, id: &str) -> Result<Option<MovieRecord>, FetchError> {
        self.guarded(self.provider.details(id)).await
    }

    async fn guarded<T, F>(&self, call: F) -> Result<T, FetchError>
    where
        F: Future<Output = Result<T, FetchError>>,
    {
        if self.backoff.should_skip() {
            debug!(provider = %self.name(), "Skipping provider in backoff window");
            return Err(FetchError::Exhausted);
        }

        // Only the provider call feeds the backoff; an expired permit wait does not.
        let _permit = match tokio::time::timeout(self.timeout, self.permits.acquire()).await {
            Ok(Ok(permit)) => permit,
            Ok(Err(_)) => {
                return Err(FetchError::Transport("provider semaphore closed".to_string()));
            }
            Err(_) => {
                debug!(provider = %self.name(), "No provider permit within timeout");
                return Err(FetchError::Timeout);
            }
        };

        let result = match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(FetchError::Timeout),
        };

        match &result {
            Ok(_) => self.backoff.record_success(),
            Err(FetchError::MalformedInput(_)) => {}
            Err(_) => self.backoff.record_failure(),
        }

        result
    }
}
