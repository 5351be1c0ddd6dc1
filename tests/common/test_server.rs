use cinefetch_api::{create_api_routes, AppState};
use cinefetch_application::ports::{CacheTier, Clock, MovieProvider};
use cinefetch_application::services::{ProviderBackoff, ProviderTier, TieredCache};
use cinefetch_application::use_cases::{
    GetCacheStatsUseCase, GetMovieDetailsUseCase, ResolveImageUseCase, SearchMoviesUseCase,
    TierCachePolicy,
};
use cinefetch_client::MovieClient;
use cinefetch_domain::config::{ClientConfig, DatabaseConfig, ProviderConfig};
use cinefetch_domain::{Config, ResultSource, StalePolicy};
use cinefetch_infrastructure::cache::{MemoryCacheTier, SqliteCacheTier};
use cinefetch_infrastructure::clock::SystemClock;
use cinefetch_infrastructure::database::create_pool;
use cinefetch_infrastructure::image::{HttpImageOrigin, SvgPlaceholderRenderer};
use cinefetch_infrastructure::providers::{OmdbProvider, TmdbProvider};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;

/// The full HTTP stack on a random local port, wired like the binary.
pub struct TestServer {
    addr: SocketAddr,
    cache: Arc<TieredCache>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl TestServer {
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn cache(&self) -> &TieredCache {
        &self.cache
    }

    pub fn client(&self) -> MovieClient {
        MovieClient::new(&ClientConfig {
            base_url: self.base_url(),
            debounce_ms: 20,
            ..Default::default()
        })
        .unwrap()
    }

    pub fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

pub struct TestServerBuilder {
    primary_url: Option<String>,
    secondary_url: Option<String>,
    stale_policy: StalePolicy,
    persistent: bool,
}

impl TestServerBuilder {
    pub fn new() -> Self {
        Self {
            primary_url: None,
            secondary_url: None,
            stale_policy: StalePolicy::ServeStale,
            persistent: true,
        }
    }

    pub fn with_primary(mut self, url: impl Into<String>) -> Self {
        self.primary_url = Some(url.into());
        self
    }

    pub fn with_secondary(mut self, url: impl Into<String>) -> Self {
        self.secondary_url = Some(url.into());
        self
    }

    pub fn with_stale_policy(mut self, policy: StalePolicy) -> Self {
        self.stale_policy = policy;
        self
    }

    pub fn memory_only(mut self) -> Self {
        self.persistent = false;
        self
    }

    pub async fn start(self) -> TestServer {
        let mut config = Config::default();
        config.cache.stale_policy = self.stale_policy;
        config.image.timeout_ms = 2_000;

        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let persistent = if self.persistent {
            let pool = create_pool(&DatabaseConfig {
                path: ":memory:".into(),
                ..Default::default()
            })
            .await
            .unwrap();
            Some(Arc::new(SqliteCacheTier::new(pool)) as Arc<dyn CacheTier>)
        } else {
            None
        };
        let cache = Arc::new(TieredCache::new(
            Arc::new(MemoryCacheTier::new(1000)),
            persistent,
            clock.clone(),
        ));

        let mut tiers = Vec::new();
        if let Some(url) = &self.primary_url {
            let provider = Arc::new(OmdbProvider::new(&upstream(url, false))) as Arc<dyn MovieProvider>;
            tiers.push(tier(provider, ResultSource::Primary, &config, &clock));
        }
        if let Some(url) = &self.secondary_url {
            let provider = Arc::new(TmdbProvider::new(&upstream(url, true))) as Arc<dyn MovieProvider>;
            tiers.push(tier(provider, ResultSource::Secondary, &config, &clock));
        }

        let state = AppState {
            search_movies: Arc::new(SearchMoviesUseCase::new(
                cache.clone(),
                tiers.clone(),
                TierCachePolicy::for_search(&config.cache),
            )),
            get_details: Arc::new(GetMovieDetailsUseCase::new(
                cache.clone(),
                tiers,
                TierCachePolicy::for_details(&config.cache),
            )),
            resolve_image: Arc::new(ResolveImageUseCase::new(
                cache.clone(),
                Arc::new(HttpImageOrigin::new(&config.image)),
                Arc::new(SvgPlaceholderRenderer::new()),
                config.image.clone(),
                config.server.image_proxy_path.clone(),
            )),
            get_cache_stats: Arc::new(GetCacheStatsUseCase::new(cache.clone())),
            image_proxy_path: Arc::from(config.server.image_proxy_path.as_str()),
        };

        let listener = tokio::net::TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
            .await
            .unwrap();
        let addr = listener.local_addr().unwrap();
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        tokio::spawn(async move {
            let _ = axum::serve(listener, create_api_routes(state))
                .with_graceful_shutdown(async move {
                    let _ = shutdown_rx.await;
                })
                .await;
        });

        TestServer {
            addr,
            cache,
            shutdown_tx: Some(shutdown_tx),
        }
    }
}

impl Default for TestServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn upstream(url: &str, with_images: bool) -> ProviderConfig {
    ProviderConfig {
        enabled: true,
        base_url: url.to_string(),
        image_base_url: if with_images {
            Some(format!("{}/img", url))
        } else {
            None
        },
        api_key: Some("test-key".into()),
        timeout_ms: 2_000,
        max_concurrency: 4,
    }
}

fn tier(
    provider: Arc<dyn MovieProvider>,
    source: ResultSource,
    config: &Config,
    clock: &Arc<dyn Clock>,
) -> ProviderTier {
    let backoff = Arc::new(ProviderBackoff::new(
        provider.name(),
        config.providers.backoff.clone(),
        clock.clone(),
    ));
    ProviderTier::new(provider, source, Duration::from_secs(2), 4, backoff)
}
