#![allow(dead_code)]

use async_trait::async_trait;
use axum::{body::Body, http::Request, Router};
use bytes::Bytes;
use cinefetch_api::{create_api_routes, AppState};
use cinefetch_application::ports::{FetchedImage, ImageOrigin, MovieProvider};
use cinefetch_application::services::{ProviderBackoff, ProviderTier, TieredCache};
use cinefetch_application::use_cases::{
    GetCacheStatsUseCase, GetMovieDetailsUseCase, ResolveImageUseCase, SearchMoviesUseCase,
    TierCachePolicy,
};
use cinefetch_domain::config::{BackoffConfig, CacheConfig, HeaderProfile, ImageConfig};
use cinefetch_domain::{FetchError, MovieRecord, ResultSource, SearchQuery};
use cinefetch_infrastructure::cache::MemoryCacheTier;
use cinefetch_infrastructure::clock::SystemClock;
use cinefetch_infrastructure::image::SvgPlaceholderRenderer;
use http_body_util::BodyExt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

pub const PROXY_PATH: &str = "/api/image";

/// Provider answering every search with the same records, or failing.
pub struct FixedProvider {
    items: Option<Vec<MovieRecord>>,
    calls: AtomicUsize,
}

impl FixedProvider {
    pub fn returning(items: Vec<MovieRecord>) -> Arc<Self> {
        Arc::new(Self {
            items: Some(items),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            items: None,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MovieProvider for FixedProvider {
    fn name(&self) -> &str {
        "fixed"
    }

    async fn search(&self, _query: &SearchQuery) -> Result<Vec<MovieRecord>, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.items
            .clone()
            .ok_or_else(|| FetchError::Transport("connection refused".into()))
    }

    async fn details(&self, id: &str) -> Result<Option<MovieRecord>, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.items {
            Some(items) => Ok(items.iter().find(|m| m.id == id).cloned()),
            None => Err(FetchError::Transport("connection refused".into())),
        }
    }
}

/// Origin that serves one fixed JPEG body, or always fails.
pub struct FixedOrigin {
    body: Option<Bytes>,
    calls: AtomicUsize,
}

impl FixedOrigin {
    pub fn serving(body: &'static [u8]) -> Arc<Self> {
        Arc::new(Self {
            body: Some(Bytes::from_static(body)),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            body: None,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ImageOrigin for FixedOrigin {
    async fn fetch(&self, _url: &str, _profile: &HeaderProfile) -> Result<FetchedImage, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.body {
            Some(body) => Ok(FetchedImage {
                content_type: "image/jpeg".into(),
                bytes: body.clone(),
            }),
            None => Err(FetchError::rejected(403, "hotlink refused")),
        }
    }
}

pub fn build_router(provider: Arc<FixedProvider>, origin: Arc<FixedOrigin>) -> Router {
    let clock = Arc::new(SystemClock);
    let cache = Arc::new(TieredCache::new(
        Arc::new(MemoryCacheTier::new(1000)),
        None,
        clock.clone(),
    ));
    let cache_config = CacheConfig::default();

    let tier = || {
        vec![ProviderTier::new(
            provider.clone(),
            ResultSource::Primary,
            Duration::from_secs(1),
            4,
            Arc::new(ProviderBackoff::new("fixed", BackoffConfig::default(), clock.clone())),
        )]
    };

    let state = AppState {
        search_movies: Arc::new(SearchMoviesUseCase::new(
            cache.clone(),
            tier(),
            TierCachePolicy::for_search(&cache_config),
        )),
        get_details: Arc::new(GetMovieDetailsUseCase::new(
            cache.clone(),
            tier(),
            TierCachePolicy::for_details(&cache_config),
        )),
        resolve_image: Arc::new(ResolveImageUseCase::new(
            cache.clone(),
            origin,
            Arc::new(SvgPlaceholderRenderer::new()),
            ImageConfig {
                timeout_ms: 500,
                ..Default::default()
            },
            PROXY_PATH,
        )),
        get_cache_stats: Arc::new(GetCacheStatsUseCase::new(cache)),
        image_proxy_path: Arc::from(PROXY_PATH),
    };

    create_api_routes(state)
}

pub async fn get(router: &Router, uri: &str) -> (u16, axum::http::HeaderMap, Bytes) {
    let response = router
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status().as_u16();
    let headers = response.headers().clone();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, headers, body)
}

pub async fn get_json(router: &Router, uri: &str) -> (u16, serde_json::Value) {
    let (status, _, body) = get(router, uri).await;
    (status, serde_json::from_slice(&body).unwrap())
}

pub fn heat() -> MovieRecord {
    MovieRecord::new("tt0113277", "Heat")
        .with_year(1995)
        .with_rating(8.3)
        .with_genres(["Action", "Crime"])
        .with_poster("https://img.example/heat.jpg")
}
