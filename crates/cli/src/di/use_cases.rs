use cinefetch_api::AppState;
use cinefetch_application::use_cases::{
    GetCacheStatsUseCase, GetMovieDetailsUseCase, ResolveImageUseCase, SearchMoviesUseCase,
    SweepExpiredEntriesUseCase, TierCachePolicy,
};
use cinefetch_domain::Config;
use cinefetch_infrastructure::image::{HttpImageOrigin, SvgPlaceholderRenderer};
use std::sync::Arc;

use super::{CacheServices, ProviderServices};

pub struct UseCases {
    pub search_movies: Arc<SearchMoviesUseCase>,
    pub get_details: Arc<GetMovieDetailsUseCase>,
    pub resolve_image: Arc<ResolveImageUseCase>,
    pub get_cache_stats: Arc<GetCacheStatsUseCase>,
    pub sweep_expired: Arc<SweepExpiredEntriesUseCase>,
}

impl UseCases {
    pub fn new(config: &Config, caches: &CacheServices, providers: &ProviderServices) -> Self {
        let cache = caches.cache.clone();

        Self {
            search_movies: Arc::new(SearchMoviesUseCase::new(
                cache.clone(),
                providers.tiers(),
                TierCachePolicy::for_search(&config.cache),
            )),
            get_details: Arc::new(GetMovieDetailsUseCase::new(
                cache.clone(),
                providers.tiers(),
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
            sweep_expired: Arc::new(SweepExpiredEntriesUseCase::new(cache)),
        }
    }

    pub fn app_state(&self, config: &Config) -> AppState {
        AppState {
            search_movies: self.search_movies.clone(),
            get_details: self.get_details.clone(),
            resolve_image: self.resolve_image.clone(),
            get_cache_stats: self.get_cache_stats.clone(),
            image_proxy_path: Arc::from(config.server.image_proxy_path.as_str()),
        }
    }
}
