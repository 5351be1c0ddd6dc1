use cinefetch_application::use_cases::{
    GetCacheStatsUseCase, GetMovieDetailsUseCase, ResolveImageUseCase, SearchMoviesUseCase,
};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub search_movies: Arc<SearchMoviesUseCase>,
    pub get_details: Arc<GetMovieDetailsUseCase>,
    pub resolve_image: Arc<ResolveImageUseCase>,
    pub get_cache_stats: Arc<GetCacheStatsUseCase>,
    /// Path posters are rewritten to, e.g. `/api/image`.
    pub image_proxy_path: Arc<str>,
}
