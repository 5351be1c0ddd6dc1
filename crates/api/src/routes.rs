use crate::handlers;
use crate::state::AppState;
use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

/// Creates all API routes with state
pub fn create_api_routes(state: AppState) -> Router {
    let image_path = state.image_proxy_path.to_string();

    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/api/search", get(handlers::search_movies))
        .route("/api/movies/{id}", get(handlers::get_movie_details))
        .route(&image_path, get(handlers::get_image))
        .route("/api/cache/stats", get(handlers::get_cache_stats))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
