use crate::{
    dto::{MoviesEnvelope, SearchParams},
    state::AppState,
};
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use tracing::{debug, instrument, warn};

/// Always answers 200; an exhausted search is an empty envelope with
/// `no_results` set.
#[instrument(skip_all, name = "api_search_movies")]
pub async fn search_movies(
    State(state): State<AppState>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Json<MoviesEnvelope> {
    let params = match params {
        Ok(Query(p)) => p,
        Err(e) => {
            warn!(error = %e, "Unparseable search query string");
            SearchParams::default()
        }
    };

    let query = params.into_query();
    let result = state.search_movies.execute(&query).await;

    debug!(
        query = %query.text,
        source = %result.source,
        count = result.items.len(),
        partial = result.partial,
        "Search served"
    );

    Json(MoviesEnvelope::from_result(result, &state.image_proxy_path))
}
