use crate::{dto::MoviesEnvelope, state::AppState};
use axum::{
    extract::{Path, State},
    Json,
};
use tracing::{debug, instrument};

#[instrument(skip(state), name = "api_get_movie_details")]
pub async fn get_movie_details(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Json<MoviesEnvelope> {
    let result = state.get_details.execute(&id).await;

    debug!(id = %id, source = %result.source, found = !result.is_empty(), "Details served");

    Json(MoviesEnvelope::from_result(result, &state.image_proxy_path))
}
