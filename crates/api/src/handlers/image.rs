use crate::{dto::ImageParams, state::AppState};
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::{header, HeaderMap, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use cinefetch_domain::image::PLACEHOLDER_CONTENT_TYPE;
use tracing::{debug, instrument, warn};

const X_CACHE: HeaderName = HeaderName::from_static("x-cache");
const X_PLACEHOLDER: HeaderName = HeaderName::from_static("x-placeholder");

/// Image proxy. Never fails: missing or garbled parameters resolve to a
/// placeholder like any other unusable URL.
#[instrument(skip_all, name = "api_get_image")]
pub async fn get_image(
    State(state): State<AppState>,
    params: Result<Query<ImageParams>, QueryRejection>,
) -> Response {
    let params = match params {
        Ok(Query(p)) => p,
        Err(e) => {
            warn!(error = %e, "Unparseable image query string");
            ImageParams::default()
        }
    };
    let url = params.url.unwrap_or_default();
    let alt = params.alt.unwrap_or_default();

    let outcome = state.resolve_image.execute(&url, &alt).await;
    let ttl = state.resolve_image.ttl_for(&outcome);

    let mut headers = HeaderMap::new();
    let content_type = HeaderValue::from_str(&outcome.content_type)
        .unwrap_or_else(|_| HeaderValue::from_static(PLACEHOLDER_CONTENT_TYPE));
    headers.insert(header::CONTENT_TYPE, content_type);
    if let Ok(cache_control) = HeaderValue::from_str(&format!("public, max-age={}", ttl.as_secs())) {
        headers.insert(header::CACHE_CONTROL, cache_control);
    }
    headers.insert(
        X_CACHE,
        HeaderValue::from_static(if outcome.cache_hit { "HIT" } else { "MISS" }),
    );
    if outcome.is_placeholder() {
        headers.insert(X_PLACEHOLDER, HeaderValue::from_static("true"));
    }

    debug!(
        url = %outcome.origin_url,
        cache_hit = outcome.cache_hit,
        placeholder = outcome.is_placeholder(),
        "Image served"
    );

    (StatusCode::OK, headers, outcome.body()).into_response()
}
