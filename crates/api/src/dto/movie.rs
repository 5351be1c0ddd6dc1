use cinefetch_domain::{MovieRecord, ProviderResult, SearchFilters, SearchQuery, SortDirection, SortKey};
use serde::{Deserialize, Serialize};
use url::form_urlencoded::byte_serialize;

/// Query string of `GET /api/search`. Every field is optional text so a
/// malformed filter is ignored instead of rejecting the request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default)]
    pub year: Option<String>,
    #[serde(default)]
    pub min_rating: Option<String>,
    #[serde(default)]
    pub sort: Option<String>,
    #[serde(default)]
    pub order: Option<String>,
}

impl SearchParams {
    pub fn into_query(self) -> SearchQuery {
        let filters = SearchFilters {
            genre: self
                .genre
                .map(|g| g.trim().to_string())
                .filter(|g| !g.is_empty()),
            year: self.year.and_then(|y| y.trim().parse::<u16>().ok()),
            min_rating: self
                .min_rating
                .and_then(|r| r.trim().parse::<f32>().ok())
                .filter(|r| r.is_finite()),
            sort: self.sort.as_deref().and_then(SortKey::parse),
            direction: self
                .order
                .as_deref()
                .map(SortDirection::parse)
                .unwrap_or_default(),
        };
        SearchQuery::new(self.q.unwrap_or_default()).with_filters(filters)
    }
}

/// Builds `<proxy>?url=<encoded>&alt=<encoded>`.
pub fn proxied_image_url(proxy_path: &str, raw_url: &str, alt: &str) -> String {
    let url: String = byte_serialize(raw_url.as_bytes()).collect();
    let alt: String = byte_serialize(alt.as_bytes()).collect();
    format!("{}?url={}&alt={}", proxy_path, url, alt)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovieResponse {
    pub id: String,
    pub title: String,
    pub year: Option<u16>,
    /// Always points at the image proxy; records without art resolve to a
    /// placeholder there.
    pub poster_url: String,
    pub has_poster: bool,
    pub rating: Option<f32>,
    pub genres: Vec<String>,
    pub plot: String,
}

impl MovieResponse {
    pub fn from_record(record: MovieRecord, proxy_path: &str) -> Self {
        Self {
            poster_url: proxied_image_url(proxy_path, &record.poster_url, &record.title),
            has_poster: record.has_poster(),
            id: record.id,
            title: record.title,
            year: record.year,
            rating: record.rating,
            genres: record.genres,
            plot: record.plot,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoviesEnvelope {
    pub source: String,
    pub partial: bool,
    pub no_results: bool,
    pub items: Vec<MovieResponse>,
}

impl MoviesEnvelope {
    pub fn from_result(result: ProviderResult, proxy_path: &str) -> Self {
        Self {
            source: result.source.to_string(),
            partial: result.partial,
            no_results: result.items.is_empty(),
            items: result
                .items
                .into_iter()
                .map(|r| MovieResponse::from_record(r, proxy_path))
                .collect(),
        }
    }
}
