use async_trait::async_trait;
use cinefetch_application::ports::MovieProvider;
use cinefetch_domain::config::ProviderConfig;
use cinefetch_domain::{FetchError, MovieRecord, SearchQuery};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use super::http::{build_client, classify_error, ensure_success};

#[derive(Debug, Deserialize)]
struct SearchEnvelope {
    #[serde(rename = "Response")]
    response: String,
    #[serde(rename = "Search", default)]
    search: Vec<SearchItem>,
    #[serde(rename = "Error", default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    #[serde(rename = "imdbID")]
    imdb_id: String,
    #[serde(rename = "Title")]
    title: String,
    #[serde(rename = "Year", default)]
    year: String,
    #[serde(rename = "Poster", default)]
    poster: String,
}

#[derive(Debug, Deserialize)]
struct DetailEnvelope {
    #[serde(rename = "Response")]
    response: String,
    #[serde(rename = "Error", default)]
    error: Option<String>,
    #[serde(rename = "imdbID", default)]
    imdb_id: String,
    #[serde(rename = "Title", default)]
    title: String,
    #[serde(rename = "Year", default)]
    year: String,
    #[serde(rename = "Poster", default)]
    poster: String,
    #[serde(rename = "Genre", default)]
    genre: String,
    #[serde(rename = "Plot", default)]
    plot: String,
    #[serde(rename = "imdbRating", default)]
    imdb_rating: String,
}

/// Adapter for an OMDb-shaped API: `?s=` search, `?i=` lookup, string-typed
/// fields and `"Response": "False"` errors inside HTTP 200 bodies.
pub struct OmdbProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl OmdbProvider {
    pub fn new(config: &ProviderConfig) -> Self {
        Self {
            client: build_client(Duration::from_millis(config.timeout_ms)),
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
        }
    }

    async fn get<T: for<'de> Deserialize<'de>>(&self, params: &[(&str, String)]) -> Result<T, FetchError> {
        let mut request = self.client.get(&self.base_url).query(params);
        if let Some(key) = &self.api_key {
            request = request.query(&[("apikey", key)]);
        }

        let response = request.send().await.map_err(classify_error)?;
        let response = ensure_success(response).await?;
        response.json::<T>().await.map_err(classify_error)
    }

    /// "Movie not found!" and "Incorrect IMDb ID." mean no data, anything else
    /// in an error body is a rejection.
    fn interpret_error(error: Option<String>) -> Result<(), FetchError> {
        let message = error.unwrap_or_else(|| "unknown error".to_string());
        let lower = message.to_ascii_lowercase();
        if lower.contains("not found") || lower.contains("incorrect imdb id") {
            Ok(())
        } else if lower.contains("api key") {
            Err(FetchError::rejected(401, message))
        } else if lower.contains("limit") {
            Err(FetchError::rejected(429, message))
        } else {
            Err(FetchError::rejected(200, message))
        }
    }

    fn parse_rating(raw: &str) -> Option<f32> {
        raw.trim().parse::<f32>().ok()
    }

    fn split_genres(raw: &str) -> Vec<String> {
        raw.split(',')
            .map(str::trim)
            .filter(|g| !g.is_empty() && !g.eq_ignore_ascii_case("n/a"))
            .map(str::to_string)
            .collect()
    }
}

#[async_trait]
impl MovieProvider for OmdbProvider {
    fn name(&self) -> &str {
        "omdb"
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<MovieRecord>, FetchError> {
        let mut params = vec![
            ("s", query.normalized_text()),
            ("type", "movie".to_string()),
        ];
        if let Some(year) = query.filters.year {
            params.push(("y", year.to_string()));
        }

        let envelope: SearchEnvelope = self.get(&params).await?;
        if !envelope.response.eq_ignore_ascii_case("true") {
            Self::interpret_error(envelope.error)?;
            return Ok(Vec::new());
        }

        let items: Vec<MovieRecord> = envelope
            .search
            .into_iter()
            .filter(|i| !i.imdb_id.is_empty() && !i.title.trim().is_empty())
            .map(|i| {
                let mut record = MovieRecord::new(i.imdb_id, i.title.trim()).with_poster(&i.poster);
                record.year = MovieRecord::parse_year(&i.year);
                record
            })
            .collect();

        debug!(count = items.len(), "OMDb search returned");
        Ok(items)
    }

    async fn details(&self, id: &str) -> Result<Option<MovieRecord>, FetchError> {
        let params = [("i", id.to_string()), ("plot", "short".to_string())];
        let envelope: DetailEnvelope = self.get(&params).await?;

        if !envelope.response.eq_ignore_ascii_case("true") {
            Self::interpret_error(envelope.error)?;
            return Ok(None);
        }

        let plot = if envelope.plot.eq_ignore_ascii_case("n/a") {
            String::new()
        } else {
            envelope.plot
        };

        let mut record = MovieRecord::new(envelope.imdb_id, envelope.title.trim())
            .with_poster(&envelope.poster)
            .with_genres(Self::split_genres(&envelope.genre))
            .with_plot(plot);
        record.year = MovieRecord::parse_year(&envelope.year);
        record.rating = Self::parse_rating(&envelope.imdb_rating);

        Ok(Some(record))
    }
}
