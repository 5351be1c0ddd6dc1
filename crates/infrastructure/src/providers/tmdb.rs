use async_trait::async_trait;
use cinefetch_application::ports::MovieProvider;
use cinefetch_domain::config::ProviderConfig;
use cinefetch_domain::{FetchError, MovieRecord, SearchQuery};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use super::http::{build_client, classify_error, ensure_success, is_not_found};

#[derive(Debug, Deserialize)]
struct SearchPage {
    #[serde(default)]
    results: Vec<MovieSummary>,
}

#[derive(Debug, Deserialize)]
struct MovieSummary {
    id: u64,
    #[serde(default)]
    title: String,
    #[serde(default)]
    release_date: Option<String>,
    #[serde(default)]
    poster_path: Option<String>,
    #[serde(default)]
    vote_average: Option<f32>,
    #[serde(default)]
    overview: Option<String>,
    #[serde(default)]
    genre_ids: Vec<u32>,
}

#[derive(Debug, Deserialize)]
struct MovieDetail {
    id: u64,
    #[serde(default)]
    title: String,
    #[serde(default)]
    release_date: Option<String>,
    #[serde(default)]
    poster_path: Option<String>,
    #[serde(default)]
    vote_average: Option<f32>,
    #[serde(default)]
    overview: Option<String>,
    #[serde(default)]
    genres: Vec<Genre>,
}

#[derive(Debug, Deserialize)]
struct Genre {
    name: String,
}

fn genre_name(id: u32) -> Option<&'static str> {
    Some(match id {
        28 => "Action",
        12 => "Adventure",
        16 => "Animation",
        35 => "Comedy",
        80 => "Crime",
        99 => "Documentary",
        18 => "Drama",
        10751 => "Family",
        14 => "Fantasy",
        36 => "History",
        27 => "Horror",
        10402 => "Music",
        9648 => "Mystery",
        10749 => "Romance",
        878 => "Science Fiction",
        10770 => "TV Movie",
        53 => "Thriller",
        10752 => "War",
        37 => "Western",
        _ => return None,
    })
}

/// Adapter for a TMDB-shaped API: numeric ids, relative poster paths and
/// numeric ratings.
pub struct TmdbProvider {
    client: reqwest::Client,
    base_url: String,
    image_base_url: Option<String>,
    api_key: Option<String>,
}

impl TmdbProvider {
    pub fn new(config: &ProviderConfig) -> Self {
        Self {
            client: build_client(Duration::from_millis(config.timeout_ms)),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            image_base_url: config
                .image_base_url
                .as_ref()
                .map(|u| u.trim_end_matches('/').to_string()),
            api_key: config.api_key.clone(),
        }
    }

    fn request(&self, path: &str) -> reqwest::RequestBuilder {
        let mut request = self.client.get(format!("{}{}", self.base_url, path));
        if let Some(key) = &self.api_key {
            request = request.query(&[("api_key", key)]);
        }
        request
    }

    fn poster_url(&self, path: Option<&str>) -> String {
        match (path.map(str::trim), &self.image_base_url) {
            (Some(p), _) if p.starts_with("http") => MovieRecord::sanitize_poster(p),
            (Some(p), Some(base)) if !p.is_empty() => {
                let joined = if p.starts_with('/') {
                    format!("{}{}", base, p)
                } else {
                    format!("{}/{}", base, p)
                };
                MovieRecord::sanitize_poster(&joined)
            }
            _ => String::new(),
        }
    }

    fn build_record(
        &self,
        id: u64,
        title: &str,
        release_date: Option<&str>,
        poster_path: Option<&str>,
        vote_average: Option<f32>,
        overview: Option<String>,
        genres: Vec<String>,
    ) -> MovieRecord {
        let mut record = MovieRecord::new(id.to_string(), title.trim())
            .with_genres(genres)
            .with_plot(overview.unwrap_or_default());
        record.poster_url = self.poster_url(poster_path);
        record.year = release_date.and_then(MovieRecord::parse_year);
        record.rating = vote_average.filter(|r| *r > 0.0);
        record
    }
}

#[async_trait]
impl MovieProvider for TmdbProvider {
    fn name(&self) -> &str {
        "tmdb"
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<MovieRecord>, FetchError> {
        let mut request = self
            .request("/search/movie")
            .query(&[("query", query.normalized_text())]);
        if let Some(year) = query.filters.year {
            request = request.query(&[("year", year.to_string())]);
        }

        let response = request.send().await.map_err(classify_error)?;
        let page: SearchPage = ensure_success(response)
            .await?
            .json()
            .await
            .map_err(classify_error)?;

        let items: Vec<MovieRecord> = page
            .results
            .into_iter()
            .filter(|m| !m.title.trim().is_empty())
            .map(|m| {
                let genres = m
                    .genre_ids
                    .iter()
                    .filter_map(|id| genre_name(*id))
                    .map(str::to_string)
                    .collect();
                self.build_record(
                    m.id,
                    &m.title,
                    m.release_date.as_deref(),
                    m.poster_path.as_deref(),
                    m.vote_average,
                    m.overview,
                    genres,
                )
            })
            .collect();

        debug!(count = items.len(), "TMDB search returned");
        Ok(items)
    }

    async fn details(&self, id: &str) -> Result<Option<MovieRecord>, FetchError> {
        if id.is_empty() || !id.chars().all(|c| c.is_ascii_digit()) {
            return Ok(None);
        }

        let response = self
            .request(&format!("/movie/{}", id))
            .send()
            .await
            .map_err(classify_error)?;
        if is_not_found(response.status()) {
            return Ok(None);
        }

        let detail: MovieDetail = ensure_success(response)
            .await?
            .json()
            .await
            .map_err(classify_error)?;

        let genres = detail.genres.into_iter().map(|g| g.name).collect();
        Ok(Some(self.build_record(
            detail.id,
            &detail.title,
            detail.release_date.as_deref(),
            detail.poster_path.as_deref(),
            detail.vote_average,
            detail.overview,
            genres,
        )))
    }
}
