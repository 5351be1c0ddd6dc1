use bytes::Bytes;
use cinefetch_domain::config::ClientConfig;
use cinefetch_domain::{MovieRecord, SearchQuery};
use reqwest::header::CONTENT_TYPE;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tracing::{debug, instrument};

use crate::cache::{ClientCache, TtlClass};
use crate::debouncer::{Debounced, Debouncer};
use crate::errors::CoordinatorError;
use crate::queue::RequestQueue;

const API_PRIORITY: i32 = 0;
const INTERACTIVE_PRIORITY: i32 = 10;

/// Response envelope of the search and details endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoviesPage {
    pub source: String,
    #[serde(default)]
    pub partial: bool,
    #[serde(default)]
    pub no_results: bool,
    #[serde(default)]
    pub items: Vec<MovieRecord>,
}

impl MoviesPage {
    /// Exhausted and stale pages are not worth remembering client-side.
    fn is_cacheable(&self) -> bool {
        self.source != "none" && !self.partial
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImageBody {
    pub content_type: String,
    pub bytes: Bytes,
    pub placeholder: bool,
    pub cache_hit: bool,
}

/// Typed client for the HTTP API.
///
/// Search and list calls go through the API lane, details through the
/// interactive priority lane and posters through the image lane. Each lane
/// deduplicates by request id and enforces its own concurrency ceiling.
pub struct MovieClient {
    http: reqwest::Client,
    base_url: Arc<str>,
    api: RequestQueue<MoviesPage>,
    interactive: RequestQueue<MoviesPage>,
    images: RequestQueue<ImageBody>,
    cache: ClientCache<MoviesPage>,
    debouncer: Debouncer,
    /// Request id of the latest search-as-you-type call.
    pending_search: Mutex<Option<String>>,
}

impl MovieClient {
    pub fn new(config: &ClientConfig) -> Result<Self, CoordinatorError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()?;

        Ok(Self {
            http,
            base_url: Arc::from(config.base_url.trim_end_matches('/')),
            api: RequestQueue::new("api", config.api_concurrency),
            interactive: RequestQueue::new("interactive", config.priority_concurrency),
            images: RequestQueue::new("images", config.image_concurrency),
            cache: ClientCache::from_config(config),
            debouncer: Debouncer::new(Duration::from_millis(config.debounce_ms)),
            pending_search: Mutex::new(None),
        })
    }

    pub fn cache(&self) -> &ClientCache<MoviesPage> {
        &self.cache
    }

    #[instrument(skip(self), fields(query = %query.text))]
    pub async fn search(&self, query: &SearchQuery) -> Result<MoviesPage, CoordinatorError> {
        let key = query.cache_key();
        self.fetch_page(&self.api, key, API_PRIORITY, search_params(query), "/api/search", TtlClass::Search)
            .await
    }

    /// Debounced variant for keystroke-driven input: only the last call in a
    /// burst reaches the network.
    pub async fn search_as_you_type(
        &self,
        query: SearchQuery,
    ) -> Debounced<Result<MoviesPage, CoordinatorError>> {
        let id = Self::search_id(&query);
        *self.pending_search() = Some(id.clone());

        let outcome = self
            .debouncer
            .debounce(query, |q| async move { self.search(&q).await })
            .await;

        let mut pending = self.pending_search();
        if pending.as_deref() == Some(id.as_str()) {
            *pending = None;
        }
        outcome
    }

    /// Supersedes a pending search-as-you-type call, if any.
    pub fn cancel_search_as_you_type(&self) {
        self.pending_search().take();
        self.debouncer.cancel();
    }

    /// A named shelf (e.g. "popular") backed by a fixed search, cached with
    /// the list TTL.
    #[instrument(skip(self, query))]
    pub async fn list(&self, name: &str, query: &SearchQuery) -> Result<MoviesPage, CoordinatorError> {
        let key = format!("list:{}:{}", name, query.cache_key());
        self.fetch_page(&self.api, key, API_PRIORITY, search_params(query), "/api/search", TtlClass::Lists)
            .await
    }

    #[instrument(skip(self))]
    pub async fn details(&self, id: &str) -> Result<MoviesPage, CoordinatorError> {
        let key = format!("details:{}", id);
        let url = self.details_url(id)?;
        self.fetch_page(&self.interactive, key, INTERACTIVE_PRIORITY, Vec::new(), &url, TtlClass::Details)
            .await
    }

    /// Fetches a poster. `proxied_url` is the `poster_url` of a record, a
    /// path relative to the API base.
    #[instrument(skip(self))]
    pub async fn image(&self, proxied_url: &str) -> Result<ImageBody, CoordinatorError> {
        let url = self.absolute(proxied_url);
        let http = self.http.clone();
        let id = format!("image:{}", proxied_url);

        self.images
            .enqueue(id, API_PRIORITY, move || async move {
                let response = http.get(&url).send().await?;
                let status = response.status();
                if !status.is_success() {
                    return Err(CoordinatorError::Status(status.as_u16()));
                }
                let headers = response.headers();
                let content_type = headers
                    .get(CONTENT_TYPE)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default()
                    .to_string();
                let placeholder = headers.get("x-placeholder").is_some_and(|v| v == "true");
                let cache_hit = headers.get("x-cache").is_some_and(|v| v == "HIT");
                let bytes = response.bytes().await?;
                Ok(ImageBody {
                    content_type,
                    bytes,
                    placeholder,
                    cache_hit,
                })
            })
            .await
    }

    /// Cancels a request in any lane by the id it was enqueued under. When
    /// `id` is the pending search-as-you-type call, that call is superseded
    /// too. Returns whether a queued or in-flight request was found.
    pub fn cancel(&self, id: &str) -> bool {
        let debounced = self.pending_search().as_deref() == Some(id);
        if debounced {
            self.cancel_search_as_you_type();
        }
        let api = self.api.cancel(id);
        let interactive = self.interactive.cancel(id);
        let images = self.images.cancel(id);
        debounced || api || interactive || images
    }

    /// Request id of a search, usable with [`MovieClient::cancel`].
    pub fn search_id(query: &SearchQuery) -> String {
        query.cache_key()
    }

    fn pending_search(&self) -> MutexGuard<'_, Option<String>> {
        self.pending_search
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    async fn fetch_page(
        &self,
        lane: &RequestQueue<MoviesPage>,
        key: String,
        priority: i32,
        params: Vec<(&'static str, String)>,
        path: &str,
        class: TtlClass,
    ) -> Result<MoviesPage, CoordinatorError> {
        if let Some(page) = self.cache.get(&key) {
            debug!(key = %key, "Client cache HIT");
            return Ok(page);
        }

        let url = self.absolute(path);
        let http = self.http.clone();
        let page = lane
            .enqueue(key.clone(), priority, move || async move {
                let response = http.get(&url).query(&params).send().await?;
                let status = response.status();
                if !status.is_success() {
                    return Err(CoordinatorError::Status(status.as_u16()));
                }
                Ok(response.json::<MoviesPage>().await?)
            })
            .await?;

        if page.is_cacheable() {
            self.cache.insert(key, page.clone(), class);
        }
        Ok(page)
    }

    fn details_url(&self, id: &str) -> Result<String, CoordinatorError> {
        let mut url = reqwest::Url::parse(&self.absolute("/api/movies"))
            .map_err(|e| CoordinatorError::Transport(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| CoordinatorError::Transport("base url cannot carry a path".to_string()))?
            .push(id);
        Ok(url.into())
    }

    fn absolute(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }
}

fn search_params(query: &SearchQuery) -> Vec<(&'static str, String)> {
    let filters = &query.filters;
    let mut params = vec![("q", query.normalized_text())];
    if let Some(genre) = &filters.genre {
        params.push(("genre", genre.clone()));
    }
    if let Some(year) = filters.year {
        params.push(("year", year.to_string()));
    }
    if let Some(rating) = filters.min_rating {
        params.push(("min_rating", rating.to_string()));
    }
    if let Some(sort) = filters.sort {
        params.push(("sort", sort.as_str().to_string()));
        params.push(("order", filters.direction.as_str().to_string()));
    }
    params
}
