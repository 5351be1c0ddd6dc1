use cinefetch_domain::config::ImageConfig;
use cinefetch_domain::movie::sha256_hex;
use cinefetch_domain::{CacheValue, FetchError, ImageFetchOutcome, PlaceholderImage};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};
use url::Url;

use crate::ports::{FetchedImage, ImageOrigin, PlaceholderRenderer};
use crate::services::TieredCache;

const UNTITLED: &str = "Untitled";

/// Normalize a poster URL or explain why it cannot be fetched.
///
/// Whitespace anywhere in the string is removed. Values that are already a
/// placeholder (`data:` URIs, URLs mentioning "placeholder") or that address
/// our own proxy path are rejected so the proxy never fetches itself.
pub fn clean_image_url(raw: &str, proxy_path: &str) -> Result<String, FetchError> {
    let cleaned: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    if cleaned.is_empty() {
        return Err(FetchError::MalformedInput("empty image url".to_string()));
    }
    if cleaned.eq_ignore_ascii_case("n/a") {
        return Err(FetchError::MalformedInput("image url is N/A".to_string()));
    }

    let lower = cleaned.to_ascii_lowercase();
    if lower.starts_with("data:") || lower.contains("placeholder") {
        return Err(FetchError::MalformedInput("image url is already a placeholder".to_string()));
    }
    if is_proxy_path(cleaned.split(['?', '#']).next().unwrap_or_default(), proxy_path) {
        return Err(proxy_self_reference());
    }

    let parsed = Url::parse(&cleaned)
        .map_err(|e| FetchError::MalformedInput(format!("unparseable image url: {}", e)))?;
    match parsed.scheme() {
        "http" | "https" if parsed.host_str().is_some() => {}
        scheme => {
            return Err(FetchError::MalformedInput(format!(
                "unsupported image url scheme '{}'",
                scheme
            )))
        }
    }
    if is_proxy_path(parsed.path(), proxy_path) {
        return Err(proxy_self_reference());
    }
    Ok(parsed.to_string())
}

/// Exact match on the path, so `/api/images/x.jpg` on a CDN is not the
/// `/api/image` proxy.
fn is_proxy_path(path: &str, proxy_path: &str) -> bool {
    let proxy = proxy_path.trim_end_matches('/');
    !proxy.is_empty() && path.trim_end_matches('/').eq_ignore_ascii_case(proxy)
}

fn proxy_self_reference() -> FetchError {
    FetchError::MalformedInput("image url points at the proxy itself".to_string())
}

pub fn image_cache_key(cleaned_url: &str) -> String {
    format!("image:{}", sha256_hex(cleaned_url.as_bytes()))
}

pub fn placeholder_cache_key(alt_text: &str) -> String {
    format!("image:placeholder:{}", sha256_hex(alt_text.trim().as_bytes()))
}

/// Image Resolution Service. Always produces an image.
pub struct ResolveImageUseCase {
    cache: Arc<TieredCache>,
    origin: Arc<dyn ImageOrigin>,
    renderer: Arc<dyn PlaceholderRenderer>,
    config: ImageConfig,
    proxy_path: String,
}

impl ResolveImageUseCase {
    pub fn new(
        cache: Arc<TieredCache>,
        origin: Arc<dyn ImageOrigin>,
        renderer: Arc<dyn PlaceholderRenderer>,
        mut config: ImageConfig,
        proxy_path: impl Into<String>,
    ) -> Self {
        if config.header_profiles.is_empty() {
            config.header_profiles = ImageConfig::default().header_profiles;
        }
        Self {
            cache,
            origin,
            renderer,
            config,
            proxy_path: proxy_path.into(),
        }
    }

    pub fn ttl_for(&self, outcome: &ImageFetchOutcome) -> Duration {
        if outcome.is_placeholder() {
            Duration::from_secs(self.config.placeholder_ttl_secs)
        } else {
            Duration::from_secs(self.config.ttl_secs)
        }
    }

    #[instrument(skip(self))]
    pub async fn execute(&self, raw_url: &str, alt_text: &str) -> ImageFetchOutcome {
        let title = match alt_text.trim() {
            "" => UNTITLED,
            t => t,
        };

        let url = match clean_image_url(raw_url, &self.proxy_path) {
            Ok(url) => url,
            Err(e) => {
                debug!(raw_url = %raw_url, error = %e, "Image url rejected, using placeholder");
                return self.placeholder(&placeholder_cache_key(title), raw_url, title).await;
            }
        };

        let key = image_cache_key(&url);
        if let Some(value) = self.cache.get(&key).await {
            if let Some(outcome) = Self::from_cached(&url, value) {
                return self.retitle(outcome, alt_text).with_cache_hit(true);
            }
            self.cache.invalidate(&key).await;
        }

        match self.fetch_with_retry(&url).await {
            Ok(image) => {
                let outcome = ImageFetchOutcome::fetched(&url, image.content_type, image.bytes);
                let value = CacheValue::Bytes {
                    content_type: outcome.content_type.clone(),
                    data: outcome.body(),
                };
                self.cache.set(&key, value, self.ttl_for(&outcome)).await;
                outcome
            }
            Err(e) => {
                warn!(url = %url, error = %e, "Image origin exhausted, rendering placeholder");
                self.render_and_cache(&key, &url, title).await
            }
        }
    }

    async fn fetch_with_retry(&self, url: &str) -> Result<FetchedImage, FetchError> {
        let attempts = self.config.effective_attempts();
        let timeout = Duration::from_millis(self.config.timeout_ms);
        let mut last_error = FetchError::Exhausted;

        for attempt in 0..attempts {
            let profile = &self.config.header_profiles[attempt as usize % self.config.header_profiles.len()];

            let result = match tokio::time::timeout(timeout, self.origin.fetch(url, profile)).await {
                Ok(result) => result,
                Err(_) => Err(FetchError::Timeout),
            };

            let error = match result {
                Ok(image) if !image.is_image() => FetchError::rejected(
                    200,
                    format!("non-image content type '{}'", image.content_type),
                ),
                Ok(image) if image.bytes.is_empty() => FetchError::rejected(200, "empty image body"),
                Ok(image) if image.bytes.len() > self.config.max_bytes => {
                    FetchError::MalformedInput(format!("image exceeds {} bytes", self.config.max_bytes))
                }
                Ok(image) => {
                    if attempt > 0 {
                        info!(url = %url, attempt = attempt + 1, "Image fetched after retry");
                    }
                    return Ok(image);
                }
                Err(e) => e,
            };

            debug!(url = %url, attempt = attempt + 1, error = %error, "Image fetch attempt failed");
            if !error.is_retryable() {
                return Err(error);
            }
            last_error = error;
        }

        Err(last_error)
    }

    fn from_cached(url: &str, value: CacheValue) -> Option<ImageFetchOutcome> {
        match value {
            CacheValue::Bytes { content_type, data } => {
                Some(ImageFetchOutcome::fetched(url, content_type, data))
            }
            object @ CacheValue::Object(_) => object
                .decode::<PlaceholderImage>()
                .ok()
                .map(|p| ImageFetchOutcome::placeholder(url, p)),
        }
    }

    /// A placeholder cached for this URL carries the first caller's title.
    /// Other callers get it re-rendered for their own alt text.
    fn retitle(&self, outcome: ImageFetchOutcome, alt_text: &str) -> ImageFetchOutcome {
        let title = alt_text.trim();
        let stale_title =
            matches!(outcome.placeholder_title(), Some(cached) if !title.is_empty() && cached != title);
        if !stale_title {
            return outcome;
        }
        let placeholder = PlaceholderImage {
            title: title.to_string(),
            svg: self.renderer.render(title),
        };
        ImageFetchOutcome::placeholder(outcome.origin_url, placeholder)
    }

    async fn placeholder(&self, key: &str, origin_url: &str, title: &str) -> ImageFetchOutcome {
        if let Some(cached) = self.cache.get_json::<PlaceholderImage>(key).await {
            return ImageFetchOutcome::placeholder(origin_url, cached).with_cache_hit(true);
        }
        self.render_and_cache(key, origin_url, title).await
    }

    async fn render_and_cache(&self, key: &str, origin_url: &str, title: &str) -> ImageFetchOutcome {
        let placeholder = PlaceholderImage {
            title: title.to_string(),
            svg: self.renderer.render(title),
        };
        let outcome = ImageFetchOutcome::placeholder(origin_url, placeholder);
        if let Some(p) = &outcome.placeholder {
            self.cache.set_json(key, p, self.ttl_for(&outcome)).await;
        }
        outcome
    }
}
