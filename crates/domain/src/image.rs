use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Cached marker for a synthetic image. The rendered SVG is kept alongside the
/// title so a cache hit does not need the renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceholderImage {
    pub title: String,
    pub svg: String,
}

pub const PLACEHOLDER_CONTENT_TYPE: &str = "image/svg+xml";

#[derive(Debug, Clone, PartialEq)]
pub struct ImageFetchOutcome {
    /// `None` only for a synthetic placeholder.
    pub bytes: Option<Bytes>,
    pub content_type: String,
    pub origin_url: String,
    pub cacheable: bool,
    pub placeholder: Option<PlaceholderImage>,
    pub cache_hit: bool,
}

impl ImageFetchOutcome {
    pub fn fetched(origin_url: impl Into<String>, content_type: impl Into<String>, bytes: Bytes) -> Self {
        Self {
            bytes: Some(bytes),
            content_type: content_type.into(),
            origin_url: origin_url.into(),
            cacheable: true,
            placeholder: None,
            cache_hit: false,
        }
    }

    pub fn placeholder(origin_url: impl Into<String>, placeholder: PlaceholderImage) -> Self {
        Self {
            bytes: None,
            content_type: PLACEHOLDER_CONTENT_TYPE.to_string(),
            origin_url: origin_url.into(),
            cacheable: true,
            placeholder: Some(placeholder),
            cache_hit: false,
        }
    }

    pub fn with_cache_hit(mut self, hit: bool) -> Self {
        self.cache_hit = hit;
        self
    }

    pub fn is_placeholder(&self) -> bool {
        self.bytes.is_none()
    }

    pub fn placeholder_title(&self) -> Option<&str> {
        self.placeholder.as_ref().map(|p| p.title.as_str())
    }

    /// Bytes to put on the wire: real image data or the rendered placeholder.
    pub fn body(&self) -> Bytes {
        match (&self.bytes, &self.placeholder) {
            (Some(b), _) => b.clone(),
            (None, Some(p)) => Bytes::from(p.svg.clone()),
            (None, None) => Bytes::new(),
        }
    }
}
