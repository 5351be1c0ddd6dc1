use async_trait::async_trait;
use cinefetch_application::ports::{FetchedImage, ImageOrigin};
use cinefetch_domain::config::{HeaderProfile, ImageConfig};
use cinefetch_domain::FetchError;
use reqwest::header::{ACCEPT, CONTENT_TYPE, REFERER, USER_AGENT};
use std::time::Duration;
use tracing::debug;

use crate::providers::http::{build_client, classify_error, ensure_success};

/// Fetches poster bytes over HTTP with the headers of one profile.
pub struct HttpImageOrigin {
    client: reqwest::Client,
    max_bytes: usize,
}

impl HttpImageOrigin {
    pub fn new(config: &ImageConfig) -> Self {
        Self {
            client: build_client(Duration::from_millis(config.timeout_ms)),
            max_bytes: config.max_bytes,
        }
    }
}

#[async_trait]
impl ImageOrigin for HttpImageOrigin {
    async fn fetch(&self, url: &str, profile: &HeaderProfile) -> Result<FetchedImage, FetchError> {
        let mut request = self
            .client
            .get(url)
            .header(USER_AGENT, &profile.user_agent)
            .header(ACCEPT, &profile.accept);
        if let Some(referer) = &profile.referer {
            request = request.header(REFERER, referer);
        }

        let response = request.send().await.map_err(classify_error)?;
        let response = ensure_success(response).await?;

        if let Some(len) = response.content_length() {
            if len as usize > self.max_bytes {
                return Err(FetchError::MalformedInput(format!(
                    "image of {} bytes exceeds limit",
                    len
                )));
            }
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.split(';').next().unwrap_or(v).trim().to_string())
            .unwrap_or_default();

        let bytes = response.bytes().await.map_err(classify_error)?;
        if bytes.len() > self.max_bytes {
            return Err(FetchError::MalformedInput(format!(
                "image of {} bytes exceeds limit",
                bytes.len()
            )));
        }

        debug!(url = %url, content_type = %content_type, len = bytes.len(), "Image origin responded");
        Ok(FetchedImage {
            content_type,
            bytes,
        })
    }
}
