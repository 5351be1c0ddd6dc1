use async_trait::async_trait;
use bytes::Bytes;
use cinefetch_domain::config::HeaderProfile;
use cinefetch_domain::FetchError;

#[derive(Debug, Clone)]
pub struct FetchedImage {
    pub content_type: String,
    pub bytes: Bytes,
}

impl FetchedImage {
    pub fn is_image(&self) -> bool {
        self.content_type
            .trim()
            .to_ascii_lowercase()
            .starts_with("image/")
    }
}

/// Remote host serving poster bytes.
#[async_trait]
pub trait ImageOrigin: Send + Sync {
    async fn fetch(&self, url: &str, profile: &HeaderProfile) -> Result<FetchedImage, FetchError>;
}
