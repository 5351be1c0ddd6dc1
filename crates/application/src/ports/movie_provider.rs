use async_trait::async_trait;
use cinefetch_domain::{FetchError, MovieRecord, SearchQuery};

/// Normalized wrapper around one external metadata source.
///
/// Implementations must return records whose `poster_url` went through
/// `MovieRecord::sanitize_poster`.
#[async_trait]
pub trait MovieProvider: Send + Sync {
    fn name(&self) -> &str;

    async fn search(&self, query: &SearchQuery) -> Result<Vec<MovieRecord>, FetchError>;

    async fn details(&self, id: &str) -> Result<Option<MovieRecord>, FetchError>;
}
