//! CineFetch Domain Layer
pub mod cache_entry;
pub mod config;
pub mod errors;
pub mod image;
pub mod movie;
pub mod provider_result;

pub use cache_entry::{CacheEntry, CacheValue};
pub use config::{CliOverrides, Config, ConfigError, StalePolicy};
pub use errors::{DomainError, FetchError};
pub use image::{ImageFetchOutcome, PlaceholderImage};
pub use movie::{MovieRecord, SearchFilters, SearchQuery, SortDirection, SortKey};
pub use provider_result::{ProviderResult, ResultSource};
