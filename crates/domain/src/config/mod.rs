//! Configuration module for CineFetch
//!
//! - `root`: Main configuration, loading and CLI overrides
//! - `server`: HTTP binding
//! - `providers`: Upstream metadata providers and backoff
//! - `cache`: Tiered cache TTLs and limits
//! - `image`: Image proxy fetch policy
//! - `client`: Client request coordinator tuning
//! - `logging`: Logging settings
//! - `database`: Persistent cache tier database
//! - `errors`: Configuration errors

pub mod cache;
pub mod client;
pub mod database;
pub mod errors;
pub mod image;
pub mod logging;
pub mod providers;
pub mod root;
pub mod server;

pub use cache::{CacheConfig, StalePolicy};
pub use client::ClientConfig;
pub use database::DatabaseConfig;
pub use errors::ConfigError;
pub use image::{HeaderProfile, ImageConfig};
pub use logging::LoggingConfig;
pub use providers::{BackoffConfig, ProviderConfig, ProvidersConfig};
pub use root::{CliOverrides, Config};
pub use server::ServerConfig;
