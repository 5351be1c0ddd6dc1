use serde::{Deserialize, Serialize};
use std::path::Path;

use super::{
    CacheConfig, ClientConfig, ConfigError, DatabaseConfig, ImageConfig, LoggingConfig,
    ProvidersConfig, ServerConfig,
};

pub const DEFAULT_CONFIG_FILE: &str = "cinefetch.toml";
pub const PRIMARY_API_KEY_ENV: &str = "CINEFETCH_PRIMARY_API_KEY";
pub const SECONDARY_API_KEY_ENV: &str = "CINEFETCH_SECONDARY_API_KEY";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub providers: ProvidersConfig,

    #[serde(default)]
    pub cache: CacheConfig,

    #[serde(default)]
    pub image: ImageConfig,

    #[serde(default)]
    pub client: ClientConfig,

    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Values supplied on the command line; they win over the file.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub web_port: Option<u16>,
    pub bind_address: Option<String>,
    pub database_path: Option<String>,
    pub log_level: Option<String>,
    pub memory_only: bool,
}

impl Config {
    /// Load configuration from `path` (or `cinefetch.toml` when present),
    /// then apply environment secrets and CLI overrides.
    pub fn load(path: Option<&str>, overrides: CliOverrides) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => Self::from_file(DEFAULT_CONFIG_FILE)?,
            None => Self::default(),
        };

        config.apply_env(|name| std::env::var(name).ok());
        config.apply_overrides(overrides);
        Ok(config)
    }

    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_string(),
            message: e.to_string(),
        })?;
        Self::from_toml_str(&raw).map_err(|e| match e {
            ConfigError::Parse { message, .. } => ConfigError::Parse {
                path: path.to_string(),
                message,
            },
            other => other,
        })
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        toml::from_str(raw).map_err(|e| ConfigError::Parse {
            path: "<inline>".to_string(),
            message: e.to_string(),
        })
    }

    /// Provider secrets from the environment replace file values when set.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup(PRIMARY_API_KEY_ENV).filter(|k| !k.trim().is_empty()) {
            self.providers.primary.api_key = Some(key);
        }
        if let Some(key) = lookup(SECONDARY_API_KEY_ENV).filter(|k| !k.trim().is_empty()) {
            self.providers.secondary.api_key = Some(key);
        }
    }

    pub fn apply_overrides(&mut self, overrides: CliOverrides) {
        if let Some(port) = overrides.web_port {
            self.server.web_port = port;
        }
        if let Some(bind) = overrides.bind_address {
            self.server.bind_address = bind;
        }
        if let Some(db) = overrides.database_path {
            self.database.path = db;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
        if overrides.memory_only {
            self.cache.persistent = false;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, provider) in [
            ("primary", &self.providers.primary),
            ("secondary", &self.providers.secondary),
        ] {
            if provider.timeout_ms == 0 {
                return Err(ConfigError::Validation(format!(
                    "providers.{}.timeout_ms must be greater than zero",
                    name
                )));
            }
            if provider.max_concurrency == 0 {
                return Err(ConfigError::Validation(format!(
                    "providers.{}.max_concurrency must be greater than zero",
                    name
                )));
            }
            if provider.enabled && provider.base_url.trim().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "providers.{}.base_url must not be empty",
                    name
                )));
            }
        }

        let backoff = &self.providers.backoff;
        if backoff.failure_threshold == 0 {
            return Err(ConfigError::Validation(
                "providers.backoff.failure_threshold must be greater than zero".to_string(),
            ));
        }
        if backoff.max_backoff_ms < backoff.base_backoff_ms {
            return Err(ConfigError::Validation(
                "providers.backoff.max_backoff_ms must be >= base_backoff_ms".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&backoff.jitter_ratio) {
            return Err(ConfigError::Validation(
                "providers.backoff.jitter_ratio must be within 0.0..=1.0".to_string(),
            ));
        }

        let ttls = [
            ("cache.search_ttl_secs", self.cache.search_ttl_secs),
            ("cache.details_ttl_secs", self.cache.details_ttl_secs),
            ("cache.stale_retention_secs", self.cache.stale_retention_secs),
            ("cache.sweep_interval_secs", self.cache.sweep_interval_secs),
            ("image.ttl_secs", self.image.ttl_secs),
            ("image.placeholder_ttl_secs", self.image.placeholder_ttl_secs),
            ("client.search_ttl_secs", self.client.search_ttl_secs),
            ("client.details_ttl_secs", self.client.details_ttl_secs),
            ("client.list_ttl_secs", self.client.list_ttl_secs),
        ];
        for (name, value) in ttls {
            if value == 0 {
                return Err(ConfigError::Validation(format!(
                    "{} must be greater than zero",
                    name
                )));
            }
        }

        if self.cache.memory_max_entries == 0 {
            return Err(ConfigError::Validation(
                "cache.memory_max_entries must be greater than zero".to_string(),
            ));
        }

        if self.image.timeout_ms == 0 {
            return Err(ConfigError::Validation(
                "image.timeout_ms must be greater than zero".to_string(),
            ));
        }
        if self.image.header_profiles.is_empty() {
            return Err(ConfigError::Validation(
                "image.header_profiles must contain at least one profile".to_string(),
            ));
        }

        let ceilings = [
            ("client.image_concurrency", self.client.image_concurrency),
            ("client.api_concurrency", self.client.api_concurrency),
            ("client.priority_concurrency", self.client.priority_concurrency),
            ("client.cache_max_entries", self.client.cache_max_entries),
        ];
        for (name, value) in ceilings {
            if value == 0 {
                return Err(ConfigError::Validation(format!(
                    "{} must be greater than zero",
                    name
                )));
            }
        }

        if self.database.max_connections == 0 {
            return Err(ConfigError::Validation(
                "database.max_connections must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}
