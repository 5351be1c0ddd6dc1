use serde::{Deserialize, Serialize};

/// Connection settings for one upstream metadata source
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProviderConfig {
    /// Disabled providers are skipped by the aggregator entirely
    #[serde(default = "default_true")]
    pub enabled: bool,

    pub base_url: String,

    /// Base URL prepended to relative poster paths
    #[serde(default)]
    pub image_base_url: Option<String>,

    /// Usually supplied through the environment rather than the file
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_primary_timeout_ms")]
    pub timeout_ms: u64,

    /// Max concurrent calls to this provider across all requests
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,
}

impl ProviderConfig {
    pub fn primary_default() -> Self {
        Self {
            enabled: true,
            base_url: "https://www.omdbapi.com/".to_string(),
            image_base_url: None,
            api_key: None,
            timeout_ms: default_primary_timeout_ms(),
            max_concurrency: default_max_concurrency(),
        }
    }

    pub fn secondary_default() -> Self {
        Self {
            enabled: true,
            base_url: "https://api.themoviedb.org/3".to_string(),
            image_base_url: Some("https://image.tmdb.org/t/p/w500".to_string()),
            api_key: None,
            timeout_ms: default_secondary_timeout_ms(),
            max_concurrency: default_max_concurrency(),
        }
    }
}

/// Cross-request backoff for a failing provider
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BackoffConfig {
    /// Consecutive failures before the provider is skipped (default: 3)
    #[serde(default = "default_failure_threshold")]
    pub failure_threshold: u32,

    /// First skip window in milliseconds (default: 1000)
    #[serde(default = "default_base_backoff_ms")]
    pub base_backoff_ms: u64,

    /// Upper bound for the skip window in milliseconds (default: 60000)
    #[serde(default = "default_max_backoff_ms")]
    pub max_backoff_ms: u64,

    /// Jitter as a fraction of the window, 0.0..=1.0 (default: 0.2)
    #[serde(default = "default_jitter_ratio")]
    pub jitter_ratio: f64,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            failure_threshold: default_failure_threshold(),
            base_backoff_ms: default_base_backoff_ms(),
            max_backoff_ms: default_max_backoff_ms(),
            jitter_ratio: default_jitter_ratio(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProvidersConfig {
    #[serde(default = "ProviderConfig::primary_default")]
    pub primary: ProviderConfig,

    #[serde(default = "ProviderConfig::secondary_default")]
    pub secondary: ProviderConfig,

    #[serde(default)]
    pub backoff: BackoffConfig,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            primary: ProviderConfig::primary_default(),
            secondary: ProviderConfig::secondary_default(),
            backoff: BackoffConfig::default(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_primary_timeout_ms() -> u64 {
    5000
}

fn default_secondary_timeout_ms() -> u64 {
    8000
}

fn default_max_concurrency() -> usize {
    8
}

fn default_failure_threshold() -> u32 {
    3
}

fn default_base_backoff_ms() -> u64 {
    1000
}

fn default_max_backoff_ms() -> u64 {
    60_000
}

fn default_jitter_ratio() -> f64 {
    0.2
}
