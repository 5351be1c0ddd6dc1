use serde::{Deserialize, Serialize};

/// Tuning for the client request coordinator
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClientConfig {
    /// API base URL the client talks to (default: "http://127.0.0.1:8080")
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Debounce quiet period in milliseconds (default: 500)
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    #[serde(default = "default_image_concurrency")]
    pub image_concurrency: usize,

    #[serde(default = "default_api_concurrency")]
    pub api_concurrency: usize,

    #[serde(default = "default_priority_concurrency")]
    pub priority_concurrency: usize,

    #[serde(default = "default_cache_max_entries")]
    pub cache_max_entries: usize,

    #[serde(default = "default_search_ttl")]
    pub search_ttl_secs: u64,

    #[serde(default = "default_details_ttl")]
    pub details_ttl_secs: u64,

    /// Trending/popular list TTL in seconds (default: 1800)
    #[serde(default = "default_list_ttl")]
    pub list_ttl_secs: u64,

    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            debounce_ms: default_debounce_ms(),
            image_concurrency: default_image_concurrency(),
            api_concurrency: default_api_concurrency(),
            priority_concurrency: default_priority_concurrency(),
            cache_max_entries: default_cache_max_entries(),
            search_ttl_secs: default_search_ttl(),
            details_ttl_secs: default_details_ttl(),
            list_ttl_secs: default_list_ttl(),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

fn default_base_url() -> String {
    "http://127.0.0.1:8080".to_string()
}

fn default_debounce_ms() -> u64 {
    500
}

fn default_image_concurrency() -> usize {
    6
}

fn default_api_concurrency() -> usize {
    4
}

fn default_priority_concurrency() -> usize {
    2
}

fn default_cache_max_entries() -> usize {
    500
}

fn default_search_ttl() -> u64 {
    7200
}

fn default_details_ttl() -> u64 {
    3600
}

fn default_list_ttl() -> u64 {
    1800
}

fn default_request_timeout_ms() -> u64 {
    15_000
}
