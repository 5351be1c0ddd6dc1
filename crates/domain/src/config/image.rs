use serde::{Deserialize, Serialize};

/// Request headers sent to an image origin on one attempt
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct HeaderProfile {
    pub user_agent: String,

    #[serde(default = "default_accept")]
    pub accept: String,

    #[serde(default)]
    pub referer: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ImageConfig {
    /// Per-attempt fetch timeout in milliseconds (default: 10000)
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Total fetch attempts, clamped to 1..=3 (default: 2)
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Fetched image TTL in seconds (default: 86400)
    #[serde(default = "default_ttl")]
    pub ttl_secs: u64,

    /// Placeholder TTL in seconds (default: 86400)
    #[serde(default = "default_ttl")]
    pub placeholder_ttl_secs: u64,

    /// Largest accepted image body in bytes (default: 5 MiB)
    #[serde(default = "default_max_bytes")]
    pub max_bytes: usize,

    #[serde(default = "default_header_profiles")]
    pub header_profiles: Vec<HeaderProfile>,
}

impl ImageConfig {
    pub fn effective_attempts(&self) -> u32 {
        self.max_attempts.clamp(1, 3)
    }
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
            max_attempts: default_max_attempts(),
            ttl_secs: default_ttl(),
            placeholder_ttl_secs: default_ttl(),
            max_bytes: default_max_bytes(),
            header_profiles: default_header_profiles(),
        }
    }
}

fn default_accept() -> String {
    "image/avif,image/webp,image/apng,image/*,*/*;q=0.8".to_string()
}

fn default_timeout_ms() -> u64 {
    10_000
}

fn default_max_attempts() -> u32 {
    2
}

fn default_ttl() -> u64 {
    86_400
}

fn default_max_bytes() -> usize {
    5 * 1024 * 1024
}

fn default_header_profiles() -> Vec<HeaderProfile> {
    vec![
        HeaderProfile {
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36".to_string(),
            accept: default_accept(),
            referer: None,
        },
        HeaderProfile {
            user_agent: "Mozilla/5.0 (Macintosh; Intel Mac OS X 14_0) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.0 Safari/605.1.15".to_string(),
            accept: "image/*".to_string(),
            referer: None,
        },
    ]
}
