#![allow(dead_code)]

use cinefetch_domain::config::{DatabaseConfig, ProviderConfig};
use cinefetch_domain::{CacheEntry, CacheValue};
use cinefetch_infrastructure::database::create_pool;
use sqlx::SqlitePool;

pub async fn memory_pool() -> SqlitePool {
    let cfg = DatabaseConfig {
        path: ":memory:".to_string(),
        ..Default::default()
    };
    create_pool(&cfg).await.expect("in-memory pool")
}

pub fn provider_config(base_url: &str, api_key: Option<&str>) -> ProviderConfig {
    ProviderConfig {
        enabled: true,
        base_url: base_url.to_string(),
        image_base_url: Some(format!("{}/img", base_url)),
        api_key: api_key.map(str::to_string),
        timeout_ms: 2_000,
        max_concurrency: 4,
    }
}

pub fn object_entry(key: &str, json: serde_json::Value, now_ms: u64, ttl_ms: u64) -> CacheEntry {
    CacheEntry::new(key, CacheValue::Object(json), now_ms, ttl_ms)
}

pub fn bytes_entry(key: &str, content_type: &str, data: &'static [u8], now_ms: u64, ttl_ms: u64) -> CacheEntry {
    CacheEntry::new(
        key,
        CacheValue::Bytes {
            content_type: content_type.to_string(),
            data: bytes::Bytes::from_static(data),
        },
        now_ms,
        ttl_ms,
    )
}
