use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// Payload held by a cache entry: structured JSON or raw bytes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CacheValue {
    Object(serde_json::Value),
    Bytes { content_type: String, data: Bytes },
}

impl CacheValue {
    pub fn from_serialize<T: Serialize>(value: &T) -> Result<Self, DomainError> {
        serde_json::to_value(value)
            .map(CacheValue::Object)
            .map_err(|e| DomainError::SerializationError(e.to_string()))
    }

    pub fn decode<T: serde::de::DeserializeOwned>(&self) -> Result<T, DomainError> {
        match self {
            CacheValue::Object(v) => serde_json::from_value(v.clone())
                .map_err(|e| DomainError::SerializationError(e.to_string())),
            CacheValue::Bytes { .. } => Err(DomainError::InvalidCacheEntry(
                "expected object payload, found bytes".to_string(),
            )),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            CacheValue::Object(_) => "object",
            CacheValue::Bytes { .. } => "bytes",
        }
    }

    /// Approximate in-memory footprint, used by stats only.
    pub fn approx_size(&self) -> usize {
        match self {
            CacheValue::Object(v) => v.to_string().len(),
            CacheValue::Bytes { data, .. } => data.len(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub key: String,
    pub value: CacheValue,
    pub stored_at_ms: u64,
    pub expires_at_ms: u64,
}

impl CacheEntry {
    /// TTL is clamped to at least 1 ms so `expires_at_ms > stored_at_ms` holds.
    pub fn new(key: impl Into<String>, value: CacheValue, now_ms: u64, ttl_ms: u64) -> Self {
        let ttl_ms = ttl_ms.max(1);
        Self {
            key: key.into(),
            value,
            stored_at_ms: now_ms,
            expires_at_ms: now_ms.saturating_add(ttl_ms),
        }
    }

    #[inline]
    pub fn is_expired(&self, now_ms: u64) -> bool {
        now_ms > self.expires_at_ms
    }

    pub fn remaining_ttl_ms(&self, now_ms: u64) -> u64 {
        self.expires_at_ms.saturating_sub(now_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_ttl_is_clamped() {
        let entry = CacheEntry::new("k", CacheValue::Object(serde_json::json!(1)), 1_000, 0);
        assert!(entry.expires_at_ms > entry.stored_at_ms);
        assert!(!entry.is_expired(1_001));
        assert!(entry.is_expired(1_002));
    }
}
