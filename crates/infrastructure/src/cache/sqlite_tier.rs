use async_trait::async_trait;
use bytes::Bytes;
use cinefetch_application::ports::CacheTier;
use cinefetch_domain::{CacheEntry, CacheValue, DomainError};
use sqlx::SqlitePool;
use tracing::{error, instrument};

type EntryRow = (String, String, Option<String>, Vec<u8>, i64, i64);

/// Durable tier backed by the `cache_entries` table.
pub struct SqliteCacheTier {
    pool: SqlitePool,
}

impl SqliteCacheTier {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_entry(row: EntryRow) -> Result<CacheEntry, DomainError> {
        let (key, kind, content_type, payload, stored_at_ms, expires_at_ms) = row;

        let value = match kind.as_str() {
            "bytes" => CacheValue::Bytes {
                content_type: content_type.unwrap_or_else(|| "application/octet-stream".to_string()),
                data: Bytes::from(payload),
            },
            "object" => CacheValue::Object(
                serde_json::from_slice(&payload)
                    .map_err(|e| DomainError::SerializationError(e.to_string()))?,
            ),
            other => {
                return Err(DomainError::InvalidCacheEntry(format!(
                    "unknown payload kind '{}'",
                    other
                )))
            }
        };

        Ok(CacheEntry {
            key,
            value,
            stored_at_ms: stored_at_ms.max(0) as u64,
            expires_at_ms: expires_at_ms.max(0) as u64,
        })
    }

    fn encode(value: &CacheValue) -> Result<(Option<&str>, Vec<u8>), DomainError> {
        match value {
            CacheValue::Bytes { content_type, data } => Ok((Some(content_type.as_str()), data.to_vec())),
            CacheValue::Object(v) => serde_json::to_vec(v)
                .map(|payload| (None, payload))
                .map_err(|e| DomainError::SerializationError(e.to_string())),
        }
    }
}

fn to_db_millis(ms: u64) -> i64 {
    i64::try_from(ms).unwrap_or(i64::MAX)
}

#[async_trait]
impl CacheTier for SqliteCacheTier {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    #[instrument(skip(self))]
    async fn get(&self, key: &str) -> Result<Option<CacheEntry>, DomainError> {
        let row = sqlx::query_as::<_, EntryRow>(
            "SELECT key, kind, content_type, payload, stored_at_ms, expires_at_ms
             FROM cache_entries WHERE key = ?",
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to read cache entry");
            DomainError::DatabaseError(e.to_string())
        })?;

        row.map(Self::row_to_entry).transpose()
    }

    #[instrument(skip(self, entry), fields(key = %entry.key))]
    async fn put(&self, entry: CacheEntry) -> Result<(), DomainError> {
        let (content_type, payload) = Self::encode(&entry.value)?;

        sqlx::query(
            "INSERT INTO cache_entries (key, kind, content_type, payload, stored_at_ms, expires_at_ms)
             VALUES (?, ?, ?, ?, ?, ?)
             ON CONFLICT(key) DO UPDATE SET
                kind = excluded.kind,
                content_type = excluded.content_type,
                payload = excluded.payload,
                stored_at_ms = excluded.stored_at_ms,
                expires_at_ms = excluded.expires_at_ms",
        )
        .bind(&entry.key)
        .bind(entry.value.kind())
        .bind(content_type)
        .bind(payload)
        .bind(to_db_millis(entry.stored_at_ms))
        .bind(to_db_millis(entry.expires_at_ms))
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to upsert cache entry");
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn remove(&self, key: &str) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM cache_entries WHERE key = ?")
            .bind(key)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to delete cache entry");
                DomainError::DatabaseError(e.to_string())
            })?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    async fn remove_expired(&self, now_ms: u64) -> Result<u64, DomainError> {
        let result = sqlx::query("DELETE FROM cache_entries WHERE expires_at_ms < ?")
            .bind(to_db_millis(now_ms))
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to sweep expired cache entries");
                DomainError::DatabaseError(e.to_string())
            })?;

        Ok(result.rows_affected())
    }

    async fn len(&self) -> Result<u64, DomainError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM cache_entries")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::DatabaseError(e.to_string()))?;

        Ok(count.max(0) as u64)
    }
}
