//! # Key/Value Repository
//!
//! ## Table
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  kv_store                                                               │
//! │  ─────────────────────────────────────────────────────────────────────  │
//! │  key TEXT PK        value TEXT                  updated_at TEXT         │
//! │  "authToken"        "tok123"                    2026-10-19T08:00:00Z    │
//! │  "favorites"        "[{\"id\":5,...}]"          2026-10-19T08:01:12Z    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Writes are upserts: a `set` on an existing key replaces the value and
//! stamps `updated_at`.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::StoreResult;

/// Repository for `kv_store` rows.
#[derive(Debug, Clone)]
pub struct KeyValueRepository {
    pool: SqlitePool,
}

impl KeyValueRepository {
    pub fn new(pool: SqlitePool) -> Self {
        KeyValueRepository { pool }
    }

    /// Reads the value for `key`, if any.
    pub async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let value: Option<String> = sqlx::query_scalar("SELECT value FROM kv_store WHERE key = ?1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        debug!(key = %key, found = value.is_some(), "kv get");
        Ok(value)
    }

    /// Inserts or replaces the value for `key`.
    pub async fn upsert(&self, key: &str, value: &str) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO kv_store (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        debug!(key = %key, bytes = value.len(), "kv upsert");
        Ok(())
    }

    /// Deletes `key`. Returns whether a row was removed.
    pub async fn delete(&self, key: &str) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM kv_store WHERE key = ?1")
            .bind(key)
            .execute(&self.pool)
            .await?;

        debug!(key = %key, removed = result.rows_affected(), "kv delete");
        Ok(result.rows_affected() > 0)
    }

    /// All stored keys, sorted.
    pub async fn keys(&self) -> StoreResult<Vec<String>> {
        let keys = sqlx::query_scalar("SELECT key FROM kv_store ORDER BY key")
            .fetch_all(&self.pool)
            .await?;
        Ok(keys)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
