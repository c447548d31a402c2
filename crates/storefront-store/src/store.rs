//! # Durable Store
//!
//! The key/value surface the state engine persists through.
//!
//! ## Implementations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     dyn DurableStore                                    │
//! │                get / set / remove on string keys                        │
//! │                          │                                              │
//! │             ┌────────────┴─────────────┐                                │
//! │             ▼                          ▼                                │
//! │  ┌─────────────────────┐    ┌─────────────────────────┐                 │
//! │  │    SqliteStore      │    │      MemoryStore        │                 │
//! │  │  ─────────────────  │    │  ─────────────────────  │                 │
//! │  │  kv_store table     │    │  HashMap in a Mutex     │                 │
//! │  │  survives restarts  │    │  operation log          │                 │
//! │  │                     │    │  failure injection      │                 │
//! │  └─────────────────────┘    └─────────────────────────┘                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Mutex;

use crate::error::{StoreError, StoreResult};
use crate::pool::{Database, DbConfig};

// =============================================================================
// Trait
// =============================================================================

/// Async key/value persistence.
#[async_trait]
pub trait DurableStore: Send + Sync {
    /// Reads `key`. Absent keys are `Ok(None)`.
    async fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Writes `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Removes `key`. Removing an absent key succeeds.
    async fn remove(&self, key: &str) -> StoreResult<()>;
}

// =============================================================================
// SQLite
// =============================================================================

/// Durable store backed by the SQLite `kv_store` table.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    db: Database,
}

impl SqliteStore {
    /// Opens (and migrates) the database described by `config`.
    pub async fn open(config: DbConfig) -> StoreResult<Self> {
        Ok(SqliteStore {
            db: Database::new(config).await?,
        })
    }

    pub fn from_database(db: Database) -> Self {
        SqliteStore { db }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }
}

#[async_trait]
impl DurableStore for SqliteStore {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        self.db.kv().get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        self.db.kv().upsert(key, value).await
    }

    async fn remove(&self, key: &str) -> StoreResult<()> {
        self.db.kv().delete(key).await.map(|_| ())
    }
}

// =============================================================================
// In-Memory
// =============================================================================

/// A write attempted against a [`MemoryStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreOp {
    Set { key: String, value: String },
    Remove { key: String },
}

impl StoreOp {
    pub fn key(&self) -> &str {
        match self {
            StoreOp::Set { key, .. } | StoreOp::Remove { key } => key,
        }
    }
}

/// Process-local store.
///
/// Every write attempt is appended to an operation log, including attempts
/// rejected by an injected failure.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
    ops: Mutex<Vec<StoreOp>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }

    /// A store pre-populated with `values`. Seeding is not logged.
    pub fn with_values<K, V>(values: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let values = values
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        MemoryStore {
            values: Mutex::new(values),
            ..MemoryStore::default()
        }
    }

    /// Makes every later `get` fail.
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Makes every later `set`/`remove` fail (after being logged).
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Write attempts so far, oldest first.
    pub async fn ops(&self) -> Vec<StoreOp> {
        self.ops.lock().await.clone()
    }

    /// Current value of `key`, bypassing failure injection.
    pub async fn peek(&self, key: &str) -> Option<String> {
        self.values.lock().await.get(key).cloned()
    }

    async fn record(&self, op: StoreOp) -> StoreResult<()> {
        self.ops.lock().await.push(op);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("write failure injected".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl DurableStore for MemoryStore {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("read failure injected".to_string()));
        }
        Ok(self.values.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        self.record(StoreOp::Set {
            key: key.to_string(),
            value: value.to_string(),
        })
        .await?;
        self.values
            .lock()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> StoreResult<()> {
        self.record(StoreOp::Remove {
            key: key.to_string(),
        })
        .await?;
        self.values.lock().await.remove(key);
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;
    use storefront_core::{FavoritesState, Price, Product, AUTH_TOKEN_KEY, FAVORITES_KEY};

    async fn exercise(store: Arc<dyn DurableStore>) {
        assert_eq!(store.get(AUTH_TOKEN_KEY).await.unwrap(), None);

        store.set(AUTH_TOKEN_KEY, "tok123").await.unwrap();
        assert_eq!(store.get(AUTH_TOKEN_KEY).await.unwrap().as_deref(), Some("tok123"));

        store.remove(AUTH_TOKEN_KEY).await.unwrap();
        store.remove(AUTH_TOKEN_KEY).await.unwrap();
        assert_eq!(store.get(AUTH_TOKEN_KEY).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_sqlite_store_contract() {
        let store = SqliteStore::open(DbConfig::in_memory()).await.unwrap();
        exercise(Arc::new(store)).await;
    }

    #[tokio::test]
    async fn test_memory_store_contract() {
        exercise(Arc::new(MemoryStore::new())).await;
    }

    #[tokio::test]
    async fn test_sqlite_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storefront.db");

        let favorites = FavoritesState::from_products(vec![Product::new(
            5,
            "Mug",
            "home",
            Price::from_cents(999).unwrap(),
        )]);
        let json = favorites.to_json().unwrap();

        {
            let store = SqliteStore::open(DbConfig::new(&path)).await.unwrap();
            store.set(FAVORITES_KEY, &json).await.unwrap();
            store.database().close().await;
        }

        let store = SqliteStore::open(DbConfig::new(&path)).await.unwrap();
        let restored = store.get(FAVORITES_KEY).await.unwrap().unwrap();
        assert_eq!(FavoritesState::from_json(&restored).unwrap(), favorites);
    }

    #[tokio::test]
    async fn test_memory_store_logs_ops() {
        let store = MemoryStore::with_values([(AUTH_TOKEN_KEY, "seed")]);
        store.set(FAVORITES_KEY, "[]").await.unwrap();
        store.remove(AUTH_TOKEN_KEY).await.unwrap();

        assert_eq!(
            store.ops().await,
            vec![
                StoreOp::Set {
                    key: FAVORITES_KEY.to_string(),
                    value: "[]".to_string()
                },
                StoreOp::Remove {
                    key: AUTH_TOKEN_KEY.to_string()
                },
            ]
        );
        assert_eq!(store.peek(AUTH_TOKEN_KEY).await, None);
    }

    #[tokio::test]
    async fn test_memory_store_failure_injection() {
        let store = MemoryStore::with_values([(FAVORITES_KEY, "[]")]);

        store.fail_reads(true);
        assert!(matches!(
            store.get(FAVORITES_KEY).await,
            Err(StoreError::Unavailable(_))
        ));
        store.fail_reads(false);

        store.fail_writes(true);
        assert!(store.set(FAVORITES_KEY, "[1]").await.is_err());
        assert_eq!(store.ops().await.len(), 1);
        assert_eq!(store.peek(FAVORITES_KEY).await.as_deref(), Some("[]"));
    }

    #[tokio::test]
    async fn test_sqlite_store_over_unmigrated_database() {
        let config = DbConfig::in_memory()
            .connect_timeout(Duration::from_secs(1))
            .run_migrations(false);
        let store = SqliteStore::from_database(Database::new(config).await.unwrap());

        assert!(store.get(AUTH_TOKEN_KEY).await.is_err());

        store.database().run_migrations().await.unwrap();
        assert_eq!(store.get(AUTH_TOKEN_KEY).await.unwrap(), None);
        store.set(AUTH_TOKEN_KEY, "tok123").await.unwrap();
        assert_eq!(store.get(AUTH_TOKEN_KEY).await.unwrap().as_deref(), Some("tok123"));
    }
}
