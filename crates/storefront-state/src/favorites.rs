//! # Favorites Manager
//!
//! Best-effort persistence of the favorites set. The in-memory toggle has
//! already committed by the time [`FavoritesManager::persist`] is called;
//! nothing here can undo it.

use std::sync::Arc;

use tracing::{debug, info, warn};

use storefront_core::{FavoritesState, FAVORITES_KEY};
use storefront_store::DurableStore;

use crate::intent::Completion;
use crate::writer::{PersistenceWriter, WriteOp};

#[derive(Clone)]
pub struct FavoritesManager {
    store: Arc<dyn DurableStore>,
    writer: PersistenceWriter,
}

impl FavoritesManager {
    pub fn new(store: Arc<dyn DurableStore>, writer: PersistenceWriter) -> Self {
        FavoritesManager { store, writer }
    }

    /// Queues a write of the full set. Returns immediately.
    pub fn persist(&self, favorites: &FavoritesState) {
        match favorites.to_json() {
            Ok(json) => {
                debug!(count = favorites.len(), "Queueing favorites write");
                self.writer.submit(WriteOp::set(FAVORITES_KEY, json));
            }
            Err(e) => warn!(error = %e, "Favorites not serializable, skipping write"),
        }
    }

    /// Reads the persisted set. Absent, unreadable and malformed all yield `None`.
    pub async fn restore(&self) -> Completion {
        let items = match self.store.get(FAVORITES_KEY).await {
            Ok(Some(json)) => match FavoritesState::from_json(&json) {
                Ok(restored) => {
                    info!(count = restored.len(), "Favorites restored from store");
                    Some(restored.items().to_vec())
                }
                Err(e) => {
                    warn!(error = %e, "Stored favorites unreadable, ignoring");
                    None
                }
            },
            Ok(None) => {
                debug!("No stored favorites");
                None
            }
            Err(e) => {
                warn!(error = %e, "Favorites restore failed");
                None
            }
        };
        Completion::FavoritesRestored(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::product;
    use storefront_store::MemoryStore;

    fn manager(store: Arc<MemoryStore>) -> (FavoritesManager, PersistenceWriter) {
        let writer = PersistenceWriter::spawn(store.clone());
        (FavoritesManager::new(store, writer.clone()), writer)
    }

    #[tokio::test]
    async fn test_persist_then_restore() {
        let store = Arc::new(MemoryStore::new());
        let (favorites, writer) = manager(store.clone());

        let set = FavoritesState::from_products(vec![product(2, "Mug", "home", 999), product(1, "Shirt", "clothing", 1999)]);
        favorites.persist(&set);
        writer.flush().await;

        match favorites.restore().await {
            Completion::FavoritesRestored(Some(items)) => {
                let mut ids: Vec<i64> = items.iter().map(|p| p.id).collect();
                ids.sort();
                assert_eq!(ids, vec![1, 2]);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_restore_degrades_to_none() {
        let (favorites, _) = manager(Arc::new(MemoryStore::new()));
        assert!(matches!(favorites.restore().await, Completion::FavoritesRestored(None)));

        let (favorites, _) = manager(Arc::new(MemoryStore::with_values([(FAVORITES_KEY, "{oops")])));
        assert!(matches!(favorites.restore().await, Completion::FavoritesRestored(None)));

        let store = Arc::new(MemoryStore::with_values([(FAVORITES_KEY, "[]")]));
        store.fail_reads(true);
        let (favorites, _) = manager(store);
        assert!(matches!(favorites.restore().await, Completion::FavoritesRestored(None)));
    }
}
