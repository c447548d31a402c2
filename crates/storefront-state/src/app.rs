//! # Application Launch
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  AppConfig ──► SqliteStore::open(db_config) ──┐                         │
//! │                                               ▼                         │
//! │  Gateway ─────────────────────────► Orchestrator::start                 │
//! │                                               │                         │
//! │                                   post(RestoreSession)                  │
//! │                                   post(RestoreFavorites)                │
//! │                                               │                         │
//! │                                               ▼                         │
//! │                                     OrchestratorHandle                  │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use tracing::{debug, info};

use storefront_store::{DurableStore, SqliteStore};

use crate::config::AppConfig;
use crate::error::StateResult;
use crate::gateway::Gateway;
use crate::intent::Intent;
use crate::orchestrator::{Orchestrator, OrchestratorHandle};
use crate::telemetry::init_tracing;

/// Installs tracing with the configured filter, opens the durable store
/// described by `config` and starts the state engine.
///
/// A host that installed its own subscriber first keeps it.
pub async fn launch(config: &AppConfig, gateway: Arc<dyn Gateway>) -> StateResult<OrchestratorHandle> {
    if !init_tracing(&config.logging.filter) {
        debug!("Tracing subscriber already installed");
    }

    let db_config = config.db_config();
    info!(path = ?db_config.database_path, "Opening durable store");

    let store = SqliteStore::open(db_config).await?;
    launch_with_store(config, gateway, Arc::new(store)).await
}

/// Starts the state engine over an already opened store.
///
/// The stored session and favorites are restored in the background; the
/// returned handle is usable immediately.
pub async fn launch_with_store(
    config: &AppConfig,
    gateway: Arc<dyn Gateway>,
    store: Arc<dyn DurableStore>,
) -> StateResult<OrchestratorHandle> {
    let handle = Orchestrator::start(gateway, store, config.runtime.command_buffer);

    handle.post(Intent::RestoreSession).await?;
    handle.post(Intent::RestoreFavorites).await?;

    info!("Storefront state engine started");
    Ok(handle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{shirt_and_mug, StubGateway};
    use std::time::Duration;
    use storefront_core::{CompositeState, AUTH_TOKEN_KEY, FAVORITES_KEY};
    use storefront_store::MemoryStore;
    use tokio::sync::watch;

    async fn wait_for(
        rx: &mut watch::Receiver<CompositeState>,
        done: impl Fn(&CompositeState) -> bool,
    ) -> CompositeState {
        tokio::time::timeout(Duration::from_secs(5), async {
            loop {
                if done(&rx.borrow_and_update()) {
                    return rx.borrow().clone();
                }
                rx.changed().await.unwrap();
            }
        })
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_launch_restores_session_and_favorites() {
        let favorites = serde_json::to_string(&shirt_and_mug()).unwrap();
        let store = Arc::new(MemoryStore::with_values([
            (AUTH_TOKEN_KEY.to_string(), "stored".to_string()),
            (FAVORITES_KEY.to_string(), favorites),
        ]));

        let handle = launch_with_store(&AppConfig::default(), Arc::new(StubGateway::new()), store)
            .await
            .unwrap();

        let mut rx = handle.watch();
        let state = wait_for(&mut rx, |s| s.session.is_authenticated && s.favorites.len() == 2).await;
        assert_eq!(state.session.token.as_deref(), Some("stored"));
        assert_eq!(state.favorites.ids(), vec![1, 2]);
    }

    #[tokio::test]
    async fn test_launch_in_memory_from_config() {
        let mut config = AppConfig::default();
        config.storage.in_memory = true;
        config.logging.filter = "warn".to_string();

        let handle = launch(&config, Arc::new(StubGateway::new())).await.unwrap();
        let state = handle
            .dispatch(Intent::ToggleFavorite(shirt_and_mug().remove(0)))
            .await
            .unwrap();
        assert_eq!(state.favorites.ids(), vec![1]);
        handle.shutdown().await.unwrap();

        // launch already installed the global subscriber
        assert!(!init_tracing("info"));
    }

    #[tokio::test]
    async fn test_launch_with_sqlite_persists_across_restarts() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = AppConfig::default();
        config.storage.path = Some(dir.path().join("storefront.db"));

        let handle = launch(&config, Arc::new(StubGateway::new())).await.unwrap();
        handle
            .dispatch(Intent::ToggleFavorite(shirt_and_mug().remove(1)))
            .await
            .unwrap();
        handle.shutdown().await.unwrap();

        let handle = launch(&config, Arc::new(StubGateway::new())).await.unwrap();
        let state = handle.dispatch(Intent::RestoreFavorites).await.unwrap();
        assert_eq!(state.favorites.ids(), vec![2]);
        assert!(!state.session.is_authenticated);
    }
}
