//! # Session Manager
//!
//! Asynchronous side of the session slice: the gateway login, the token
//! mirror in the durable store and the launch-time restore.
//!
//! ## Token Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  authenticate ──► Gateway.authenticate                                  │
//! │                     │ Ok                       │ Err                    │
//! │                     ▼                          ▼                        │
//! │        writer: Set authToken (awaited)   lastError = message            │
//! │                     │                                                   │
//! │                     ▼                                                   │
//! │        Completion::SessionAuthenticated(Ok)                             │
//! │                                                                         │
//! │  restore ──► store.get(authToken) ──► Some(non-empty) / None            │
//! │                                       (read errors become None)         │
//! │                                                                         │
//! │  clear ──► writer: Remove authToken (ack returned to orchestrator)      │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use tokio::sync::oneshot;
use tracing::{debug, info, warn};

use storefront_core::{AUTH_TOKEN_KEY, LOGIN_FAILED_MESSAGE};
use storefront_store::DurableStore;

use crate::gateway::Gateway;
use crate::intent::Completion;
use crate::writer::{PersistenceWriter, WriteOp};

#[derive(Clone)]
pub struct SessionManager {
    gateway: Arc<dyn Gateway>,
    store: Arc<dyn DurableStore>,
    writer: PersistenceWriter,
}

impl SessionManager {
    pub fn new(gateway: Arc<dyn Gateway>, store: Arc<dyn DurableStore>, writer: PersistenceWriter) -> Self {
        SessionManager { gateway, store, writer }
    }

    /// Logs in and mirrors the token into the store before completing.
    ///
    /// A failed token write is logged and otherwise ignored. The session is
    /// still authenticated in memory; it just won't survive a restart.
    pub async fn authenticate(&self, username: &str, password: &str) -> Completion {
        debug!(username = %username, "Authenticating");

        match self.gateway.authenticate(username, password).await {
            Ok(payload) => {
                if !payload.access_token.is_empty() {
                    let ack = self
                        .writer
                        .submit_with_ack(WriteOp::set(AUTH_TOKEN_KEY, payload.access_token.as_str()));
                    if !ack.await.unwrap_or(false) {
                        warn!("Session token not persisted");
                    }
                }
                info!(user_id = payload.id, username = %payload.username, "Authenticated");
                Completion::SessionAuthenticated(Ok(payload))
            }
            Err(e) => {
                warn!(error = %e, "Authentication failed");
                Completion::SessionAuthenticated(Err(e.user_message(LOGIN_FAILED_MESSAGE)))
            }
        }
    }

    /// Reads the stored token. Absent, empty and unreadable all yield `None`.
    pub async fn restore(&self) -> Completion {
        let token = match self.store.get(AUTH_TOKEN_KEY).await {
            Ok(Some(token)) if !token.is_empty() => {
                info!("Session restored from store");
                Some(token)
            }
            Ok(_) => {
                debug!("No stored session");
                None
            }
            Err(e) => {
                warn!(error = %e, "Session restore failed, staying signed out");
                None
            }
        };
        Completion::SessionRestored(token)
    }

    /// Queues removal of the stored token.
    pub fn clear(&self) -> oneshot::Receiver<bool> {
        self.writer.submit_with_ack(WriteOp::remove(AUTH_TOKEN_KEY))
    }
}
