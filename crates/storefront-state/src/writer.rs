//! # Persistence Writer
//!
//! A single background task that applies durable writes one at a time, in
//! the order they were submitted.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Orchestrator (commit done) ── submit(Set favorites) ──┐                │
//! │  SessionManager ── submit_with_ack(Set authToken) ─────┤                │
//! │  Logout ── submit_with_ack(Remove authToken) ──────────┤                │
//! │  Shutdown ── flush() ──────────────────────────────────┤                │
//! │                                                        ▼                │
//! │                                   ┌─────────────────────────────┐       │
//! │                                   │  FIFO queue (unbounded)     │       │
//! │                                   └──────────────┬──────────────┘       │
//! │                                                  ▼                      │
//! │                                   store.set / store.remove              │
//! │                                   Err ──► warn!, carry on               │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Submitting never blocks, so the orchestrator can enqueue from inside its
//! commit step. Nothing is coalesced: two toggles produce two writes.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, warn};

use storefront_store::DurableStore;

/// A single durable write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOp {
    Set { key: String, value: String },
    Remove { key: String },
}

impl WriteOp {
    pub fn set(key: impl Into<String>, value: impl Into<String>) -> Self {
        WriteOp::Set {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn remove(key: impl Into<String>) -> Self {
        WriteOp::Remove { key: key.into() }
    }

    fn key(&self) -> &str {
        match self {
            WriteOp::Set { key, .. } | WriteOp::Remove { key } => key,
        }
    }
}

enum Job {
    Write {
        op: WriteOp,
        ack: Option<oneshot::Sender<bool>>,
    },
    Flush(oneshot::Sender<()>),
}

/// Handle to the writer task. Cloning shares the same queue.
#[derive(Clone)]
pub struct PersistenceWriter {
    tx: mpsc::UnboundedSender<Job>,
}

impl PersistenceWriter {
    /// Spawns the writer task. It stops once every handle is dropped.
    pub fn spawn(store: Arc<dyn DurableStore>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(run(store, rx));
        PersistenceWriter { tx }
    }

    /// Queues a write without waiting for it.
    pub fn submit(&self, op: WriteOp) {
        self.enqueue(op, None);
    }

    /// Queues a write. The receiver yields `true` if the store accepted it.
    pub fn submit_with_ack(&self, op: WriteOp) -> oneshot::Receiver<bool> {
        let (ack_tx, ack_rx) = oneshot::channel();
        self.enqueue(op, Some(ack_tx));
        ack_rx
    }

    /// Waits until every write queued before this call has been attempted.
    pub async fn flush(&self) {
        let (done_tx, done_rx) = oneshot::channel();
        if self.tx.send(Job::Flush(done_tx)).is_err() {
            return;
        }
        let _ = done_rx.await;
    }

    fn enqueue(&self, op: WriteOp, ack: Option<oneshot::Sender<bool>>) {
        let key = op.key().to_string();
        if self.tx.send(Job::Write { op, ack }).is_err() {
            error!(key = %key, "Persistence writer stopped, write dropped");
        }
    }
}

async fn run(store: Arc<dyn DurableStore>, mut rx: mpsc::UnboundedReceiver<Job>) {
    debug!("Persistence writer started");

    while let Some(job) = rx.recv().await {
        match job {
            Job::Write { op, ack } => {
                let result = match &op {
                    WriteOp::Set { key, value } => store.set(key, value).await,
                    WriteOp::Remove { key } => store.remove(key).await,
                };
                let ok = match result {
                    Ok(()) => {
                        debug!(key = %op.key(), "Durable write applied");
                        true
                    }
                    Err(e) => {
                        warn!(key = %op.key(), error = %e, "Durable write failed, in-memory state kept");
                        false
                    }
                };
                if let Some(ack) = ack {
                    let _ = ack.send(ok);
                }
            }
            Job::Flush(done) => {
                let _ = done.send(());
            }
        }
    }

    debug!("Persistence writer stopped");
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use storefront_store::{MemoryStore, StoreOp};

    #[tokio::test]
    async fn test_writes_apply_in_order() {
        let store = Arc::new(MemoryStore::new());
        let writer = PersistenceWriter::spawn(store.clone());

        writer.submit(WriteOp::set("favorites", "[1]"));
        writer.submit(WriteOp::set("favorites", "[1,2]"));
        writer.submit(WriteOp::remove("authToken"));
        writer.flush().await;

        assert_eq!(
            store.ops().await,
            vec![
                StoreOp::Set {
                    key: "favorites".into(),
                    value: "[1]".into()
                },
                StoreOp::Set {
                    key: "favorites".into(),
                    value: "[1,2]".into()
                },
                StoreOp::Remove {
                    key: "authToken".into()
                },
            ]
        );
        assert_eq!(store.peek("favorites").await.as_deref(), Some("[1,2]"));
    }

    #[tokio::test]
    async fn test_failures_are_swallowed() {
        let store = Arc::new(MemoryStore::new());
        store.fail_writes(true);
        let writer = PersistenceWriter::spawn(store.clone());

        let ack = writer.submit_with_ack(WriteOp::set("favorites", "[]"));
        assert!(!ack.await.unwrap());

        store.fail_writes(false);
        let ack = writer.submit_with_ack(WriteOp::set("favorites", "[5]"));
        assert!(ack.await.unwrap());
        assert_eq!(store.ops().await.len(), 2);
    }
}
