//! # State Orchestrator
//!
//! One tokio task owns the [`CompositeState`]. Every commit happens inside
//! that task, so commits are serialized even when gateway and store work
//! overlaps in time.
//!
//! ## Actor Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  OrchestratorHandle (Clone)                                             │
//! │   dispatch / post ──► cmd channel (bounded) ─┐                          │
//! │   shutdown ─────────► cmd channel ───────────┤                          │
//! │                                              ▼                          │
//! │                      ┌──────────────────────────────────────┐           │
//! │                      │         Orchestrator::run            │           │
//! │                      │   select! {                          │           │
//! │                      │     cmd     => sync step, spawn      │           │
//! │                      │     settled => commit completion     │           │
//! │                      │   }                                  │           │
//! │                      └──────┬───────────────────▲───────────┘           │
//! │                             │ spawn             │ settled channel       │
//! │                             ▼                   │                       │
//! │                      Manager effect ── Completion                       │
//! │                                                                         │
//! │  After each change:                                                     │
//! │   watch::Sender::send_replace(snapshot) ──► state() / watch()           │
//! │   callbacks(&snapshot)                 ──► subscribe()                  │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Settling
//! `dispatch` resolves when its intent has settled: synchronous intents
//! right after their commit, asynchronous ones after their completion has
//! been committed. Favorites writes are never awaited.
//!
//! Completions are applied to whatever the state is when they arrive. A
//! slow fetch that resolves after a newer one overwrites it.

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, Weak};

use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, error, info};

use storefront_core::CompositeState;
use storefront_store::DurableStore;

use crate::catalog::CatalogManager;
use crate::error::{StateError, StateResult};
use crate::favorites::FavoritesManager;
use crate::gateway::Gateway;
use crate::intent::{Completion, Intent};
use crate::session::SessionManager;
use crate::writer::PersistenceWriter;

/// Default capacity of the command mailbox.
pub const DEFAULT_COMMAND_BUFFER: usize = 64;

type Reply = Option<oneshot::Sender<CompositeState>>;

// =============================================================================
// Commands
// =============================================================================

enum Command {
    Dispatch { intent: Intent, reply: Reply },
    Shutdown { reply: oneshot::Sender<()> },
}

struct Settled {
    completion: Completion,
    reply: Reply,
}

// =============================================================================
// Subscribers
// =============================================================================

type Callback = Arc<dyn Fn(&CompositeState) + Send + Sync>;

#[derive(Default)]
struct Subscribers {
    next_id: AtomicU64,
    callbacks: Mutex<Vec<(u64, Callback)>>,
}

impl Subscribers {
    fn lock(&self) -> MutexGuard<'_, Vec<(u64, Callback)>> {
        // Poisoning only means a panic mid-push or mid-retain; the Vec is still valid.
        self.callbacks.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn add(&self, callback: Callback) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.lock().push((id, callback));
        id
    }

    fn remove(&self, id: u64) -> bool {
        let mut callbacks = self.lock();
        let before = callbacks.len();
        callbacks.retain(|(existing, _)| *existing != id);
        callbacks.len() != before
    }

    /// Runs every callback with `snapshot`. A callback that panics is
    /// logged and unregistered; the remaining callbacks still run.
    fn notify(&self, snapshot: &CompositeState) {
        // Called outside the lock so a callback may subscribe or unsubscribe.
        let callbacks: Vec<(u64, Callback)> = self.lock().iter().map(|(id, cb)| (*id, cb.clone())).collect();
        for (id, callback) in callbacks {
            if panic::catch_unwind(AssertUnwindSafe(|| callback(snapshot))).is_err() {
                error!(subscriber = id, "Subscriber panicked, unregistering it");
                self.remove(id);
            }
        }
    }

    fn len(&self) -> usize {
        self.lock().len()
    }
}

/// Registration returned by [`OrchestratorHandle::subscribe`].
#[must_use = "dropping a Subscription keeps the callback registered; call unsubscribe() to remove it"]
pub struct Subscription {
    id: u64,
    subscribers: Weak<Subscribers>,
}

impl Subscription {
    /// Removes the callback. Returns `false` if it was already gone.
    pub fn unsubscribe(self) -> bool {
        match self.subscribers.upgrade() {
            Some(subscribers) => subscribers.remove(self.id),
            None => false,
        }
    }
}

// =============================================================================
// Handle
// =============================================================================

/// Cloneable entry point to the orchestrator.
#[derive(Clone)]
pub struct OrchestratorHandle {
    cmd_tx: mpsc::Sender<Command>,
    state_rx: watch::Receiver<CompositeState>,
    subscribers: Arc<Subscribers>,
}

impl OrchestratorHandle {
    /// Applies `intent` and waits until it has settled.
    ///
    /// Returns the snapshot committed when the intent settled.
    pub async fn dispatch(&self, intent: Intent) -> StateResult<CompositeState> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(Command::Dispatch {
            intent,
            reply: Some(reply_tx),
        })
        .await?;
        reply_rx.await.map_err(|_| StateError::ShuttingDown)
    }

    /// Enqueues `intent` without waiting for it to settle.
    pub async fn post(&self, intent: Intent) -> StateResult<()> {
        self.send(Command::Dispatch { intent, reply: None }).await
    }

    /// Current composite snapshot.
    pub fn state(&self) -> CompositeState {
        self.state_rx.borrow().clone()
    }

    /// Receiver that observes every published snapshot.
    pub fn watch(&self) -> watch::Receiver<CompositeState> {
        self.state_rx.clone()
    }

    /// Registers `callback` to run after every state change with the new
    /// snapshot.
    ///
    /// Callbacks run on the orchestrator task and must not block.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&CompositeState) + Send + Sync + 'static,
    {
        let id = self.subscribers.add(Arc::new(callback));
        Subscription {
            id,
            subscribers: Arc::downgrade(&self.subscribers),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Stops accepting intents, drains pending durable writes and stops the
    /// actor.
    pub async fn shutdown(&self) -> StateResult<()> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(Command::Shutdown { reply: reply_tx }).await?;
        reply_rx.await.map_err(|_| StateError::ShuttingDown)
    }

    async fn send(&self, command: Command) -> StateResult<()> {
        self.cmd_tx
            .send(command)
            .await
            .map_err(|_| StateError::ChannelClosed("Orchestrator command channel closed".into()))
    }
}

// =============================================================================
// Orchestrator
// =============================================================================

/// Owner of the composite state.
pub struct Orchestrator {
    state: CompositeState,
    session: SessionManager,
    catalog: CatalogManager,
    favorites: FavoritesManager,
    writer: PersistenceWriter,
    state_tx: watch::Sender<CompositeState>,
    subscribers: Arc<Subscribers>,
    settled_tx: mpsc::UnboundedSender<Settled>,
}

impl Orchestrator {
    /// Spawns the orchestrator and its persistence writer.
    pub fn start(gateway: Arc<dyn Gateway>, store: Arc<dyn DurableStore>, command_buffer: usize) -> OrchestratorHandle {
        let writer = PersistenceWriter::spawn(store.clone());
        let initial = CompositeState::default();
        let (state_tx, state_rx) = watch::channel(initial.clone());
        let (cmd_tx, cmd_rx) = mpsc::channel(command_buffer.max(1));
        let (settled_tx, settled_rx) = mpsc::unbounded_channel();
        let subscribers = Arc::new(Subscribers::default());

        let orchestrator = Orchestrator {
            state: initial,
            session: SessionManager::new(gateway.clone(), store.clone(), writer.clone()),
            catalog: CatalogManager::new(gateway),
            favorites: FavoritesManager::new(store, writer.clone()),
            writer,
            state_tx,
            subscribers: subscribers.clone(),
            settled_tx,
        };

        tokio::spawn(orchestrator.run(cmd_rx, settled_rx));

        OrchestratorHandle {
            cmd_tx,
            state_rx,
            subscribers,
        }
    }

    async fn run(mut self, mut cmd_rx: mpsc::Receiver<Command>, mut settled_rx: mpsc::UnboundedReceiver<Settled>) {
        info!("Orchestrator started");

        loop {
            tokio::select! {
                command = cmd_rx.recv() => match command {
                    Some(Command::Dispatch { intent, reply }) => self.handle(intent, reply),
                    Some(Command::Shutdown { reply }) => {
                        info!("Orchestrator shutting down");
                        self.writer.flush().await;
                        let _ = reply.send(());
                        break;
                    }
                    None => {
                        debug!("All handles dropped");
                        self.writer.flush().await;
                        break;
                    }
                },
                Some(settled) = settled_rx.recv() => self.settle(settled),
            }
        }

        info!("Orchestrator stopped");
    }

    // =========================================================================
    // Intent routing
    // =========================================================================

    fn handle(&mut self, intent: Intent, reply: Reply) {
        debug!(intent = %intent.name(), "Dispatch");

        match intent {
            Intent::Authenticate { username, password } => {
                self.commit(|s| s.session.begin_authentication());
                let session = self.session.clone();
                self.spawn_effect(reply, async move { session.authenticate(&username, &password).await });
            }
            Intent::RestoreSession => {
                let session = self.session.clone();
                self.spawn_effect(reply, async move { session.restore().await });
            }
            Intent::ClearSessionError => {
                self.commit(|s| s.session.clear_error());
                self.reply(reply);
            }
            Intent::Logout => {
                self.commit(|s| s.session.reset());
                let removed = self.session.clear();
                self.spawn_effect(reply, async move {
                    let _ = removed.await;
                    Completion::SessionCleared
                });
            }
            Intent::FetchCatalog => {
                self.commit(|s| s.catalog.begin_fetch());
                let catalog = self.catalog.clone();
                self.spawn_effect(reply, async move { catalog.fetch().await });
            }
            Intent::SetSearchText(text) => {
                self.commit(|s| s.catalog.set_search_text(text));
                self.reply(reply);
            }
            Intent::SetSelectedCategory(category) => {
                self.commit(|s| s.catalog.set_selected_category(category));
                self.reply(reply);
            }
            Intent::ToggleFavorite(product) => {
                self.commit(|s| {
                    s.favorites.toggle(product);
                });
                self.favorites.persist(&self.state.favorites);
                self.reply(reply);
            }
            Intent::RemoveFavorite(id) => {
                self.commit(|s| {
                    s.favorites.remove(id);
                });
                self.favorites.persist(&self.state.favorites);
                self.reply(reply);
            }
            Intent::RestoreFavorites => {
                let favorites = self.favorites.clone();
                self.spawn_effect(reply, async move { favorites.restore().await });
            }
        }
    }

    fn settle(&mut self, settled: Settled) {
        let Settled { completion, reply } = settled;
        debug!(completion = %completion.name(), "Settle");

        match completion {
            Completion::SessionAuthenticated(Ok(payload)) => {
                self.commit(|s| s.session.complete_authentication(&payload))
            }
            Completion::SessionAuthenticated(Err(message)) => {
                self.commit(|s| s.session.fail_authentication(message))
            }
            Completion::SessionRestored(token) => self.commit(|s| s.session.restore(token)),
            Completion::SessionCleared => {}
            Completion::CatalogFetched(Ok(items)) => self.commit(|s| s.catalog.complete_fetch(items)),
            Completion::CatalogFetched(Err(message)) => self.commit(|s| s.catalog.fail_fetch(message)),
            Completion::FavoritesRestored(Some(items)) => {
                self.commit(|s| s.favorites.replace_all(items))
            }
            Completion::FavoritesRestored(None) => {}
        }

        self.reply(reply);
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    /// Applies `transition` and publishes if anything changed.
    fn commit(&mut self, transition: impl FnOnce(&mut CompositeState)) {
        let before = self.state.clone();
        transition(&mut self.state);
        if self.state != before {
            self.state_tx.send_replace(self.state.clone());
            self.subscribers.notify(&self.state);
        }
    }

    fn reply(&self, reply: Reply) {
        if let Some(reply) = reply {
            let _ = reply.send(self.state.clone());
        }
    }

    fn spawn_effect<F>(&self, reply: Reply, effect: F)
    where
        F: std::future::Future<Output = Completion> + Send + 'static,
    {
        let settled_tx = self.settled_tx.clone();
        tokio::spawn(async move {
            let completion = effect.await;
            if settled_tx.send(Settled { completion, reply }).is_err() {
                error!("Orchestrator stopped before effect settled");
            }
        });
    }
}

// =============================================================================
// Tests
// =============================================================================
