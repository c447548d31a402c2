//! # storefront-state: State Engine for Storefront
//!
//! Owns the process-wide [`CompositeState`](storefront_core::CompositeState)
//! and applies consumer intents to it.
//!
//! ## Architecture Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        State Engine Architecture                        │
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                 Orchestrator (single tokio task)                 │  │
//! │  │                                                                  │  │
//! │  │  Owns CompositeState { session, catalog, favorites }             │  │
//! │  │  Serializes every commit, publishes snapshots                    │  │
//! │  └────────────────────────────┬─────────────────────────────────────┘  │
//! │                               │                                         │
//! │         ┌─────────────────────┼─────────────────────┐                  │
//! │         ▼                     ▼                     ▼                   │
//! │  ┌────────────────┐  ┌────────────────┐  ┌────────────────────────┐    │
//! │  │ SessionManager │  │ CatalogManager │  │  FavoritesManager      │    │
//! │  │                │  │                │  │                        │    │
//! │  │ login, token   │  │ single-attempt │  │ best-effort writes,    │    │
//! │  │ mirror/restore │  │ catalog fetch  │  │ restore on launch      │    │
//! │  └───────┬────────┘  └───────┬────────┘  └───────────┬────────────┘    │
//! │          │                   │                       │                  │
//! │          ▼                   ▼                       ▼                  │
//! │     Gateway (trait)     Gateway (trait)     PersistenceWriter ──►      │
//! │                                             DurableStore               │
//! │                                                                         │
//! │  CONSUMER SURFACE (OrchestratorHandle):                                │
//! │  • dispatch(intent)   - apply and wait until settled                   │
//! │  • post(intent)       - fire and forget                                │
//! │  • state() / watch()  - current snapshot, change stream                │
//! │  • subscribe(cb)      - callback after every change                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//! - [`app`] - Launch sequence
//! - [`catalog`] - Catalog fetch effect
//! - [`config`] - TOML + environment configuration
//! - [`error`] - State and gateway error types
//! - [`favorites`] - Favorites persistence and restore
//! - [`gateway`] - Remote service seam
//! - [`intent`] - Intents and completions
//! - [`orchestrator`] - The actor and its handle
//! - [`session`] - Login, token mirror and restore
//! - [`telemetry`] - Tracing bootstrap
//! - [`writer`] - Ordered background store writes

pub mod app;
pub mod catalog;
pub mod config;
pub mod error;
pub mod favorites;
pub mod gateway;
pub mod intent;
pub mod orchestrator;
pub mod session;
pub mod telemetry;
pub mod writer;

#[cfg(test)]
mod testing;

pub use app::{launch, launch_with_store};
pub use catalog::CatalogManager;
pub use config::AppConfig;
pub use error::{GatewayError, StateError, StateResult};
pub use favorites::FavoritesManager;
pub use gateway::Gateway;
pub use intent::{Completion, Intent};
pub use orchestrator::{Orchestrator, OrchestratorHandle, Subscription, DEFAULT_COMMAND_BUFFER};
pub use session::SessionManager;
pub use telemetry::init_tracing;
pub use writer::{PersistenceWriter, WriteOp};
