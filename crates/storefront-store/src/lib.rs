//! # storefront-store: Durable Store for Storefront
//!
//! Async key/value persistence for the two values the client keeps across
//! restarts: the session token and the favorites set.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Storefront Data Flow                             │
//! │                                                                         │
//! │  Orchestrator effects (restore, authenticate, favorites writer)         │
//! │       │                                                                 │
//! │       │  Arc<dyn DurableStore>                                          │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 storefront-store (THIS CRATE)                   │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │  SqliteStore  │    │   Database    │    │  Migrations  │  │   │
//! │  │   │  MemoryStore  │───►│   (pool.rs)   │    │  (embedded)  │  │   │
//! │  │   │  (store.rs)   │    │  KeyValueRepo │    │ 001_kv_store │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │   <platform data dir>/storefront.db                             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`store`] - `DurableStore` trait with SQLite and in-memory implementations
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`repository`] - Key/value repository
//! - [`error`] - Store error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use storefront_store::{DbConfig, DurableStore, SqliteStore};
//!
//! let store = SqliteStore::open(DbConfig::new("storefront.db")).await?;
//! store.set("authToken", "tok123").await?;
//! assert_eq!(store.get("authToken").await?.as_deref(), Some("tok123"));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{StoreError, StoreResult};
pub use pool::{Database, DbConfig};
pub use repository::kv::KeyValueRepository;
pub use store::{DurableStore, MemoryStore, SqliteStore, StoreOp};
