//! # storefront-core: Pure Domain & State for Storefront
//!
//! This crate holds every piece of application state the client keeps in
//! memory, and every transition on it, as pure data and pure functions.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Storefront Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   UI Consumers (screens)                        │   │
//! │  │     Login ──► Catalog ──► Product Details ──► Favorites         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ Intents / snapshots                    │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              storefront-state (Orchestrator actor)              │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ storefront-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │  session  │  │  catalog  │  │ favorites │  │ validation│  │   │
//! │  │   │  Session  │  │ filtering │  │ toggle by │  │ login form│  │   │
//! │  │   │ AuthPhase │  │ categories│  │    id     │  │   rules   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO STORE • NO NETWORK • PURE FUNCTIONS              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Product, Rating, UserProfile, AuthPayload
//! - [`money`] - Price type with integer cents
//! - [`session`] - Session slice and its auth state machine
//! - [`catalog`] - Catalog slice and the derived-view algorithm
//! - [`favorites`] - Favorites slice keyed by product id
//! - [`snapshot`] - Composite read-only snapshot of all slices
//! - [`validation`] - Caller-side credential checks
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use storefront_core::catalog::CatalogState;
//!
//! let mut catalog = CatalogState::default();
//! catalog.set_search_text("  MUG ");
//! assert_eq!(catalog.search_text, "  MUG ");
//! assert!(catalog.filtered_items.is_empty());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod catalog;
pub mod error;
pub mod favorites;
pub mod money;
pub mod session;
pub mod snapshot;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use catalog::CatalogState;
pub use error::{CoreError, ValidationError};
pub use favorites::FavoritesState;
pub use money::Price;
pub use session::{AuthPhase, Session};
pub use snapshot::CompositeState;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Category sentinel meaning "no category filter".
///
/// The comparison against this sentinel is case-sensitive: `"all"` is treated
/// as a real category name.
pub const ALL_CATEGORIES: &str = "All";

/// Durable store key holding the raw session token.
pub const AUTH_TOKEN_KEY: &str = "authToken";

/// Durable store key holding the JSON array of favorited products.
pub const FAVORITES_KEY: &str = "favorites";

/// Minimum password length accepted by the login form.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Shown when the gateway rejects a login without saying why.
pub const LOGIN_FAILED_MESSAGE: &str = "Login failed. Please try again.";

/// Shown when the catalog fetch fails without a gateway message.
pub const FETCH_FAILED_MESSAGE: &str = "Failed to fetch products.";
