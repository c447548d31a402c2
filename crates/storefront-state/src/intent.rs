//! # Intents and Completions
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Consumer ── Intent ──► Orchestrator ── sync step (commit now)          │
//! │                              │                                          │
//! │                              └── async step ──► Manager effect          │
//! │                                                  (gateway / store)      │
//! │                                                       │                 │
//! │  Orchestrator ◄── Completion ─────────────────────────┘                 │
//! │       │                                                                 │
//! │       └── commit against the current state, publish, reply             │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fmt;

use storefront_core::{AuthPayload, Product};

// =============================================================================
// Intent
// =============================================================================

/// A request to change state, handled by exactly one manager.
#[derive(Clone, PartialEq)]
pub enum Intent {
    Authenticate { username: String, password: String },
    RestoreSession,
    ClearSessionError,
    Logout,
    FetchCatalog,
    SetSearchText(String),
    SetSelectedCategory(String),
    ToggleFavorite(Product),
    RemoveFavorite(i64),
    RestoreFavorites,
}

impl Intent {
    pub fn authenticate(username: impl Into<String>, password: impl Into<String>) -> Self {
        Intent::Authenticate {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Contract name of the intent, as used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Intent::Authenticate { .. } => "authenticate",
            Intent::RestoreSession => "restoreSession",
            Intent::ClearSessionError => "clearSessionError",
            Intent::Logout => "logout",
            Intent::FetchCatalog => "fetchCatalog",
            Intent::SetSearchText(_) => "setSearchText",
            Intent::SetSelectedCategory(_) => "setSelectedCategory",
            Intent::ToggleFavorite(_) => "toggleFavorite",
            Intent::RemoveFavorite(_) => "removeFavorite",
            Intent::RestoreFavorites => "restoreFavorites",
        }
    }
}

impl fmt::Debug for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Intent::Authenticate { username, .. } => f
                .debug_struct("Authenticate")
                .field("username", username)
                .field("password", &"<redacted>")
                .finish(),
            Intent::RestoreSession => f.write_str("RestoreSession"),
            Intent::ClearSessionError => f.write_str("ClearSessionError"),
            Intent::Logout => f.write_str("Logout"),
            Intent::FetchCatalog => f.write_str("FetchCatalog"),
            Intent::SetSearchText(text) => f.debug_tuple("SetSearchText").field(text).finish(),
            Intent::SetSelectedCategory(c) => f.debug_tuple("SetSelectedCategory").field(c).finish(),
            Intent::ToggleFavorite(p) => f.debug_tuple("ToggleFavorite").field(&p.id).finish(),
            Intent::RemoveFavorite(id) => f.debug_tuple("RemoveFavorite").field(id).finish(),
            Intent::RestoreFavorites => f.write_str("RestoreFavorites"),
        }
    }
}

// =============================================================================
// Completion
// =============================================================================

/// Outcome of a manager's asynchronous step, committed by the orchestrator.
#[derive(Debug, Clone)]
pub enum Completion {
    /// Gateway answer. `Err` holds the text for `lastError`.
    SessionAuthenticated(Result<AuthPayload, String>),
    /// Token read at launch. Read failures arrive as `None`.
    SessionRestored(Option<String>),
    /// The token removal queued by logout has been attempted.
    SessionCleared,
    /// Gateway answer. `Err` holds the text for `lastError`.
    CatalogFetched(Result<Vec<Product>, String>),
    /// Persisted favorites, or `None` when absent or unreadable.
    FavoritesRestored(Option<Vec<Product>>),
}

impl Completion {
    pub fn name(&self) -> &'static str {
        match self {
            Completion::SessionAuthenticated(_) => "sessionAuthenticated",
            Completion::SessionRestored(_) => "sessionRestored",
            Completion::SessionCleared => "sessionCleared",
            Completion::CatalogFetched(_) => "catalogFetched",
            Completion::FavoritesRestored(_) => "favoritesRestored",
        }
    }
}
