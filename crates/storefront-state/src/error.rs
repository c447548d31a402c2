//! # State Error Types
//!
//! ## Error Categories
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       State Error Categories                            │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │    Gateway      │  │  Orchestrator   │  │     Configuration       │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  Rejected       │  │  ChannelClosed  │  │  ConfigLoadFailed       │ │
//! │  │  Unavailable    │  │  ShuttingDown   │  │  ConfigSaveFailed       │ │
//! │  │                 │  │  Store          │  │  InvalidConfig          │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  GatewayError becomes a `lastError` string in state.                    │
//! │  StateError is returned to callers of the handle and of launch().       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use storefront_store::StoreError;

/// Result type alias for state engine operations.
pub type StateResult<T> = Result<T, StateError>;

// =============================================================================
// State Error
// =============================================================================

/// Failures returned by the orchestrator handle, configuration and launch.
#[derive(Debug, Error)]
pub enum StateError {
    /// The orchestrator's mailbox is closed.
    #[error("Channel error: {0}")]
    ChannelClosed(String),

    /// The orchestrator stopped before the intent settled.
    #[error("Orchestrator is shutting down")]
    ShuttingDown,

    /// Opening the durable store failed.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Failed to load config file.
    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    /// Failed to save config file.
    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),

    /// Configuration values are out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl From<std::io::Error> for StateError {
    fn from(err: std::io::Error) -> Self {
        StateError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for StateError {
    fn from(err: toml::de::Error) -> Self {
        StateError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for StateError {
    fn from(err: toml::ser::Error) -> Self {
        StateError::ConfigSaveFailed(err.to_string())
    }
}

impl StateError {
    /// Returns true if this error indicates a configuration problem.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            StateError::InvalidConfig(_) | StateError::ConfigLoadFailed(_) | StateError::ConfigSaveFailed(_)
        )
    }
}

// =============================================================================
// Gateway Error
// =============================================================================

/// Failure reported by the remote gateway.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// The service answered and refused. `message` is its explanation, if any.
    #[error("Rejected: {}", .message.as_deref().unwrap_or("no message"))]
    Rejected { message: Option<String> },

    /// The service could not be reached or answered garbage.
    #[error("Gateway unavailable: {0}")]
    Unavailable(String),
}

impl GatewayError {
    pub fn rejected(message: impl Into<String>) -> Self {
        GatewayError::Rejected {
            message: Some(message.into()),
        }
    }

    /// Text to surface in `lastError`.
    ///
    /// A rejection that carries a non-empty message surfaces that message.
    /// Everything else surfaces `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            GatewayError::Rejected { message: Some(m) } if !m.trim().is_empty() => m.clone(),
            _ => fallback.to_string(),
        }
    }
}
