//! # Error Types
//!
//! Domain-specific error types for storefront-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  storefront-core errors (this file)                                    │
//! │  ├── CoreError        - Domain errors (bad price, bad payload)         │
//! │  └── ValidationError  - Login form failures (caller-side)              │
//! │                                                                         │
//! │  storefront-store errors (separate crate)                              │
//! │  └── StoreError       - Durable store failures                         │
//! │                                                                         │
//! │  storefront-state errors (separate crate)                              │
//! │  ├── GatewayError     - Remote rejections (surfaced as lastError)      │
//! │  └── StateError       - Orchestrator / config failures                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Only authentication and fetch failures ever reach user-visible state.
//! Validation happens before an intent is dispatched.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core domain errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A price was negative, NaN or infinite.
    #[error("Invalid price: {0}")]
    InvalidPrice(String),

    /// Persisted or received JSON did not match the expected shape.
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        CoreError::MalformedPayload(err.to_string())
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors raised by the login form checks.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too short.
    #[error("{field} must be at least {min} characters")]
    TooShort { field: String, min: usize },
}

impl ValidationError {
    /// Name of the form field this error belongs to.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::Required { field } | ValidationError::TooShort { field, .. } => field,
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;
