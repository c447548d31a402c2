//! # Remote Gateway
//!
//! The two remote operations the client depends on. Transport is the
//! implementor's business: an HTTP client in the app, a stub in tests.

use async_trait::async_trait;

use storefront_core::{AuthPayload, Product};

use crate::error::GatewayError;

/// Remote authentication and catalog service.
///
/// Each call is a single attempt. Retry policy, if any, belongs to the
/// implementation.
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Exchanges credentials for a session token and profile.
    async fn authenticate(&self, username: &str, password: &str) -> Result<AuthPayload, GatewayError>;

    /// Returns the full catalog in server order.
    async fn list_catalog(&self) -> Result<Vec<Product>, GatewayError>;
}
