//! # Catalog Manager
//!
//! Single-attempt catalog fetch. The query setters are synchronous and live
//! on [`CatalogState`](storefront_core::CatalogState); only the fetch needs
//! a manager.

use std::sync::Arc;
use std::time::Instant;

use tracing::{info, warn};

use storefront_core::FETCH_FAILED_MESSAGE;

use crate::gateway::Gateway;
use crate::intent::Completion;

#[derive(Clone)]
pub struct CatalogManager {
    gateway: Arc<dyn Gateway>,
}

impl CatalogManager {
    pub fn new(gateway: Arc<dyn Gateway>) -> Self {
        CatalogManager { gateway }
    }

    pub async fn fetch(&self) -> Completion {
        let started = Instant::now();
        let result = self.gateway.list_catalog().await;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        match result {
            Ok(items) => {
                info!(count = items.len(), elapsed_ms, "Catalog loaded");
                Completion::CatalogFetched(Ok(items))
            }
            Err(e) => {
                warn!(error = %e, elapsed_ms, "Catalog fetch failed");
                Completion::CatalogFetched(Err(e.user_message(FETCH_FAILED_MESSAGE)))
            }
        }
    }
}
