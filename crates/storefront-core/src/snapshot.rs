//! Composite snapshot handed to every consumer.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::catalog::CatalogState;
use crate::favorites::FavoritesState;
use crate::session::Session;

/// All three slices at one point in time.
///
/// Consumers receive clones. Mutation only happens inside the orchestrator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CompositeState {
    pub session: Session,
    pub catalog: CatalogState,
    pub favorites: FavoritesState,
}
