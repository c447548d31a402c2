//! # Favorites Slice
//!
//! Products the user has favorited, unique by id, in the order they were added.
//!
//! The persisted form is a plain JSON array of products in the catalog
//! payload shape. See [`FavoritesState::to_json`].

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreResult;
use crate::types::Product;

/// Favorites slice of the composite state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct FavoritesState {
    items: Vec<Product>,
}

impl FavoritesState {
    /// Builds a set from products, dropping later duplicates of an id.
    pub fn from_products(items: Vec<Product>) -> Self {
        let mut state = FavoritesState::default();
        state.replace_all(items);
        state
    }

    /// Adds the product if its id is absent, removes it otherwise.
    ///
    /// Returns `true` when the product is favorited afterwards.
    pub fn toggle(&mut self, product: Product) -> bool {
        match self.position(product.id) {
            Some(index) => {
                self.items.remove(index);
                false
            }
            None => {
                self.items.push(product);
                true
            }
        }
    }

    /// Removes the product with `id`. Returns `true` if something was removed.
    pub fn remove(&mut self, id: i64) -> bool {
        match self.position(id) {
            Some(index) => {
                self.items.remove(index);
                true
            }
            None => false,
        }
    }

    /// Replaces the whole set, keeping the first occurrence of each id.
    pub fn replace_all(&mut self, items: Vec<Product>) {
        self.items.clear();
        for product in items {
            if !self.contains(product.id) {
                self.items.push(product);
            }
        }
    }

    pub fn contains(&self, id: i64) -> bool {
        self.position(id).is_some()
    }

    pub fn items(&self) -> &[Product] {
        &self.items
    }

    pub fn ids(&self) -> Vec<i64> {
        self.items.iter().map(|p| p.id).collect()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Serializes the set as the JSON array stored under the favorites key.
    pub fn to_json(&self) -> CoreResult<String> {
        Ok(serde_json::to_string(&self.items)?)
    }

    /// Parses a persisted JSON array.
    pub fn from_json(json: &str) -> CoreResult<Self> {
        let items: Vec<Product> = serde_json::from_str(json)?;
        Ok(FavoritesState::from_products(items))
    }

    fn position(&self, id: i64) -> Option<usize> {
        self.items.iter().position(|p| p.id == id)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
