//! # Catalog Slice
//!
//! The fetched product list, the active query and the derived filtered view.
//!
//! ## Derived View
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   items (server order)                                                  │
//! │       │                                                                 │
//! │       ▼  category filter                                                │
//! │   selected_category is "" or "All"?  ── yes ──► keep everything         │
//! │       │ no                                                              │
//! │       ▼                                                                 │
//! │   keep category.to_lowercase() == selected.to_lowercase()               │
//! │       │                                                                 │
//! │       ▼  text filter                                                    │
//! │   query = search_text.trim().to_lowercase()                             │
//! │   query empty? ── yes ──► keep everything                               │
//! │       │ no                                                              │
//! │       ▼                                                                 │
//! │   keep title.to_lowercase().contains(query)                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │   filtered_items (same relative order as items)                         │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `filtered_items` is only ever written by [`CatalogState::refresh`]. Every
//! mutator that touches `items`, `search_text` or `selected_category` calls it.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::types::Product;
use crate::ALL_CATEGORIES;

// =============================================================================
// Filter Algorithm
// =============================================================================

/// Applies the category and text filters to `items`, preserving order.
///
/// ## Example
/// ```rust
/// use storefront_core::catalog::filter_products;
/// use storefront_core::{Price, Product};
///
/// let items = vec![
///     Product::new(1, "Shirt", "clothing", Price::from_cents(1999).unwrap()),
///     Product::new(2, "Mug", "home", Price::from_cents(999).unwrap()),
/// ];
///
/// let shirts = filter_products(&items, "", "Clothing");
/// assert_eq!(shirts.len(), 1);
///
/// let mugs = filter_products(&items, "  MU ", "All");
/// assert_eq!(mugs[0].id, 2);
/// ```
pub fn filter_products(items: &[Product], search_text: &str, selected_category: &str) -> Vec<Product> {
    let category = (!selected_category.is_empty() && selected_category != ALL_CATEGORIES)
        .then(|| selected_category.to_lowercase());
    let query = search_text.trim().to_lowercase();

    items
        .iter()
        .filter(|p| match &category {
            Some(category) => p.category.to_lowercase() == *category,
            None => true,
        })
        .filter(|p| query.is_empty() || p.title.to_lowercase().contains(&query))
        .cloned()
        .collect()
}

// =============================================================================
// Catalog State
// =============================================================================

/// Catalog slice of the composite state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CatalogState {
    pub items: Vec<Product>,
    pub filtered_items: Vec<Product>,
    pub pending: bool,
    pub last_error: Option<String>,
    /// Raw text as typed. Only the filter trims it.
    pub search_text: String,
    pub selected_category: String,
}

impl Default for CatalogState {
    fn default() -> Self {
        CatalogState {
            items: Vec::new(),
            filtered_items: Vec::new(),
            pending: false,
            last_error: None,
            search_text: String::new(),
            selected_category: ALL_CATEGORIES.to_string(),
        }
    }
}

impl CatalogState {
    pub fn begin_fetch(&mut self) {
        self.pending = true;
        self.last_error = None;
    }

    /// Replaces the item list wholesale with a fetch result.
    pub fn complete_fetch(&mut self, items: Vec<Product>) {
        self.items = items;
        self.pending = false;
        self.refresh();
    }

    /// Records a fetch failure. Stale items stay visible.
    pub fn fail_fetch(&mut self, message: impl Into<String>) {
        self.last_error = Some(message.into());
        self.pending = false;
    }

    pub fn set_search_text(&mut self, text: impl Into<String>) {
        self.search_text = text.into();
        self.refresh();
    }

    pub fn set_selected_category(&mut self, category: impl Into<String>) {
        self.selected_category = category.into();
        self.refresh();
    }

    /// `"All"` followed by each distinct category in first-seen order.
    pub fn categories(&self) -> Vec<String> {
        let mut categories = vec![ALL_CATEGORIES.to_string()];
        for product in &self.items {
            if !categories[1..].contains(&product.category) {
                categories.push(product.category.clone());
            }
        }
        categories
    }

    /// True when a fetch failed and there is nothing stale to show instead.
    pub fn is_blocking_error(&self) -> bool {
        self.last_error.is_some() && self.items.is_empty()
    }

    /// Recomputes `filtered_items` from the current items and query.
    pub fn refresh(&mut self) {
        self.filtered_items = filter_products(&self.items, &self.search_text, &self.selected_category);
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
