//! # Domain Types
//!
//! Values that cross the gateway boundary and the durable store.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │   AuthPayload   │   │   UserProfile   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (i64)       │   │  accessToken    │──►│  id             │       │
//! │  │  title          │   │  id, username   │   │  username       │       │
//! │  │  price (cents)  │   │  email          │   │  email          │       │
//! │  │  category       │   │  firstName      │   │  first/last     │       │
//! │  │  image          │   │  lastName       │   │  avatarUrl      │       │
//! │  │  rating?        │   │  image          │   └─────────────────┘       │
//! │  └────────┬────────┘   └─────────────────┘                              │
//! │           │                                                             │
//! │  ┌────────▼────────┐                                                    │
//! │  │     Rating      │                                                    │
//! │  │  rate (0..=5)   │                                                    │
//! │  │  count          │                                                    │
//! │  └─────────────────┘                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! Products are identified by `id` alone. Two products with the same id are the
//! same product for favorites purposes even if their other fields differ.

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::money::Price;

// =============================================================================
// Rating
// =============================================================================

/// Aggregate customer rating attached to a product.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Rating {
    /// Average score, 0 to 5.
    pub rate: f64,
    /// Number of ratings behind the average.
    pub count: u32,
}

// =============================================================================
// Product
// =============================================================================

/// A catalog product.
///
/// The JSON shape is the catalog payload shape, and persisted favorites use it
/// unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Product {
    /// Stable identifier, unique across catalog fetches.
    #[ts(type = "number")]
    pub id: i64,

    pub title: String,

    #[ts(type = "number")]
    pub price: Price,

    pub category: String,

    #[serde(default)]
    pub description: String,

    /// Image location (`image` on the wire).
    #[serde(rename = "image", default)]
    pub image_url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub rating: Option<Rating>,
}

impl Product {
    /// Builds a product with the fields the catalog screens need.
    pub fn new(id: i64, title: impl Into<String>, category: impl Into<String>, price: Price) -> Self {
        Product {
            id,
            title: title.into(),
            price,
            category: category.into(),
            description: String::new(),
            image_url: String::new(),
            rating: None,
        }
    }
}

// =============================================================================
// User Profile
// =============================================================================

/// Profile of the authenticated user.
///
/// Only known after a live authentication. A session restored from the durable
/// store has a token but no profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[ts(type = "number")]
    pub id: i64,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub avatar_url: String,
}

impl UserProfile {
    /// "First Last", or the username when both names are blank.
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name.trim(), self.last_name.trim());
        let full = full.trim();
        if full.is_empty() {
            self.username.clone()
        } else {
            full.to_string()
        }
    }
}

// =============================================================================
// Auth Payload
// =============================================================================

/// Successful authentication response from the gateway.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthPayload {
    pub access_token: String,
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub image: String,
}

impl AuthPayload {
    /// Profile portion of the payload.
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id,
            username: self.username.clone(),
            email: self.email.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            avatar_url: self.image.clone(),
        }
    }
}

// Tokens stay out of logs.
impl fmt::Debug for AuthPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthPayload")
            .field("access_token", &"<redacted>")
            .field("id", &self.id)
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_from_catalog_json() {
        let json = r#"{
            "id": 1,
            "title": "Fjallraven Backpack",
            "price": 109.95,
            "description": "Your perfect pack",
            "category": "men's clothing",
            "image": "https://example.test/81fPKd.jpg",
            "rating": { "rate": 3.9, "count": 120 }
        }"#;

        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.id, 1);
        assert_eq!(product.price.cents(), 10995);
        assert_eq!(product.image_url, "https://example.test/81fPKd.jpg");
        assert_eq!(product.rating.unwrap().count, 120);
    }

    #[test]
    fn test_product_without_rating() {
        let json = r#"{"id":2,"title":"Mug","price":9.99,"category":"home"}"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert!(product.rating.is_none());
        assert_eq!(product.description, "");

        let back = serde_json::to_value(&product).unwrap();
        assert!(back.get("rating").is_none());
        assert_eq!(back["image"], "");
        assert_eq!(back["price"], 9.99);
    }

    #[test]
    fn test_auth_payload_profile() {
        let json = r#"{
            "accessToken": "tok123",
            "id": 1,
            "username": "emilys",
            "email": "emily@example.test",
            "firstName": "Emily",
            "lastName": "Johnson",
            "image": "https://example.test/emilys.png"
        }"#;

        let payload: AuthPayload = serde_json::from_str(json).unwrap();
        let profile = payload.profile();
        assert_eq!(profile.username, "emilys");
        assert_eq!(profile.avatar_url, "https://example.test/emilys.png");
        assert_eq!(profile.display_name(), "Emily Johnson");
    }

    #[test]
    fn test_auth_payload_debug_hides_token() {
        let payload = AuthPayload {
            access_token: "secret-token".to_string(),
            id: 1,
            username: "emilys".to_string(),
            email: String::new(),
            first_name: String::new(),
            last_name: String::new(),
            image: String::new(),
        };
        let printed = format!("{:?}", payload);
        assert!(!printed.contains("secret-token"));
        assert!(printed.contains("emilys"));
    }

    #[test]
    fn test_display_name_falls_back_to_username() {
        let profile = UserProfile {
            id: 7,
            username: "michaelw".to_string(),
            email: String::new(),
            first_name: " ".to_string(),
            last_name: String::new(),
            avatar_url: String::new(),
        };
        assert_eq!(profile.display_name(), "michaelw");
    }
}
