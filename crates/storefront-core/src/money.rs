//! # Money Module
//!
//! Provides the `Price` type for catalog prices.
//!
//! ## Why Integer Cents?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Where Price Comes From                               │
//! │                                                                         │
//! │  Gateway JSON  {"price": 19.99}                                         │
//! │       │                                                                 │
//! │       ▼  TryFrom<f64>: reject negative / NaN, round to nearest cent     │
//! │  Price(1999)                                                            │
//! │       │                                                                 │
//! │       ├──► Display "$19.99" (product card, details screen)              │
//! │       │                                                                 │
//! │       └──► Into<f64> 19.99 when favorites are persisted as JSON         │
//! │                                                                         │
//! │  The wire keeps decimals; memory keeps integers. Equality and hashing   │
//! │  therefore never depend on float representation.                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::CoreError;

/// A non-negative price in cents.
///
/// Serialized as a JSON decimal number (`19.99`), matching the catalog payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Price(i64);

impl Price {
    /// Creates a price from cents.
    ///
    /// ## Example
    /// ```rust
    /// use storefront_core::money::Price;
    ///
    /// let price = Price::from_cents(1999).unwrap();
    /// assert_eq!(price.to_string(), "$19.99");
    /// ```
    pub fn from_cents(cents: i64) -> Result<Self, CoreError> {
        if cents < 0 {
            return Err(CoreError::InvalidPrice(format!("{} cents is negative", cents)));
        }
        Ok(Price(cents))
    }

    /// Creates a price from a decimal amount, rounding to the nearest cent.
    ///
    /// Halves round away from zero (`0.125` becomes 13 cents).
    pub fn from_decimal(amount: f64) -> Result<Self, CoreError> {
        if !amount.is_finite() {
            return Err(CoreError::InvalidPrice(format!("{} is not finite", amount)));
        }
        if amount < 0.0 {
            return Err(CoreError::InvalidPrice(format!("{} is negative", amount)));
        }
        Ok(Price((amount * 100.0).round() as i64))
    }

    /// Zero price.
    #[inline]
    pub const fn zero() -> Self {
        Price(0)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the value as a decimal amount (for JSON and display math only).
    #[inline]
    pub fn as_decimal(&self) -> f64 {
        self.0 as f64 / 100.0
    }
}

impl TryFrom<f64> for Price {
    type Error = CoreError;

    fn try_from(amount: f64) -> Result<Self, Self::Error> {
        Price::from_decimal(amount)
    }
}

impl From<Price> for f64 {
    fn from(price: Price) -> Self {
        price.as_decimal()
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}.{:02}", self.0 / 100, self.0 % 100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_decimal_rounds_to_cents() {
        assert_eq!(Price::from_decimal(19.99).unwrap().cents(), 1999);
        assert_eq!(Price::from_decimal(9.99).unwrap().cents(), 999);
        assert_eq!(Price::from_decimal(0.125).unwrap().cents(), 13);
        assert_eq!(Price::from_decimal(0.0).unwrap(), Price::zero());
    }

    #[test]
    fn test_rejects_negative_and_non_finite() {
        assert!(Price::from_decimal(-0.01).is_err());
        assert!(Price::from_decimal(f64::NAN).is_err());
        assert!(Price::from_decimal(f64::INFINITY).is_err());
        assert!(Price::from_cents(-1).is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(Price::from_cents(1999).unwrap().to_string(), "$19.99");
        assert_eq!(Price::from_cents(5).unwrap().to_string(), "$0.05");
        assert_eq!(Price::from_cents(10900).unwrap().to_string(), "$109.00");
    }

    #[test]
    fn test_json_is_decimal_number() {
        let price = Price::from_cents(1999).unwrap();
        assert_eq!(serde_json::to_string(&price).unwrap(), "19.99");

        let parsed: Price = serde_json::from_str("109.95").unwrap();
        assert_eq!(parsed.cents(), 10995);

        // Integer JSON numbers are valid prices too
        let whole: Price = serde_json::from_str("7").unwrap();
        assert_eq!(whole.cents(), 700);

        assert!(serde_json::from_str::<Price>("-3.5").is_err());
    }
}
