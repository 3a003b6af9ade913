//! # Product Entity
//!
//! A catalog product record synchronized from the product feed.
//!
//! Prices are exact decimals. The feed serves them as plain text and the
//! parser rejects the whole batch when one fails to decode, so a constructed
//! `Product` always carries a valid price.
//!
//! # Examples
//!
//! ```
//! use restaurant_sync::domain::entities::product::Product;
//! use restaurant_sync::domain::value_objects::{LoadDate, ProductId};
//!
//! let date = LoadDate::parse("2020-08-17").unwrap();
//! let price = "12.50".parse().unwrap();
//! let product = Product::new(ProductId::new("a1b2c3d4"), "Pizza Grande", price, date);
//!
//! assert_eq!(product.name(), "Pizza Grande");
//! assert_eq!(product.price().to_string(), "12.50");
//! ```

use crate::domain::value_objects::{LoadDate, ProductId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A catalog product known to the store.
///
/// Serialized shape: `ProductId`, `Name`, `Price`, `Date` (PascalCase, price
/// rendered as a decimal string).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Product {
    product_id: ProductId,
    name: String,
    price: Decimal,
    date: LoadDate,
}

impl Product {
    /// Creates a product record.
    #[must_use]
    pub fn new(product_id: ProductId, name: impl Into<String>, price: Decimal, date: LoadDate) -> Self {
        Self {
            product_id,
            name: name.into(),
            price,
            date,
        }
    }

    // ========== Accessors ==========

    /// Returns the product id.
    #[inline]
    #[must_use]
    pub fn product_id(&self) -> &ProductId {
        &self.product_id
    }

    /// Returns the product name.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the exact decimal price.
    #[inline]
    #[must_use]
    pub const fn price(&self) -> Decimal {
        self.price
    }

    /// Returns the load date this record was ingested under.
    #[inline]
    #[must_use]
    pub const fn date(&self) -> LoadDate {
        self.date
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Product {} ({} @ {})", self.product_id, self.name, self.price)
    }
}
