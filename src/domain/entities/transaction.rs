//! # Transaction Entity
//!
//! A purchase transaction synchronized from the transaction feed.
//!
//! A transaction links a buyer, the device and IP the purchase came from,
//! and the list of product ids bought together. Co-purchase mining walks
//! these product lists to find related products.
//!
//! # Examples
//!
//! ```
//! use restaurant_sync::domain::entities::transaction::Transaction;
//! use restaurant_sync::domain::value_objects::{BuyerId, LoadDate, ProductId, TransactionId};
//!
//! let date = LoadDate::parse("2020-08-17").unwrap();
//! let txn = Transaction::new(
//!     TransactionId::new("00001246a40"),
//!     BuyerId::new("ff0d1362"),
//!     "175.107.20.193",
//!     "android",
//!     vec![ProductId::new("p1"), ProductId::new("p2")],
//!     date,
//! );
//!
//! assert_eq!(txn.products().len(), 2);
//! assert!(txn.involves_product(&ProductId::new("p1")));
//! ```

use crate::domain::value_objects::{BuyerId, LoadDate, ProductId, TransactionId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A purchase transaction known to the store.
///
/// Serialized shape: `TransactionId`, `BuyerId`, `Ip`, `Device`, `Products`,
/// `Date` (PascalCase).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Transaction {
    transaction_id: TransactionId,
    buyer_id: BuyerId,
    ip: String,
    device: String,
    products: Vec<ProductId>,
    date: LoadDate,
}

impl Transaction {
    /// Creates a transaction record.
    #[must_use]
    pub fn new(
        transaction_id: TransactionId,
        buyer_id: BuyerId,
        ip: impl Into<String>,
        device: impl Into<String>,
        products: Vec<ProductId>,
        date: LoadDate,
    ) -> Self {
        Self {
            transaction_id,
            buyer_id,
            ip: ip.into(),
            device: device.into(),
            products,
            date,
        }
    }

    // ========== Accessors ==========

    /// Returns the transaction id.
    #[inline]
    #[must_use]
    pub fn transaction_id(&self) -> &TransactionId {
        &self.transaction_id
    }

    /// Returns the purchasing buyer's id.
    #[inline]
    #[must_use]
    pub fn buyer_id(&self) -> &BuyerId {
        &self.buyer_id
    }

    /// Returns the IP address the purchase came from.
    #[inline]
    #[must_use]
    pub fn ip(&self) -> &str {
        &self.ip
    }

    /// Returns the device kind the purchase came from.
    #[inline]
    #[must_use]
    pub fn device(&self) -> &str {
        &self.device
    }

    /// Returns the product ids bought in this transaction.
    #[inline]
    #[must_use]
    pub fn products(&self) -> &[ProductId] {
        &self.products
    }

    /// Returns the load date this record was ingested under.
    #[inline]
    #[must_use]
    pub const fn date(&self) -> LoadDate {
        self.date
    }

    // ========== Queries ==========

    /// Returns true if the given product was part of this transaction.
    #[must_use]
    pub fn involves_product(&self, product_id: &ProductId) -> bool {
        self.products.contains(product_id)
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Transaction {} (buyer {}, {} products)",
            self.transaction_id,
            self.buyer_id,
            self.products.len()
        )
    }
}
