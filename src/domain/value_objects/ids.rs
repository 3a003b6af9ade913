//! # Identifier Types
//!
//! String-based identifiers for the three record kinds.
//!
//! Feed identifiers are opaque: the engine never interprets their contents,
//! and equality is exact string equality. The newtypes exist so a buyer id
//! cannot be passed where a product id is expected.
//!
//! # Examples
//!
//! ```
//! use restaurant_sync::domain::value_objects::ids::{BuyerId, ProductId};
//!
//! let buyer = BuyerId::new("ff0d1362");
//! let product = ProductId::new("a1b2c3d4");
//!
//! assert_eq!(buyer.as_str(), "ff0d1362");
//! assert_ne!(buyer.as_str(), product.as_str());
//! ```

use crate::domain::errors::{DomainError, DomainResult};
use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! string_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates an identifier from a raw string.
            #[must_use]
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Returns the identifier as a string slice.
            #[inline]
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consumes the identifier, returning the inner string.
            #[inline]
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_owned())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

string_id!(
    /// Identifies a buyer.
    BuyerId
);

string_id!(
    /// Identifies a product.
    ProductId
);

string_id!(
    /// Identifies a transaction.
    TransactionId
);

impl BuyerId {
    /// Maximum length accepted for a buyer id request parameter.
    pub const MAX_PARAM_LEN: usize = 8;

    /// Validates an externally supplied buyer id parameter.
    ///
    /// Feed-sourced ids are short hexadecimal tokens; request parameters are
    /// held to the same shape (1 to 8 alphanumeric characters) before they
    /// reach the store.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidBuyerId`] when the parameter is empty,
    /// too long, or contains non-alphanumeric characters.
    ///
    /// # Examples
    ///
    /// ```
    /// use restaurant_sync::domain::value_objects::ids::BuyerId;
    ///
    /// assert!(BuyerId::parse_param("ff0d1362").is_ok());
    /// assert!(BuyerId::parse_param("").is_err());
    /// assert!(BuyerId::parse_param("../etc").is_err());
    /// ```
    pub fn parse_param(value: &str) -> DomainResult<Self> {
        if value.is_empty() {
            return Err(DomainError::invalid_buyer_id(value, "empty"));
        }
        if value.len() > Self::MAX_PARAM_LEN {
            return Err(DomainError::invalid_buyer_id(value, "longer than 8 characters"));
        }
        if !value.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(DomainError::invalid_buyer_id(value, "not alphanumeric"));
        }
        Ok(Self(value.to_owned()))
    }
}
