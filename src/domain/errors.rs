//! # Domain Errors
//!
//! Validation errors raised by domain types.
//!
//! These are the errors a caller can provoke with bad input before any I/O
//! happens: malformed load dates and malformed buyer id parameters. Feed,
//! store, and pipeline failures live in their own layers and wrap into
//! [`crate::application::error::ApplicationError`].

use thiserror::Error;

/// Result alias for domain validation.
pub type DomainResult<T> = Result<T, DomainError>;

/// Errors raised by domain type construction and validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// A load date string did not match the `YYYY-MM-DD` layout.
    #[error("invalid load date {value:?}: {reason}")]
    DateFormat {
        /// The rejected input.
        value: String,
        /// Why parsing failed.
        reason: String,
    },

    /// A buyer id request parameter failed validation.
    #[error("invalid buyer id {value:?}: {reason}")]
    InvalidBuyerId {
        /// The rejected input.
        value: String,
        /// Why validation failed.
        reason: String,
    },
}

impl DomainError {
    /// Creates a date format error.
    #[must_use]
    pub fn date_format(value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::DateFormat {
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Creates a buyer id validation error.
    #[must_use]
    pub fn invalid_buyer_id(value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidBuyerId {
            value: value.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn date_format_display() {
        let err = DomainError::date_format("2020-13-99", "out of range");
        assert_eq!(
            err.to_string(),
            "invalid load date \"2020-13-99\": out of range"
        );
    }

    #[test]
    fn invalid_buyer_id_display() {
        let err = DomainError::invalid_buyer_id("x!", "not alphanumeric");
        assert!(err.to_string().contains("x!"));
    }
}
