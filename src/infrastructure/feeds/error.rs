//! # Feed Errors
//!
//! Error types for feed fetching and parsing.
//!
//! Fetching errors ([`FeedError`]) cover the transport: timeouts, refused
//! connections, and non-success statuses. Parsing errors ([`ParseError`])
//! cover only the batch-aborting malformations — a record-level glitch is
//! skipped during parsing and never becomes an error value.
//!
//! # Examples
//!
//! ```
//! use restaurant_sync::infrastructure::feeds::error::FeedError;
//!
//! let error = FeedError::timeout("request timed out after 5000ms");
//! assert!(error.is_retryable());
//!
//! let error = FeedError::status(404, "no feed for that date");
//! assert!(!error.is_retryable());
//! ```

use thiserror::Error;

/// Error type for feed fetch operations.
#[derive(Debug, Clone, Error)]
pub enum FeedError {
    /// Request timed out.
    #[error("feed timeout: {message}")]
    Timeout {
        /// Error message.
        message: String,
        /// Timeout duration in milliseconds.
        timeout_ms: Option<u64>,
    },

    /// Network or connection error.
    #[error("feed connection error: {message}")]
    Connection {
        /// Error message.
        message: String,
    },

    /// The feed answered with a non-success status.
    #[error("feed status {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body or reason.
        message: String,
    },

    /// The response body could not be read.
    #[error("feed body error: {message}")]
    Body {
        /// Error message.
        message: String,
    },

    /// The HTTP client could not be constructed.
    #[error("feed client error: {message}")]
    ClientBuild {
        /// Error message.
        message: String,
    },
}

impl FeedError {
    /// Creates a timeout error.
    #[must_use]
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Timeout {
            message: message.into(),
            timeout_ms: None,
        }
    }

    /// Creates a timeout error with the configured duration.
    #[must_use]
    pub fn timeout_with_duration(message: impl Into<String>, timeout_ms: u64) -> Self {
        Self::Timeout {
            message: message.into(),
            timeout_ms: Some(timeout_ms),
        }
    }

    /// Creates a connection error.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Creates a status error.
    #[must_use]
    pub fn status(status: u16, message: impl Into<String>) -> Self {
        Self::Status {
            status,
            message: message.into(),
        }
    }

    /// Creates a body read error.
    #[must_use]
    pub fn body(message: impl Into<String>) -> Self {
        Self::Body {
            message: message.into(),
        }
    }

    /// Creates a client construction error.
    #[must_use]
    pub fn client_build(message: impl Into<String>) -> Self {
        Self::ClientBuild {
            message: message.into(),
        }
    }

    /// Returns true if this error is transient and may succeed on retry.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Timeout { .. } | Self::Connection { .. } => true,
            Self::Status { status, .. } => *status >= 500,
            Self::Body { .. } | Self::ClientBuild { .. } => false,
        }
    }
}

/// Result type for feed fetch operations.
pub type FeedResult<T> = Result<T, FeedError>;

/// Batch-aborting parse failures.
///
/// Both variants reject an entire feed batch: a bad price poisons the whole
/// product list, and an unreadable buyer body has no salvageable records.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A product price failed to decode as an exact decimal.
    #[error("unparseable product price {value:?}: {message}")]
    Price {
        /// The offending price text.
        value: String,
        /// Decoder failure detail.
        message: String,
    },

    /// The buyer feed body was not the expected JSON array.
    #[error("unparseable buyer feed: {message}")]
    BuyerJson {
        /// Decoder failure detail.
        message: String,
    },
}

impl ParseError {
    /// Creates a price decode error.
    #[must_use]
    pub fn price(value: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Price {
            value: value.into(),
            message: message.into(),
        }
    }

    /// Creates a buyer JSON decode error.
    #[must_use]
    pub fn buyer_json(message: impl Into<String>) -> Self {
        Self::BuyerJson {
            message: message.into(),
        }
    }
}

/// Result type for feed parsing.
pub type ParseResult<T> = Result<T, ParseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_is_retryable() {
        assert!(FeedError::timeout("test").is_retryable());
    }

    #[test]
    fn connection_is_retryable() {
        assert!(FeedError::connection("test").is_retryable());
    }

    #[test]
    fn server_status_is_retryable() {
        assert!(FeedError::status(503, "unavailable").is_retryable());
    }

    #[test]
    fn client_status_is_not_retryable() {
        assert!(!FeedError::status(404, "missing").is_retryable());
    }

    #[test]
    fn body_is_not_retryable() {
        assert!(!FeedError::body("truncated").is_retryable());
    }

    #[test]
    fn display_formats() {
        let error = FeedError::status(502, "bad gateway");
        let display = error.to_string();
        assert!(display.contains("502"));
        assert!(display.contains("bad gateway"));
    }

    #[test]
    fn price_error_carries_value() {
        let error = ParseError::price("abc", "invalid digit");
        assert!(error.to_string().contains("abc"));
    }

    #[test]
    fn buyer_json_display() {
        let error = ParseError::buyer_json("expected array");
        assert!(error.to_string().contains("expected array"));
    }
}
