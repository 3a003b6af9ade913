//! # Store Errors
//!
//! Error types for graph-store operations.
//!
//! Two failure classes matter to callers: query failures (reads, including
//! the date-gate probe and dedup id lookups) and persist failures (staging
//! mutations, committing). Both abort an ingestion run; the coordinator
//! never commits around either.

use thiserror::Error;

/// Error type for graph-store operations.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// The store could not be reached.
    #[error("store connection error: {0}")]
    Connection(String),

    /// A read query failed or was rejected.
    #[error("store query error: {0}")]
    Query(String),

    /// A response body did not decode into the expected shape.
    #[error("store decode error: {0}")]
    Decode(String),

    /// A mutation was rejected while staging.
    #[error("store mutation error: {0}")]
    Mutation(String),

    /// The final commit failed; staged data was not made durable.
    #[error("store commit error: {0}")]
    Commit(String),

    /// A staged operation arrived after the transaction was closed.
    #[error("load transaction already closed ({state})")]
    TransactionClosed {
        /// Terminal state the transaction is in.
        state: &'static str,
    },
}

impl StoreError {
    /// Creates a connection error.
    #[must_use]
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Creates a query error.
    #[must_use]
    pub fn query(msg: impl Into<String>) -> Self {
        Self::Query(msg.into())
    }

    /// Creates a decode error.
    #[must_use]
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Creates a mutation error.
    #[must_use]
    pub fn mutation(msg: impl Into<String>) -> Self {
        Self::Mutation(msg.into())
    }

    /// Creates a commit error.
    #[must_use]
    pub fn commit(msg: impl Into<String>) -> Self {
        Self::Commit(msg.into())
    }

    /// Creates a transaction-closed error.
    #[must_use]
    pub const fn transaction_closed(state: &'static str) -> Self {
        Self::TransactionClosed { state }
    }

    /// Returns true for failures on the write path (stage or commit).
    #[must_use]
    pub fn is_persist_error(&self) -> bool {
        matches!(
            self,
            Self::Mutation(_) | Self::Commit(_) | Self::TransactionClosed { .. }
        )
    }

    /// Returns true for failures on the read path.
    #[must_use]
    pub fn is_query_error(&self) -> bool {
        matches!(self, Self::Query(_) | Self::Decode(_))
    }
}

/// Result type for graph-store operations.
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_path_classification() {
        assert!(StoreError::mutation("rejected").is_persist_error());
        assert!(StoreError::commit("aborted").is_persist_error());
        assert!(StoreError::transaction_closed("committed").is_persist_error());
        assert!(!StoreError::query("bad").is_persist_error());
    }

    #[test]
    fn read_path_classification() {
        assert!(StoreError::query("bad dql").is_query_error());
        assert!(StoreError::decode("shape").is_query_error());
        assert!(!StoreError::connection("refused").is_query_error());
    }

    #[test]
    fn display_formats() {
        let err = StoreError::transaction_closed("discarded");
        assert!(err.to_string().contains("discarded"));
    }
}
