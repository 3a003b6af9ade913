//! # Application Errors
//!
//! Error types for the application layer.
//!
//! These wrap feed, parse, store, and domain failures with the context of
//! the use case that hit them. An ingestion run aborts on the first error
//! of any class; read-model services surface them per request.
//!
//! # Error Hierarchy
//!
//! ```text
//! ApplicationError
//! ├── Domain(DomainError)     - Invalid dates and identifiers
//! ├── Feed(FeedError)         - Upstream feed unreachable or unusable
//! ├── Parse(ParseError)       - Feed payload could not be decoded
//! ├── Store(StoreError)       - Graph store query or persist failure
//! ├── Validation(String)      - Request validation failures
//! ├── NotFound                - Resource not found
//! ├── PipelineFailed          - An ingestion task died before reporting
//! └── Internal(String)        - Everything else
//! ```
//!
//! # Examples
//!
//! ```
//! use restaurant_sync::application::error::ApplicationError;
//!
//! let err = ApplicationError::validation("page_size must be positive");
//! assert!(err.is_validation());
//!
//! let err = ApplicationError::not_found("buyer", "ab12");
//! assert!(err.is_not_found());
//! ```

use thiserror::Error;

use crate::domain::errors::DomainError;
use crate::domain::value_objects::EntityKind;
use crate::infrastructure::feeds::{FeedError, ParseError};
use crate::infrastructure::store::StoreError;

/// Application layer error.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Domain validation failure.
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),

    /// Upstream feed failure.
    #[error("feed error: {0}")]
    Feed(#[from] FeedError),

    /// Feed payload could not be parsed.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// Graph store failure.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Request validation failed.
    #[error("validation error: {0}")]
    Validation(String),

    /// Resource not found.
    #[error("not found: {resource_type} with id {id}")]
    NotFound {
        /// Type of resource.
        resource_type: String,
        /// Resource identifier.
        id: String,
    },

    /// An ingestion pipeline task died before reporting a result.
    #[error("{kind} pipeline failed: {message}")]
    PipelineFailed {
        /// Record kind the task was handling.
        kind: EntityKind,
        /// Failure detail.
        message: String,
    },

    /// Internal error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApplicationError {
    /// Creates a validation error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Creates a not found error.
    #[must_use]
    pub fn not_found(resource_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource_type: resource_type.into(),
            id: id.into(),
        }
    }

    /// Creates a pipeline failure error.
    #[must_use]
    pub fn pipeline_failed(kind: EntityKind, message: impl Into<String>) -> Self {
        Self::PipelineFailed {
            kind,
            message: message.into(),
        }
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Returns true if retrying the whole operation could succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Feed(e) => e.is_retryable(),
            Self::Store(StoreError::Connection(_)) => true,
            _ => false,
        }
    }

    /// Returns true if this is a not found error.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns true if this is a validation error.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

/// Result type for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
