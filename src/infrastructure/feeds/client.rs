//! # Feed Client
//!
//! HTTP access to the three record feeds.
//!
//! Each feed lives under one base URL at a path named after the record kind,
//! and takes the load date as a Unix-seconds `date` query parameter:
//!
//! ```text
//! GET <base>/buyers?date=1597622400
//! GET <base>/products?date=1597622400
//! GET <base>/transactions?date=1597622400
//! ```
//!
//! Bodies are returned as raw text. Only the buyer feed happens to be JSON;
//! the others use bespoke formats handled by the parsers in this module's
//! siblings.

use crate::domain::value_objects::{EntityKind, LoadDate};
use crate::infrastructure::feeds::error::{FeedError, FeedResult};
use async_trait::async_trait;
use reqwest::Client;
use std::fmt;
use std::time::Duration;

/// Port for fetching raw feed bodies.
///
/// The ingestion pipelines depend on this trait rather than on a concrete
/// client, so tests can count calls and serve canned bodies.
#[async_trait]
pub trait FeedSource: Send + Sync + fmt::Debug {
    /// Fetches the raw feed body for one record kind on one date.
    ///
    /// # Errors
    ///
    /// Returns a [`FeedError`] on transport failure or non-success status.
    async fn fetch(&self, kind: EntityKind, date: &LoadDate) -> FeedResult<String>;
}

/// Reqwest-backed [`FeedSource`].
#[derive(Debug, Clone)]
pub struct FeedClient {
    client: Client,
    base_url: String,
    timeout_ms: u64,
}

impl FeedClient {
    /// Creates a feed client for the given base URL.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Feed root; kind paths are appended to it.
    /// * `timeout_ms` - Per-request timeout in milliseconds.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::ClientBuild`] if the HTTP client cannot be
    /// constructed.
    pub fn new(base_url: impl Into<String>, timeout_ms: u64) -> FeedResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .map_err(|e| FeedError::client_build(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            timeout_ms,
        })
    }

    /// Returns the configured per-request timeout in milliseconds.
    #[inline]
    #[must_use]
    pub fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }

    fn feed_url(&self, kind: EntityKind) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), kind.feed_path())
    }

    fn map_reqwest_error(&self, error: reqwest::Error) -> FeedError {
        if error.is_timeout() {
            FeedError::timeout_with_duration("request timed out", self.timeout_ms)
        } else if error.is_connect() {
            FeedError::connection(format!("connection failed: {error}"))
        } else {
            FeedError::connection(format!("HTTP request failed: {error}"))
        }
    }
}

#[async_trait]
impl FeedSource for FeedClient {
    async fn fetch(&self, kind: EntityKind, date: &LoadDate) -> FeedResult<String> {
        let url = self.feed_url(kind);
        let response = self
            .client
            .get(&url)
            .query(&[("date", date.unix_seconds())])
            .send()
            .await
            .map_err(|e| self.map_reqwest_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FeedError::status(status.as_u16(), body));
        }

        response
            .text()
            .await
            .map_err(|e| FeedError::body(format!("failed to read response body: {e}")))
    }
}
