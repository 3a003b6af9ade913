//! # Dgraph Store Adapter
//!
//! [`GraphStore`] implementation backed by Dgraph's HTTP API.
//!
//! Reads go through `POST /query` with DQL bodies. Writes run inside one
//! server-side transaction: the first `POST /mutate` assigns a start
//! timestamp, later mutations reuse it, and `POST /commit` (optionally
//! with `abort=true`) closes it. The adapter tracks the timestamp and the
//! touched keys/predicates locally and serializes concurrent stagers
//! behind an async mutex, so three pipelines can share one transaction.
//!
//! Schema and indexes (`Date`, `BuyerId`, `Ip`, term index on `Products`)
//! are provisioning concerns; queries assume they exist.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::domain::entities::{Buyer, Product, Transaction};
use crate::domain::value_objects::{BuyerId, EntityKind, LoadDate, ProductId};
use crate::infrastructure::store::error::{StoreError, StoreResult};
use crate::infrastructure::store::mutation::MutationPayload;
use crate::infrastructure::store::traits::{GraphStore, LoadTransaction};

/// DQL media type for the query endpoint.
const DQL_CONTENT_TYPE: &str = "application/dql";

/// Quotes a value as a DQL string literal.
fn dql_string(value: &str) -> String {
    let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{escaped}\"")
}

/// Renders a DQL list literal from string values.
fn dql_string_list(values: &[String]) -> String {
    let quoted: Vec<String> = values.iter().map(|v| dql_string(v)).collect();
    format!("[{}]", quoted.join(", "))
}

/// Space-joins ids into one term string for `anyofterms`.
fn term_string<I, S>(ids: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    ids.into_iter()
        .map(|id| id.as_ref().to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct QueryEnvelope<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<ApiError>,
}

/// Rows under the fixed `result` alias used by every query here.
#[derive(Debug, Deserialize)]
struct Rows<T> {
    #[serde(default = "Vec::new")]
    result: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct CountRow {
    #[serde(default)]
    count: usize,
}

#[derive(Debug, Deserialize)]
struct NameRow {
    #[serde(rename = "Name")]
    name: String,
}

#[derive(Debug, Deserialize)]
struct MutateEnvelope {
    #[serde(default)]
    errors: Vec<ApiError>,
    extensions: Option<Extensions>,
}

#[derive(Debug, Deserialize)]
struct Extensions {
    txn: Option<TxnContext>,
}

#[derive(Debug, Default, Deserialize)]
struct TxnContext {
    #[serde(default)]
    start_ts: u64,
    #[serde(default)]
    keys: Vec<String>,
    #[serde(default)]
    preds: Vec<String>,
}

fn transport_error(context: &str, error: &reqwest::Error) -> StoreError {
    if error.is_timeout() {
        StoreError::connection(format!("{context} timed out: {error}"))
    } else if error.is_connect() {
        StoreError::connection(format!("{context} connection failed: {error}"))
    } else {
        StoreError::connection(format!("{context} request failed: {error}"))
    }
}

fn join_messages(errors: &[ApiError]) -> String {
    errors
        .iter()
        .map(|e| e.message.clone())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Graph store backed by Dgraph's HTTP API.
#[derive(Debug, Clone)]
pub struct DgraphStore {
    client: Client,
    base_url: String,
}

impl DgraphStore {
    /// Creates a store client for the given base URL.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Connection`] if the HTTP client cannot be
    /// built.
    pub fn new(base_url: impl Into<String>, timeout_ms: u64) -> StoreResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .map_err(|e| StoreError::connection(format!("building store client: {e}")))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }

    /// Runs one DQL query and decodes the `data` object.
    async fn run_query<T: DeserializeOwned>(&self, dql: String) -> StoreResult<T> {
        debug!(query = %dql, "running store query");
        let response = self
            .client
            .post(self.endpoint("query"))
            .header(CONTENT_TYPE, DQL_CONTENT_TYPE)
            .body(dql)
            .send()
            .await
            .map_err(|e| transport_error("query", &e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| StoreError::decode(format!("reading query response: {e}")))?;
        if !status.is_success() {
            return Err(StoreError::query(format!(
                "query rejected ({status}): {body}"
            )));
        }

        let envelope: QueryEnvelope<T> = serde_json::from_str(&body)
            .map_err(|e| StoreError::decode(format!("query response shape: {e}")))?;
        if !envelope.errors.is_empty() {
            return Err(StoreError::query(join_messages(&envelope.errors)));
        }
        envelope
            .data
            .ok_or_else(|| StoreError::decode("query response missing data".to_string()))
    }
}

#[async_trait]
impl GraphStore for DgraphStore {
    async fn date_loaded(&self, date: &LoadDate) -> StoreResult<bool> {
        let dql = format!(
            "{{ result(func: eq(Date, {}), first: 1) {{ uid }} }}",
            dql_string(&date.to_string())
        );
        let rows: Rows<serde_json::Value> = self.run_query(dql).await?;
        Ok(!rows.result.is_empty())
    }

    async fn known_ids(&self, kind: EntityKind) -> StoreResult<HashSet<String>> {
        let dql = format!(
            "{{ result(func: type({})) {{ {} }} }}",
            kind.type_tag(),
            kind.id_predicate()
        );
        let rows: Rows<serde_json::Map<String, serde_json::Value>> = self.run_query(dql).await?;
        Ok(rows
            .result
            .iter()
            .filter_map(|row| row.get(kind.id_predicate()))
            .filter_map(serde_json::Value::as_str)
            .map(str::to_string)
            .collect())
    }

    fn begin_load(&self) -> Arc<dyn LoadTransaction> {
        Arc::new(DgraphLoadTransaction {
            client: self.client.clone(),
            base_url: self.base_url.clone(),
            state: Mutex::new(TxnState::default()),
        })
    }

    async fn buyers_page(&self, offset: usize, limit: usize) -> StoreResult<Vec<Buyer>> {
        let dql = format!(
            "{{ result(func: type(Buyer), offset: {offset}, first: {limit}) {{ expand(_all_) }} }}"
        );
        let rows: Rows<Buyer> = self.run_query(dql).await?;
        Ok(rows.result)
    }

    async fn buyer_count(&self) -> StoreResult<usize> {
        let dql = "{ result(func: type(Buyer)) { count: count(uid) } }".to_string();
        let rows: Rows<CountRow> = self.run_query(dql).await?;
        Ok(rows.result.first().map_or(0, |row| row.count))
    }

    async fn buyer_name(&self, id: &BuyerId) -> StoreResult<Option<String>> {
        let dql = format!(
            "{{ result(func: type(Buyer)) @filter(eq(BuyerId, {})) {{ Name }} }}",
            dql_string(id.as_str())
        );
        let rows: Rows<NameRow> = self.run_query(dql).await?;
        Ok(rows.result.into_iter().next().map(|row| row.name))
    }

    async fn transactions_by_buyer(&self, id: &BuyerId) -> StoreResult<Vec<Transaction>> {
        let dql = format!(
            "{{ result(func: type(Transaction)) @filter(eq(BuyerId, {})) {{ expand(_all_) }} }}",
            dql_string(id.as_str())
        );
        let rows: Rows<Transaction> = self.run_query(dql).await?;
        Ok(rows.result)
    }

    async fn transactions_for_ips(&self, ips: &[String]) -> StoreResult<Vec<Transaction>> {
        if ips.is_empty() {
            return Ok(Vec::new());
        }
        let dql = format!(
            "{{ result(func: type(Transaction)) @filter(eq(Ip, {})) {{ expand(_all_) }} }}",
            dql_string_list(ips)
        );
        let rows: Rows<Transaction> = self.run_query(dql).await?;
        Ok(rows.result)
    }

    async fn transactions_with_any_product(
        &self,
        product_ids: &[ProductId],
        limit: usize,
    ) -> StoreResult<Vec<Transaction>> {
        if product_ids.is_empty() {
            return Ok(Vec::new());
        }
        let terms = term_string(product_ids.iter().map(ProductId::as_str));
        let dql = format!(
            "{{ result(func: type(Transaction), first: {limit}) \
             @filter(anyofterms(Products, {})) {{ expand(_all_) }} }}",
            dql_string(&terms)
        );
        let rows: Rows<Transaction> = self.run_query(dql).await?;
        Ok(rows.result)
    }

    async fn buyers_by_ids(&self, ids: &[BuyerId]) -> StoreResult<Vec<Buyer>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let terms = term_string(ids.iter().map(BuyerId::as_str));
        let dql = format!(
            "{{ result(func: type(Buyer)) @filter(anyofterms(BuyerId, {})) {{ expand(_all_) }} }}",
            dql_string(&terms)
        );
        let rows: Rows<Buyer> = self.run_query(dql).await?;
        Ok(rows.result)
    }

    async fn products_by_ids(&self, ids: &[ProductId]) -> StoreResult<Vec<Product>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let terms = term_string(ids.iter().map(ProductId::as_str));
        let dql = format!(
            "{{ result(func: type(Product)) @filter(anyofterms(ProductId, {})) \
             {{ expand(_all_) }} }}",
            dql_string(&terms)
        );
        let rows: Rows<Product> = self.run_query(dql).await?;
        Ok(rows.result)
    }
}

/// Local view of one server-side transaction.
#[derive(Debug, Default)]
struct TxnState {
    start_ts: Option<u64>,
    keys: Vec<String>,
    preds: Vec<String>,
    closed: Option<&'static str>,
}

impl TxnState {
    fn merge(&mut self, context: TxnContext) {
        if self.start_ts.is_none() && context.start_ts > 0 {
            self.start_ts = Some(context.start_ts);
        }
        for key in context.keys {
            if !self.keys.contains(&key) {
                self.keys.push(key);
            }
        }
        for pred in context.preds {
            if !self.preds.contains(&pred) {
                self.preds.push(pred);
            }
        }
    }
}

/// One deferred-commit transaction against Dgraph.
#[derive(Debug)]
pub struct DgraphLoadTransaction {
    client: Client,
    base_url: String,
    state: Mutex<TxnState>,
}

impl DgraphLoadTransaction {
    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }
}

#[async_trait]
impl LoadTransaction for DgraphLoadTransaction {
    async fn stage(&self, payload: MutationPayload) -> StoreResult<()> {
        let mut state = self.state.lock().await;
        if let Some(terminal) = state.closed {
            return Err(StoreError::transaction_closed(terminal));
        }

        let url = match state.start_ts {
            Some(ts) => format!("{}?startTs={ts}", self.endpoint("mutate")),
            None => self.endpoint("mutate"),
        };
        let body = format!("{{\"set\":{}}}", payload.nodes_json());
        let response = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| transport_error("mutate", &e))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| StoreError::decode(format!("reading mutate response: {e}")))?;
        if !status.is_success() {
            return Err(StoreError::mutation(format!(
                "mutation rejected ({status}): {text}"
            )));
        }

        let envelope: MutateEnvelope = serde_json::from_str(&text)
            .map_err(|e| StoreError::decode(format!("mutate response shape: {e}")))?;
        if !envelope.errors.is_empty() {
            return Err(StoreError::mutation(join_messages(&envelope.errors)));
        }
        if let Some(context) = envelope.extensions.and_then(|ext| ext.txn) {
            state.merge(context);
        }
        debug!(
            kind = %payload.kind(),
            records = payload.record_count(),
            start_ts = ?state.start_ts,
            "mutation staged"
        );
        Ok(())
    }

    async fn commit(&self) -> StoreResult<()> {
        let mut state = self.state.lock().await;
        if let Some(terminal) = state.closed {
            return Err(StoreError::transaction_closed(terminal));
        }
        let Some(ts) = state.start_ts else {
            // Nothing was staged, there is no server-side transaction.
            state.closed = Some("committed");
            return Ok(());
        };

        let url = format!("{}?startTs={ts}", self.endpoint("commit"));
        let body = serde_json::json!({ "keys": state.keys, "preds": state.preds }).to_string();
        let response = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| StoreError::commit(format!("commit transport: {e}")))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| StoreError::commit(format!("reading commit response: {e}")))?;
        if !status.is_success() {
            return Err(StoreError::commit(format!(
                "commit rejected ({status}): {text}"
            )));
        }
        let envelope: MutateEnvelope = serde_json::from_str(&text)
            .map_err(|e| StoreError::commit(format!("commit response shape: {e}")))?;
        if !envelope.errors.is_empty() {
            return Err(StoreError::commit(join_messages(&envelope.errors)));
        }

        state.closed = Some("committed");
        debug!(start_ts = ts, "load transaction committed");
        Ok(())
    }

    async fn discard(&self) -> StoreResult<()> {
        let mut state = self.state.lock().await;
        if state.closed.is_some() {
            return Ok(());
        }
        if let Some(ts) = state.start_ts {
            // Best effort: an unreachable store will expire the
            // transaction on its own.
            let url = format!("{}?startTs={ts}&abort=true", self.endpoint("commit"));
            match self.client.post(&url).send().await {
                Ok(response) if response.status().is_success() => {
                    debug!(start_ts = ts, "load transaction aborted");
                }
                Ok(response) => {
                    warn!(
                        start_ts = ts,
                        status = %response.status(),
                        "store-side abort rejected, transaction left to expire"
                    );
                }
                Err(e) => {
                    warn!(
                        start_ts = ts,
                        error = %e,
                        "store-side abort unreachable, transaction left to expire"
                    );
                }
            }
        }
        state.closed = Some("discarded");
        Ok(())
    }
}
