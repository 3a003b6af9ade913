//! # REST Handlers
//!
//! Request handlers and wire types for the HTTP surface.
//!
//! Handlers stay thin: parameter validation happens here, everything else
//! is delegated to the application services held by [`AppState`]. Errors
//! serialize as an [`ErrorResponse`] with a status derived from the
//! application error class.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::application::error::ApplicationError;
use crate::application::services::views::{BuyerCollection, BuyerDetailView, DetailPageParams};
use crate::application::services::{IngestionService, ViewService};
use crate::domain::entities::{LoadOutcome, Product};
use crate::domain::value_objects::{BuyerId, LoadDate, ProductId};

/// Shared state for all REST handlers.
#[derive(Debug)]
pub struct AppState {
    /// Sync coordinator behind `POST /api/v1/sync/{date}`.
    pub ingestion: Arc<IngestionService>,
    /// Read models behind the query endpoints.
    pub views: Arc<ViewService>,
}

// ========== Wire types ==========

/// Error payload returned with every non-success status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Short machine-readable label.
    pub error: String,
    /// Human-readable detail.
    pub message: String,
}

/// Health check payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `"ok"` when the process is serving.
    pub status: String,
    /// Crate version.
    pub version: String,
}

/// Outcome of a sync request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SyncResponse {
    /// The date the run targeted.
    pub date: LoadDate,
    /// True when the idempotency gate closed the run.
    pub already_loaded: bool,
    /// Buyers accepted by this run.
    pub buyers: usize,
    /// Products accepted by this run.
    pub products: usize,
    /// Transactions accepted by this run.
    pub transactions: usize,
}

/// Query parameters for the buyer listing.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationParams {
    /// 0-based page.
    #[serde(default)]
    pub page: usize,
    /// Records per page.
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

/// Query parameters for the two paged sections of the buyer detail view.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct DetailParams {
    /// 1-based page of the co-located buyers section.
    #[serde(rename = "pageB", default = "default_section_page")]
    pub buyers_page: usize,
    /// Page size of the co-located buyers section.
    #[serde(rename = "pageSizeB", default = "default_page_size")]
    pub buyers_page_size: usize,
    /// 1-based page of the transaction history section.
    #[serde(rename = "pageT", default = "default_section_page")]
    pub transactions_page: usize,
    /// Page size of the transaction history section.
    #[serde(rename = "pageSizeT", default = "default_page_size")]
    pub transactions_page_size: usize,
}

impl From<DetailParams> for DetailPageParams {
    fn from(params: DetailParams) -> Self {
        Self {
            buyers_page: params.buyers_page,
            buyers_page_size: params.buyers_page_size,
            transactions_page: params.transactions_page,
            transactions_page_size: params.transactions_page_size,
        }
    }
}

/// Query parameters for the product lookup.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductParams {
    /// Comma-separated product ids.
    #[serde(default)]
    pub ids: String,
}

const fn default_page_size() -> usize {
    10
}

const fn default_section_page() -> usize {
    1
}

// ========== Error mapping ==========

/// [`ApplicationError`] wrapped for HTTP transport.
#[derive(Debug)]
pub struct RestError(ApplicationError);

impl From<ApplicationError> for RestError {
    fn from(err: ApplicationError) -> Self {
        Self(err)
    }
}

fn status_and_label(err: &ApplicationError) -> (StatusCode, &'static str) {
    match err {
        ApplicationError::Domain(_) | ApplicationError::Validation(_) => {
            (StatusCode::BAD_REQUEST, "bad_request")
        }
        ApplicationError::NotFound { .. } => (StatusCode::NOT_FOUND, "not_found"),
        ApplicationError::Feed(_) | ApplicationError::Parse(_) => {
            (StatusCode::BAD_GATEWAY, "upstream_failed")
        }
        ApplicationError::Store(_)
        | ApplicationError::PipelineFailed { .. }
        | ApplicationError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
    }
}

impl IntoResponse for RestError {
    fn into_response(self) -> Response {
        let (status, label) = status_and_label(&self.0);
        if status.is_server_error() {
            error!(status = %status, error = %self.0, "request failed");
        } else {
            warn!(status = %status, error = %self.0, "request rejected");
        }
        let body = ErrorResponse {
            error: label.to_owned(),
            message: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

type RestResult<T> = Result<T, RestError>;

// ========== Handlers ==========

/// `POST /api/v1/sync/{date}` — run the ingestion coordinator for a date.
pub async fn sync_date(
    State(state): State<Arc<AppState>>,
    Path(date): Path<String>,
) -> RestResult<(StatusCode, Json<SyncResponse>)> {
    let date = LoadDate::parse(&date).map_err(ApplicationError::from)?;
    let outcome = state.ingestion.load_for_date(&date).await?;
    let response = match outcome {
        LoadOutcome::Loaded(summary) => {
            info!(%date, records = summary.total_records(), "sync request completed");
            (
                StatusCode::CREATED,
                Json(SyncResponse {
                    date,
                    already_loaded: false,
                    buyers: summary.buyers().len(),
                    products: summary.products().len(),
                    transactions: summary.transactions().len(),
                }),
            )
        }
        LoadOutcome::AlreadyLoaded { date } => (
            StatusCode::OK,
            Json(SyncResponse {
                date,
                already_loaded: true,
                buyers: 0,
                products: 0,
                transactions: 0,
            }),
        ),
    };
    Ok(response)
}

/// `GET /api/v1/buyers` — paged buyer listing.
pub async fn list_buyers(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PaginationParams>,
) -> RestResult<Json<BuyerCollection>> {
    if params.page_size == 0 {
        return Err(ApplicationError::validation("pageSize must be positive").into());
    }
    let collection = state.views.buyers_page(params.page, params.page_size).await?;
    Ok(Json(collection))
}

/// `GET /api/v1/buyers/{id}` — aggregated buyer detail view.
pub async fn buyer_detail(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(params): Query<DetailParams>,
) -> RestResult<Json<BuyerDetailView>> {
    let buyer_id = BuyerId::parse_param(&id).map_err(ApplicationError::from)?;
    if params.buyers_page_size == 0 || params.transactions_page_size == 0 {
        return Err(ApplicationError::validation("page sizes must be positive").into());
    }
    let view = state.views.buyer_detail(&buyer_id, params.into()).await?;
    Ok(Json(view))
}

/// `GET /api/v1/products` — resolve a comma-separated id list.
pub async fn list_products(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ProductParams>,
) -> RestResult<Json<Vec<Product>>> {
    let ids: Vec<ProductId> = params
        .ids
        .split(',')
        .filter(|id| !id.is_empty())
        .map(ProductId::new)
        .collect();
    let products = state.views.products_by_ids(&ids).await?;
    Ok(Json(products))
}

/// `GET /health` — liveness probe.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_owned(),
        version: env!("CARGO_PKG_VERSION").to_owned(),
    })
}
