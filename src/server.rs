//! HTTP surface: request validation, the engine behind a lock, and JSON
//! marshalling for the document and search endpoints.
//!
//! The engine itself is single-writer with no internal synchronization,
//! so the router serializes access through a `RwLock`: ingest takes the
//! write lock, searches and metrics take the read lock.

use crate::engine::{SearchEngine, SearchOptions};
use crate::error::{ApiError, ErrorCode};
use crate::types::Document;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tower_http::trace::TraceLayer;

/// Maximum documents per ingest batch.
const MAX_BATCH_SIZE: usize = 1000;
/// Maximum document id length, in characters.
const MAX_ID_LEN: usize = 256;
/// Maximum document text length, in characters.
const MAX_TEXT_LEN: usize = 200_000;

/// Service counters exposed through `/metrics`.
#[derive(Debug, Default)]
pub struct Metrics {
    documents_ingested: AtomicU64,
    searches: AtomicU64,
}

/// Shared application state.
pub struct AppState {
    engine: RwLock<SearchEngine>,
    metrics: Metrics,
    metrics_enabled: bool,
}

impl AppState {
    /// Create state with a fresh engine.
    pub fn new(metrics_enabled: bool) -> Arc<Self> {
        Arc::new(Self {
            engine: RwLock::new(SearchEngine::new()),
            metrics: Metrics::default(),
            metrics_enabled,
        })
    }
}

/// Build the application router.
pub fn build_app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .route("/documents", post(ingest_documents))
        .route("/search", post(search))
        .fallback(fallback)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Request/response bodies
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestRequest {
    pub documents: Vec<Document>,
    #[serde(default)]
    pub options: IngestOptions,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestOptions {
    #[serde(default)]
    pub on_duplicate: OnDuplicate,
}

/// What to do with an id that is already indexed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OnDuplicate {
    #[default]
    Replace,
    Skip,
}

#[derive(Debug, Serialize)]
pub struct IngestResponse {
    pub ingested: usize,
    pub failed: usize,
    pub failures: Vec<IngestFailure>,
}

#[derive(Debug, Serialize)]
pub struct IngestFailure {
    pub index: usize,
    pub id: String,
    pub code: ErrorCode,
    pub message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    pub query: String,
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    #[serde(default)]
    pub mode: SearchMode,
    #[serde(default)]
    pub page: Option<PageRequest>,
}

fn default_top_k() -> usize {
    10
}

/// Query mode: full-text only, or with typeahead expansion of the final
/// fragment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    #[default]
    Fulltext,
    Prefix,
}

#[derive(Debug, Deserialize)]
pub struct PageRequest {
    #[serde(default)]
    pub cursor: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub results: Vec<SearchResultItem>,
    pub page: PageInfo,
    pub took_ms: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResultItem {
    pub id: String,
    pub score: f32,
    /// Always empty; highlighting is not implemented.
    pub highlights: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub next_cursor: Option<String>,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct MetricsResponse {
    documents_ingested: u64,
    searches: u64,
    doc_count: usize,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

async fn metrics(State(state): State<Arc<AppState>>) -> Result<Json<MetricsResponse>, ApiError> {
    if !state.metrics_enabled {
        return Err(ApiError::NotFound("metrics are not enabled".to_string()));
    }
    let doc_count = state.engine.read().doc_count();
    Ok(Json(MetricsResponse {
        documents_ingested: state.metrics.documents_ingested.load(Ordering::Relaxed),
        searches: state.metrics.searches.load(Ordering::Relaxed),
        doc_count,
    }))
}

async fn fallback() -> ApiError {
    ApiError::NotFound("resource not found".to_string())
}

async fn ingest_documents(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<IngestRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(request) = payload.map_err(rejection_error)?;

    if request.documents.is_empty() || request.documents.len() > MAX_BATCH_SIZE {
        return Err(ApiError::InvalidArgument(format!(
            "documents must contain between 1 and {} entries",
            MAX_BATCH_SIZE
        )));
    }

    let mut failures: Vec<IngestFailure> = Vec::new();
    let mut accepted: Vec<Document> = Vec::new();
    for (index, doc) in request.documents.into_iter().enumerate() {
        match validate_document(&doc) {
            Ok(()) => accepted.push(doc),
            Err(message) => failures.push(IngestFailure {
                index,
                id: doc.id,
                code: ErrorCode::InvalidArgument,
                message,
            }),
        }
    }

    let skip_duplicates = request.options.on_duplicate == OnDuplicate::Skip;
    let ingested = {
        let mut engine = state.engine.write();
        let mut to_upsert: Vec<Document> = Vec::with_capacity(accepted.len());
        let mut skipped = 0usize;
        for doc in accepted {
            if skip_duplicates && engine.has_document(&doc.id) {
                skipped += 1;
                continue;
            }
            to_upsert.push(doc);
        }
        let count = to_upsert.len() + skipped;
        engine.upsert_documents(to_upsert);
        count
    };
    state
        .metrics
        .documents_ingested
        .fetch_add(ingested as u64, Ordering::Relaxed);

    let failed = failures.len();
    if failed > 0 {
        tracing::warn!(ingested, failed, "ingest batch partially rejected");
    } else {
        tracing::debug!(ingested, "ingest batch stored");
    }

    let status = if failed == 0 {
        StatusCode::OK
    } else {
        StatusCode::MULTI_STATUS
    };
    let body = IngestResponse {
        ingested,
        failed,
        failures,
    };
    Ok((status, Json(body)).into_response())
}

async fn search(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SearchRequest>, JsonRejection>,
) -> Result<Json<SearchResponse>, ApiError> {
    let Json(request) = payload.map_err(rejection_error)?;

    if request.top_k < 1 || request.top_k > 100 {
        return Err(ApiError::InvalidArgument(
            "topK must be between 1 and 100".to_string(),
        ));
    }

    let cursor = request
        .page
        .and_then(|page| page.cursor)
        .and_then(|envelope| decode_cursor(&envelope));
    let options = SearchOptions {
        limit: request.top_k,
        cursor,
        enable_prefix: request.mode == SearchMode::Prefix,
        ..Default::default()
    };

    let start = Instant::now();
    let (results, items) = {
        let engine = state.engine.read();
        let results = engine.search(&request.query, &options);
        let items: Vec<SearchResultItem> = results
            .hits
            .iter()
            .map(|hit| SearchResultItem {
                id: hit.doc_id.clone(),
                score: hit.score,
                highlights: Vec::new(),
                metadata: engine
                    .document(&hit.doc_id)
                    .and_then(|doc| doc.metadata.clone()),
            })
            .collect();
        (results, items)
    };
    let took_ms = start.elapsed().as_millis() as u64;
    state.metrics.searches.fetch_add(1, Ordering::Relaxed);
    tracing::debug!(hits = items.len(), took_ms, "search served");

    Ok(Json(SearchResponse {
        results: items,
        page: PageInfo {
            next_cursor: results.next_cursor.map(|token| encode_cursor(&token)),
        },
        took_ms,
    }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn validate_document(doc: &Document) -> Result<(), String> {
    let id_len = doc.id.chars().count();
    if id_len < 1 || id_len > MAX_ID_LEN {
        return Err(format!(
            "id must be between 1 and {} characters",
            MAX_ID_LEN
        ));
    }
    let text_len = doc.text.chars().count();
    if text_len < 1 || text_len > MAX_TEXT_LEN {
        return Err(format!(
            "text must be between 1 and {} characters",
            MAX_TEXT_LEN
        ));
    }
    Ok(())
}

fn rejection_error(rejection: JsonRejection) -> ApiError {
    match rejection {
        JsonRejection::MissingJsonContentType(_) => ApiError::UnsupportedMediaType,
        JsonRejection::JsonDataError(inner) => ApiError::UnprocessableEntity(inner.body_text()),
        JsonRejection::JsonSyntaxError(inner) => ApiError::InvalidArgument(inner.body_text()),
        other => ApiError::InvalidArgument(other.body_text()),
    }
}

/// Wrap an engine cursor token in the wire envelope: base64(JSON {token}).
fn encode_cursor(token: &str) -> String {
    let envelope = serde_json::json!({ "token": token });
    STANDARD.encode(envelope.to_string())
}

/// Unwrap a wire cursor. Anything undecodable is treated as no cursor.
fn decode_cursor(envelope: &str) -> Option<String> {
    let bytes = STANDARD.decode(envelope).ok()?;
    let value: serde_json::Value = serde_json::from_slice(&bytes).ok()?;
    Some(value.get("token")?.as_str()?.to_string())
}
