use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        FromRequest, FromRequestParts, State,
    },
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use retrieval_core::persist::{save_corpus, KnowledgePaths};
use parking_lot::Mutex;
use retrieval_core::{AddOutcome, Document, KnowledgeBase, RetrievalError, RetrievalResult, RetrieveRequest};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

#[derive(Deserialize)]
pub struct AddKnowledgeParams {
    pub topic: String,
    pub content: String,
}

#[derive(Serialize)]
pub struct StatusResponse {
    pub service: &'static str,
    pub status: &'static str,
    pub documents: usize,
    pub method: &'static str,
}

#[derive(Serialize)]
pub struct AddKnowledgeResponse {
    pub message: &'static str,
    pub total_documents: usize,
}

#[derive(Serialize)]
pub struct KnowledgeResponse {
    pub documents: usize,
    pub entries: Vec<Document>,
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub kind: &'static str,
    pub message: String,
}

/// Error returned by handlers; renders as `{kind, message}` with a matching status code.
pub struct ApiError {
    status: StatusCode,
    body: ErrorBody,
}

impl ApiError {
    fn new(status: StatusCode, kind: &'static str, message: impl Into<String>) -> Self {
        Self { status, body: ErrorBody { kind, message: message.into() } }
    }
}

impl From<RetrievalError> for ApiError {
    fn from(err: RetrievalError) -> Self {
        let status = match err {
            RetrievalError::InvalidInput(_) => StatusCode::UNPROCESSABLE_ENTITY,
            RetrievalError::NotReady => StatusCode::SERVICE_UNAVAILABLE,
            RetrievalError::EmptyCorpus | RetrievalError::IndexRebuild(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self::new(status, err.kind(), err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, "invalid_input", rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, "invalid_input", rejection.body_text())
    }
}

/// JSON body extractor whose rejections render as [`ApiError`].
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Query string extractor whose rejections render as [`ApiError`].
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

#[derive(Clone)]
pub struct AppState {
    pub kb: Arc<KnowledgeBase>,
    /// When set, additions are written back to this knowledge directory.
    pub persist_dir: Option<PathBuf>,
    pub admin_token: Option<String>,
    /// Held across an addition and its write-back so saves land in addition order.
    pub write_lock: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(kb: Arc<KnowledgeBase>, persist_dir: Option<PathBuf>, admin_token: Option<String>) -> Self {
        Self { kb, persist_dir, admin_token, write_lock: Arc::new(Mutex::new(())) }
    }
}

pub fn build_app(kb: Arc<KnowledgeBase>, persist_dir: Option<PathBuf>) -> Router {
    let admin_token = std::env::var("ADMIN_TOKEN").ok().filter(|t| !t.is_empty());
    build_app_with_state(AppState::new(kb, persist_dir, admin_token))
}

pub fn build_app_with_state(app_state: AppState) -> Router {
    // CORS: read CORS_ALLOW_ORIGIN (comma-separated) or allow Any by default
    let cors = match std::env::var("CORS_ALLOW_ORIGIN") {
        Ok(val) => {
            let origins: Vec<_> = val
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();
            if origins.is_empty() {
                CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
            } else {
                CorsLayer::new().allow_origin(AllowOrigin::list(origins)).allow_methods(Any).allow_headers(Any)
            }
        }
        Err(_) => CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any),
    };

    Router::new()
        .route("/", get(status_handler))
        .route("/health", get(|| async { "ok" }))
        .route("/retrieve", post(retrieve_handler))
        .route("/add_knowledge", post(add_knowledge_handler))
        .route("/knowledge", get(knowledge_handler))
        .with_state(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

pub async fn status_handler(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        service: "Simple RAG",
        status: if state.kb.is_ready() { "running" } else { "starting" },
        documents: state.kb.len(),
        method: "TF-IDF similarity",
    })
}

pub async fn retrieve_handler(State(state): State<AppState>, ApiJson(request): ApiJson<RetrieveRequest>) -> Result<Json<RetrievalResult>, ApiError> {
    let start = std::time::Instant::now();
    let result = state.kb.retrieve(request)?;
    tracing::debug!(hits = result.contexts.len(), took_s = start.elapsed().as_secs_f64(), "retrieve served");
    Ok(Json(result))
}

pub async fn add_knowledge_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    ApiQuery(params): ApiQuery<AddKnowledgeParams>,
) -> Result<Json<AddKnowledgeResponse>, ApiError> {
    authorize(&state, &headers)?;
    // Re-indexing and the file write are blocking work.
    let outcome = tokio::task::spawn_blocking(move || add_and_persist(&state, &params))
        .await
        .map_err(|err| ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "internal", err.to_string()))??;
    Ok(Json(AddKnowledgeResponse { message: "Knowledge added", total_documents: outcome.total_documents }))
}

fn add_and_persist(state: &AppState, params: &AddKnowledgeParams) -> Result<AddOutcome, RetrievalError> {
    let _guard = state.write_lock.lock();
    let outcome = state.kb.add_knowledge(&params.topic, &params.content)?;
    if let Some(dir) = &state.persist_dir {
        // The in-memory index already reflects the addition; a failed write is only logged.
        if let Err(err) = save_corpus(&KnowledgePaths::new(dir), &state.kb.documents()) {
            tracing::error!(error = %err, dir = %dir.display(), "failed to persist corpus");
        }
    }
    Ok(outcome)
}

pub async fn knowledge_handler(State(state): State<AppState>) -> Json<KnowledgeResponse> {
    let listing = state.kb.list_knowledge();
    Json(KnowledgeResponse { documents: listing.documents, entries: listing.entries })
}

/// Mutations are open unless ADMIN_TOKEN is configured, in which case the
/// X-ADMIN-TOKEN header must match it.
fn authorize(state: &AppState, headers: &HeaderMap) -> Result<(), ApiError> {
    let required = match &state.admin_token {
        Some(t) => t,
        None => return Ok(()),
    };
    let provided = headers.get("X-ADMIN-TOKEN").and_then(|v| v.to_str().ok()).unwrap_or("");
    if provided == required {
        Ok(())
    } else {
        Err(ApiError::new(StatusCode::UNAUTHORIZED, "unauthorized", "invalid admin token"))
    }
}
