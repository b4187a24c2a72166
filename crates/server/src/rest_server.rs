//! REST API server implementation using Axum

use crate::api::{
    accept_batch, execute_search, ping_engine, ErrorResponse, LivenessResponse, SaveResponse,
    SearchResponse,
};
use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use rand::Rng;
use searchgate_core::{Error, SaveBatch, SearchBody, SearchRequest};
use searchgate_engine::EngineClientAccessor;
use searchgate_write_queue::WriteQueue;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub queue: WriteQueue,
    pub accessor: Arc<EngineClientAccessor>,
}

impl AppState {
    pub fn new(queue: WriteQueue, accessor: Arc<EngineClientAccessor>) -> Self {
        Self { queue, accessor }
    }
}

/// Build the Axum router with all endpoints
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(liveness_handler))
        .route("/save", post(save_handler))
        .route("/search", post(search_handler))
        .route("/do-conn", get(do_conn_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Parse a JSON body regardless of the declared content type
fn parse_json<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
    serde_json::from_slice(body)
        .map_err(|e| ApiError::InvalidRequest(format!("json parse err: {e}")))
}

/// GET /
async fn liveness_handler() -> Json<LivenessResponse> {
    let random_num = rand::thread_rng().gen_range(0..1000);
    Json(LivenessResponse {
        message: "Server is running!!!".to_string(),
        random_num,
    })
}

/// POST /save
async fn save_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<SaveResponse>, ApiError> {
    let batch: SaveBatch = parse_json(&body)?;

    tracing::info!(
        "Save request: {} documents ({} batches pending)",
        batch.len(),
        state.queue.len()
    );

    accept_batch(batch, &state.queue).await?;
    Ok(Json(SaveResponse::accepted()))
}

/// POST /search
async fn search_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<SearchResponse>, ApiError> {
    let request: SearchRequest = parse_json::<SearchBody>(&body)?.into();

    tracing::info!("Search request: index='{}'", request.index);

    let res = execute_search(request, &state.accessor).await?;
    Ok(Json(SearchResponse { res, status: true }))
}

/// GET /do-conn
async fn do_conn_handler(State(state): State<AppState>) -> Result<String, ApiError> {
    tracing::info!("Engine connectivity check");

    Ok(ping_engine(&state.accessor).await?)
}

/// Error handling for API endpoints
#[derive(Debug)]
pub enum ApiError {
    InvalidRequest(String),
    Engine(String),
    ServiceUnavailable(String),
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, msg) = match self {
            ApiError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Engine(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::ServiceUnavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
            ApiError::Internal(msg) => {
                tracing::error!("Internal server error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal server error occurred".to_string(),
                )
            }
        };

        if status.is_client_error() {
            tracing::warn!("Request rejected ({status}): {msg}");
        }

        (status, Json(ErrorResponse { msg, status: true })).into_response()
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        match err {
            Error::InvalidInput(msg) => ApiError::InvalidRequest(msg),
            Error::Engine(msg) => ApiError::Engine(msg),
            Error::Queue(msg) => ApiError::ServiceUnavailable(msg),
            other => ApiError::Internal(other.to_string()),
        }
    }
}
