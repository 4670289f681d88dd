//! HTTP server.
//!
//! # Endpoints
//!
//! | Method | Path | Body | Description |
//! |--------|------|------|-------------|
//! | `POST` | `/search` | `{"query": "..."}` | Route a query; reference or free-text payload |
//! | `POST` | `/context` | `{"query": "...", "filePath"?: "...", "id"?: n}` | Context windows for a commentary entry or document |
//! | `GET`  | `/health` | | Health check (returns version) |
//!
//! # Error Contract
//!
//! ```json
//! { "error": { "code": "bad_request", "message": "query must not be empty" } }
//! ```
//!
//! Error codes: `bad_request` (400), `not_found` (404), `internal` (500).
//! Malformed or incomplete JSON bodies are reported as `bad_request`.
//!
//! # CORS
//!
//! All origins, methods, and headers are permitted so browser front-ends
//! served from another origin can call the API.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use lectio_core::router::{ContextRequest, ContextResponse, SearchResponse};
use lectio_core::QueryError;

use crate::config::Config;
use crate::engine::Engine;

/// Shared application state passed to all route handlers via Axum's `State` extractor.
#[derive(Clone)]
struct AppState {
    engine: Arc<Engine>,
}

/// Starts the HTTP server on `[server].bind`.
///
/// The full-text index is opened once here and shared by every request;
/// commentary and verse databases are opened per request.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let bind_addr = config.server.bind.clone();
    let engine = Arc::new(Engine::open(config).await?);

    let app = app(engine);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("lectio listening on http://{}", bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}

/// Build the router with all routes and CORS.
pub fn app(engine: Arc<Engine>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/search", post(handle_search))
        .route("/context", post(handle_context))
        .route("/health", get(handle_health))
        .layer(cors)
        .with_state(AppState { engine })
}

// ============ Error response ============

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    /// Machine-readable error code (e.g., `"bad_request"`, `"not_found"`).
    code: String,
    message: String,
}

/// Internal error type that converts into an Axum HTTP response.
struct AppError {
    status: StatusCode,
    code: String,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code,
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

fn bad_request(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::BAD_REQUEST,
        code: "bad_request".to_string(),
        message: message.into(),
    }
}

fn not_found(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::NOT_FOUND,
        code: "not_found".to_string(),
        message: message.into(),
    }
}

fn internal(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        code: "internal".to_string(),
        message: message.into(),
    }
}

impl From<QueryError> for AppError {
    fn from(err: QueryError) -> Self {
        match err {
            QueryError::NotFound(msg) => not_found(msg),
            QueryError::InvalidRequest(msg) => bad_request(msg),
            QueryError::Adapter(e) => {
                tracing::error!("request failed: {:#}", e);
                internal(e.to_string())
            }
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::warn!("rejected request body: {}", rejection.body_text());
        bad_request(rejection.body_text())
    }
}

// ============ GET /health ============

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ============ POST /search ============

#[derive(Deserialize)]
struct SearchRequest {
    query: String,
}

async fn handle_search(
    State(state): State<AppState>,
    body: Result<Json<SearchRequest>, JsonRejection>,
) -> Result<Json<SearchResponse>, AppError> {
    let Json(req) = body?;
    let response = state.engine.search(&req.query).await?;
    Ok(Json(response))
}

// ============ POST /context ============

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ContextBody {
    #[serde(default)]
    query: Option<String>,
    #[serde(default)]
    file_path: Option<String>,
    #[serde(default)]
    id: Option<i64>,
}

async fn handle_context(
    State(state): State<AppState>,
    body: Result<Json<ContextBody>, JsonRejection>,
) -> Result<Json<ContextResponse>, AppError> {
    let Json(body) = body?;
    let req = ContextRequest {
        query: body.query,
        file_path: body.file_path,
        id: body.id,
    };
    let response = state.engine.context(&req).await?;
    Ok(Json(response))
}
