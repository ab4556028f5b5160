//! HTTP surface for the resume chat API.
//!
//! Routes:
//!
//! - `POST /api/chat` answers a question about the resume
//! - `POST /api/upload-pdf` ingests an uploaded PDF into the index
//! - `GET /health` is a liveness check

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::body::Bytes;
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::{HeaderValue, Method, header};
use axum::routing::{get, post};
use axum::{Json, Router};
use portfolio_rag::{Document, RagPipeline, TextExtractor};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::ServerConfig;
use crate::error::ApiError;

/// Uploads are limited to 25 MiB.
const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

/// Shared handler state. Cloned per request; both fields are `Arc`s.
#[derive(Clone)]
pub struct AppState {
    /// The RAG pipeline answering questions and ingesting documents.
    pub pipeline: Arc<RagPipeline>,
    /// Extracts text from uploaded documents.
    pub extractor: Arc<dyn TextExtractor>,
}

/// Body of `POST /api/chat`.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    /// The user's question. A missing field validates the same way as a
    /// blank one.
    #[serde(default)]
    pub message: String,
}

/// Response of `POST /api/chat`.
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    /// The generated answer.
    pub response: String,
}

/// Response of `POST /api/upload-pdf`.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    /// Human-readable confirmation.
    pub message: String,
    /// Number of chunks written to the index.
    pub chunks: usize,
}

/// Build the application router.
pub fn app_router(state: AppState, allowed_origins: &[String]) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/chat", post(chat))
        .route("/api/upload-pdf", post(upload_pdf))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
        .layer(cors_layer(allowed_origins))
        .layer(TraceLayer::new_for_http())
}

/// CORS policy: explicit origin allow-list, the methods the frontend
/// uses, and the `Content-Type` / `Authorization` request headers.
fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "ignoring malformed allowed origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

/// Bind and serve until shutdown.
pub async fn run_server(config: ServerConfig, state: AppState) -> anyhow::Result<()> {
    let app = app_router(state, &config.allowed_origins);
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .with_context(|| "invalid host/port for portfolio-server")?;

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("portfolio-server listening on http://{}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({"status": "ok", "service": "portfolio-server"}))
}

async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    let response = state.pipeline.answer(&request.message).await?;
    Ok(Json(ChatResponse { response }))
}

async fn upload_pdf(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    let data = read_upload(&mut multipart).await?;

    // PDF parsing is CPU-bound; keep it off the async workers.
    let extractor = state.extractor.clone();
    let text = tokio::task::spawn_blocking(move || extractor.extract(&data))
        .await
        .map_err(|e| ApiError::Internal(format!("extraction task failed: {e}")))??;

    let document = Document::new(Uuid::new_v4().to_string(), text);
    let chunks = state.pipeline.ingest(&document).await?;

    Ok(Json(UploadResponse {
        message: "PDF data uploaded to Pinecone".to_string(),
        chunks: chunks.len(),
    }))
}

/// Pull the uploaded file's bytes out of the multipart body.
///
/// Accepts the first field carrying a filename, or one named `pdf`. The
/// bytes live in an owned buffer scoped to the request, so they are
/// released on every path, success or failure.
async fn read_upload(multipart: &mut Multipart) -> Result<Bytes, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::InvalidRequest(format!("malformed multipart body: {e}")))?
    {
        if field.file_name().is_none() && field.name() != Some("pdf") {
            continue;
        }

        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::InvalidRequest(format!("failed to read upload: {e}")))?;

        if data.is_empty() {
            return Err(ApiError::InvalidRequest("uploaded file is empty".to_string()));
        }

        return Ok(data);
    }

    Err(ApiError::InvalidRequest("no file field in upload".to_string()))
}
