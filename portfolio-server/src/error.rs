//! HTTP error mapping for the resume chat API.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use portfolio_rag::RagError;
use serde_json::json;
use thiserror::Error;

/// Errors surfaced by the HTTP handlers.
///
/// Every error renders as `{"error": message}`. Validation failures map
/// to 400; everything else maps to 500.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A pipeline failure (extraction, upstream service, validation).
    #[error(transparent)]
    Rag(#[from] RagError),

    /// A malformed request (bad multipart body, missing file field).
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// An internal server failure outside the pipeline.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Rag(RagError::Validation(_)) | ApiError::InvalidRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
