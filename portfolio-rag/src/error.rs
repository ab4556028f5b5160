//! Error types for the `portfolio-rag` crate.

use thiserror::Error;

/// Errors that can occur in RAG operations.
#[derive(Debug, Error)]
pub enum RagError {
    /// Text extraction from a source document failed.
    #[error("Extraction error: {0}")]
    Extraction(String),

    /// A call to an external service (embedding, vector index, generation) failed.
    ///
    /// Covers network failures, authentication failures, non-success HTTP
    /// statuses, and malformed or empty responses.
    #[error("Upstream error ({service}): {message}")]
    Upstream {
        /// The external service that produced the error.
        service: String,
        /// A description of the failure.
        message: String,
    },

    /// A required input was missing or blank.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A configuration validation error.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// A convenience result type for RAG operations.
pub type Result<T> = std::result::Result<T, RagError>;
