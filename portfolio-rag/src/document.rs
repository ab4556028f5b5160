//! Data types for documents, chunks, and search results.

use serde::{Deserialize, Serialize};

/// A source document containing extracted text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Document {
    /// Unique identifier for the document.
    pub id: String,
    /// The text content of the document.
    pub text: String,
}

impl Document {
    /// Create a new document from an id and its text content.
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self { id: id.into(), text: text.into() }
    }
}

/// A segment of a [`Document`] with its vector embedding.
///
/// Chunk IDs are `{document_id}-{chunk_index}`, assigned in order of
/// appearance. Chunks leave the chunker with an empty embedding; the
/// pipeline attaches embeddings before storage.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Chunk {
    /// Unique identifier for the chunk.
    pub id: String,
    /// The text content of the chunk.
    pub text: String,
    /// The vector embedding for this chunk's text.
    pub embedding: Vec<f32>,
}

/// A retrieved [`Chunk`] paired with a relevance score.
///
/// On the read path the chunk's embedding is left empty; only the stored
/// text travels back from the index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    /// The retrieved chunk.
    pub chunk: Chunk,
    /// The similarity score (higher is more relevant).
    pub score: f32,
}
