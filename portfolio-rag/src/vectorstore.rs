//! Vector store trait for storing and searching vector embeddings.

use async_trait::async_trait;

use crate::document::{Chunk, SearchResult};
use crate::error::Result;

/// A storage backend for vector embeddings with similarity search.
///
/// Each store instance is bound to a single index; index administration
/// (creation, sizing, deletion) happens out-of-band. Records are written
/// through [`upsert`](VectorStore::upsert) and read back through
/// [`search`](VectorStore::search).
///
/// # Example
///
/// ```rust,ignore
/// use portfolio_rag::{InMemoryVectorStore, VectorStore};
///
/// let store = InMemoryVectorStore::new();
/// store.upsert(&chunks).await?;
/// let results = store.search(&query_embedding, 5).await?;
/// ```
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Upsert chunks into the index. Chunks must have embeddings set.
    ///
    /// Records with previously stored IDs are overwritten. Upserting an
    /// empty slice is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Upstream`](crate::RagError::Upstream) on any
    /// write failure; the backend's partial-success semantics surface
    /// as-is.
    async fn upsert(&self, chunks: &[Chunk]) -> Result<()>;

    /// Search for the `top_k` most similar chunks to the given embedding.
    ///
    /// Returns results ordered by descending similarity score, as reported
    /// by the backend.
    async fn search(&self, embedding: &[f32], top_k: usize) -> Result<Vec<SearchResult>>;
}
