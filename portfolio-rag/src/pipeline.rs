//! RAG pipeline orchestrator.
//!
//! The [`RagPipeline`] coordinates the full ingest-and-answer workflow by
//! composing an [`EmbeddingProvider`], a [`VectorStore`], a
//! [`GenerationProvider`], and a [`Chunker`].
//!
//! # Example
//!
//! ```rust,ignore
//! use portfolio_rag::{FixedSizeChunker, InMemoryVectorStore, RagConfig, RagPipeline};
//!
//! let pipeline = RagPipeline::builder()
//!     .config(RagConfig::default())
//!     .embedding_provider(Arc::new(my_embedder))
//!     .vector_store(Arc::new(InMemoryVectorStore::new()))
//!     .generation_provider(Arc::new(my_generator))
//!     .chunker(Arc::new(FixedSizeChunker::new(1000)))
//!     .build()?;
//!
//! pipeline.ingest(&document).await?;
//! let answer = pipeline.answer("What are the candidate's strengths?").await?;
//! ```

use std::sync::Arc;

use tracing::{error, info};

use crate::chunking::Chunker;
use crate::config::RagConfig;
use crate::document::{Chunk, Document, SearchResult};
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::generation::GenerationProvider;
use crate::vectorstore::VectorStore;

/// The RAG pipeline orchestrator.
///
/// Coordinates document ingestion (chunk → embed → store) and question
/// answering (embed → search → prompt → generate). Construct one via
/// [`RagPipeline::builder()`].
pub struct RagPipeline {
    config: RagConfig,
    embedding_provider: Arc<dyn EmbeddingProvider>,
    vector_store: Arc<dyn VectorStore>,
    generation_provider: Arc<dyn GenerationProvider>,
    chunker: Arc<dyn Chunker>,
}

impl RagPipeline {
    /// Create a new [`RagPipelineBuilder`].
    pub fn builder() -> RagPipelineBuilder {
        RagPipelineBuilder::default()
    }

    /// Ingest a single document: chunk → embed → store.
    ///
    /// Chunks are embedded sequentially, in order of appearance, and the
    /// resulting records are written with a single upsert call. A document
    /// that produces no chunks skips the embedder and the store entirely.
    ///
    /// Returns the chunks that were stored (with embeddings attached).
    ///
    /// # Errors
    ///
    /// Propagates the first failure from the embedder or the store;
    /// remaining steps are skipped. Records upserted by an earlier call
    /// are not rolled back.
    pub async fn ingest(&self, document: &Document) -> Result<Vec<Chunk>> {
        // 1. Chunk the document
        let mut chunks = self.chunker.chunk(document);
        if chunks.is_empty() {
            info!(document.id = %document.id, chunk_count = 0, "ingested document (empty)");
            return Ok(chunks);
        }

        // 2. Collect chunk texts for embedding
        let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();

        // 3. Generate embeddings, one call per chunk, in order
        let embeddings = self.embedding_provider.embed_batch(&texts).await.map_err(|e| {
            error!(document.id = %document.id, error = %e, "embedding failed during ingestion");
            e
        })?;

        // 4. Attach embeddings to chunks
        for (chunk, embedding) in chunks.iter_mut().zip(embeddings) {
            chunk.embedding = embedding;
        }

        // 5. Upsert into the vector store in one call
        self.vector_store.upsert(&chunks).await.map_err(|e| {
            error!(document.id = %document.id, error = %e, "upsert failed during ingestion");
            e
        })?;

        let chunk_count = chunks.len();
        info!(document.id = %document.id, chunk_count, "ingested document");

        Ok(chunks)
    }

    /// Retrieve the chunks most relevant to a question: embed → search.
    ///
    /// Returns up to `top_k` results ordered by descending similarity
    /// score, exactly as the store reports them.
    ///
    /// # Errors
    ///
    /// Propagates embedding and search failures; a failed embedding skips
    /// the search.
    pub async fn retrieve(&self, question: &str) -> Result<Vec<SearchResult>> {
        // 1. Embed the question
        let query_embedding = self.embedding_provider.embed(question).await.map_err(|e| {
            error!(error = %e, "embedding failed during retrieval");
            e
        })?;

        // 2. Search the vector store
        let results =
            self.vector_store.search(&query_embedding, self.config.top_k).await.map_err(|e| {
                error!(error = %e, "vector store search failed");
                e
            })?;

        info!(result_count = results.len(), "retrieval completed");

        Ok(results)
    }

    /// Answer a question: retrieve → assemble prompt → generate.
    ///
    /// Retrieved chunk texts are joined with `"\n"` in returned order and
    /// rendered into the persona prompt together with the question. Zero
    /// matches do not short-circuit: generation runs with an empty context
    /// and the model answers from its own knowledge.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Validation`] for a blank question before any
    /// upstream call is made; otherwise propagates the first failure from
    /// retrieval or generation. There is no fallback answer.
    pub async fn answer(&self, question: &str) -> Result<String> {
        if question.trim().is_empty() {
            return Err(RagError::Validation("message must not be empty".to_string()));
        }

        let results = self.retrieve(question).await?;

        let context = results.iter().map(|r| r.chunk.text.as_str()).collect::<Vec<_>>().join("\n");
        let prompt = self.config.persona.prompt(&context, question);

        let response = self.generation_provider.generate(&prompt).await.map_err(|e| {
            error!(error = %e, "generation failed");
            e
        })?;

        info!(context_chunks = results.len(), "answered question");

        Ok(response)
    }
}

/// Builder for constructing a [`RagPipeline`].
///
/// All fields are required. Call [`build()`](RagPipelineBuilder::build)
/// to validate and produce the pipeline.
///
/// # Example
///
/// ```rust,ignore
/// let pipeline = RagPipeline::builder()
///     .config(RagConfig::default())
///     .embedding_provider(Arc::new(embedder))
///     .vector_store(Arc::new(store))
///     .generation_provider(Arc::new(generator))
///     .chunker(Arc::new(chunker))
///     .build()?;
/// ```
#[derive(Default)]
pub struct RagPipelineBuilder {
    config: Option<RagConfig>,
    embedding_provider: Option<Arc<dyn EmbeddingProvider>>,
    vector_store: Option<Arc<dyn VectorStore>>,
    generation_provider: Option<Arc<dyn GenerationProvider>>,
    chunker: Option<Arc<dyn Chunker>>,
}

impl RagPipelineBuilder {
    /// Set the pipeline configuration.
    pub fn config(mut self, config: RagConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the embedding provider.
    pub fn embedding_provider(mut self, provider: Arc<dyn EmbeddingProvider>) -> Self {
        self.embedding_provider = Some(provider);
        self
    }

    /// Set the vector store backend.
    pub fn vector_store(mut self, store: Arc<dyn VectorStore>) -> Self {
        self.vector_store = Some(store);
        self
    }

    /// Set the generation provider.
    pub fn generation_provider(mut self, provider: Arc<dyn GenerationProvider>) -> Self {
        self.generation_provider = Some(provider);
        self
    }

    /// Set the document chunker.
    pub fn chunker(mut self, chunker: Arc<dyn Chunker>) -> Self {
        self.chunker = Some(chunker);
        self
    }

    /// Build the [`RagPipeline`], validating that all required fields are set.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Config`] if any required field is missing.
    pub fn build(self) -> Result<RagPipeline> {
        let config =
            self.config.ok_or_else(|| RagError::Config("config is required".to_string()))?;
        let embedding_provider = self
            .embedding_provider
            .ok_or_else(|| RagError::Config("embedding_provider is required".to_string()))?;
        let vector_store = self
            .vector_store
            .ok_or_else(|| RagError::Config("vector_store is required".to_string()))?;
        let generation_provider = self
            .generation_provider
            .ok_or_else(|| RagError::Config("generation_provider is required".to_string()))?;
        let chunker =
            self.chunker.ok_or_else(|| RagError::Config("chunker is required".to_string()))?;

        Ok(RagPipeline { config, embedding_provider, vector_store, generation_provider, chunker })
    }
}
