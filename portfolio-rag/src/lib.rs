//! # portfolio-rag
//!
//! Retrieval-Augmented Generation pipeline for resume chat.
//!
//! ## Overview
//!
//! This crate answers questions about a person's resume by retrieving
//! relevant text chunks from a vector index and passing them as context to
//! an LLM call. It provides:
//!
//! - [`RagPipeline`] - ingestion (chunk → embed → store) and answering
//!   (embed → search → prompt → generate)
//! - [`FixedSizeChunker`] - contiguous fixed-size character chunking
//! - `GeminiEmbedder` / `GeminiGenerator` - Gemini REST backends
//!   (`gemini` feature)
//! - `PineconeVectorStore` - Pinecone REST backend (`pinecone` feature)
//! - [`InMemoryVectorStore`] - cosine-similarity store for development
//!   and tests
//! - `PdfExtractor` - PDF text extraction (`pdf` feature)
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use portfolio_rag::{
//!     Document, FixedSizeChunker, GeminiEmbedder, GeminiGenerator,
//!     PineconeVectorStore, RagConfig, RagPipeline,
//! };
//!
//! let pipeline = RagPipeline::builder()
//!     .config(RagConfig::default())
//!     .embedding_provider(Arc::new(GeminiEmbedder::from_env()?))
//!     .vector_store(Arc::new(PineconeVectorStore::connect(key, "portfolio-data").await?))
//!     .generation_provider(Arc::new(GeminiGenerator::from_env()?))
//!     .chunker(Arc::new(FixedSizeChunker::default()))
//!     .build()?;
//!
//! pipeline.ingest(&Document::new("resume", text)).await?;
//! let answer = pipeline.answer("What are Nirbhay's strengths?").await?;
//! ```

pub mod chunking;
pub mod config;
pub mod document;
pub mod embedding;
pub mod error;
pub mod extract;
pub mod generation;
pub mod inmemory;
pub mod pipeline;
pub mod vectorstore;

#[cfg(feature = "gemini")]
pub mod gemini;
#[cfg(feature = "pinecone")]
pub mod pinecone;

pub use chunking::{Chunker, FixedSizeChunker};
pub use config::{DEFAULT_CHUNK_SIZE, DEFAULT_TOP_K, Persona, RagConfig, RagConfigBuilder};
pub use document::{Chunk, Document, SearchResult};
pub use embedding::EmbeddingProvider;
pub use error::{RagError, Result};
pub use extract::TextExtractor;
pub use generation::GenerationProvider;
pub use inmemory::InMemoryVectorStore;
pub use pipeline::{RagPipeline, RagPipelineBuilder};
pub use vectorstore::VectorStore;

#[cfg(feature = "pdf")]
pub use extract::PdfExtractor;
#[cfg(feature = "gemini")]
pub use gemini::{GeminiEmbedder, GeminiGenerator};
#[cfg(feature = "pinecone")]
pub use pinecone::PineconeVectorStore;
