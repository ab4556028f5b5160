//! Document chunking.
//!
//! This module provides the [`Chunker`] trait and [`FixedSizeChunker`],
//! which splits text into contiguous fixed-size chunks.

use crate::config::DEFAULT_CHUNK_SIZE;
use crate::document::{Chunk, Document};

/// A strategy for splitting documents into chunks.
///
/// Implementations produce [`Chunk`]s with text but no embeddings.
/// Embeddings are attached later by the pipeline.
pub trait Chunker: Send + Sync {
    /// Split a document into chunks.
    ///
    /// Returns an empty `Vec` if the document has empty text.
    /// Each returned chunk has an empty embedding vector.
    fn chunk(&self, document: &Document) -> Vec<Chunk>;
}

/// Splits text into contiguous, non-overlapping chunks of `chunk_size`
/// characters each; the final chunk holds the remainder.
///
/// Chunk IDs are generated as `{document_id}-{chunk_index}`, zero-based,
/// in order of appearance. Boundaries fall on `char` boundaries, so
/// multi-byte text is never split inside a code point. Splitting is
/// deterministic and has no side effects.
///
/// # Example
///
/// ```rust,ignore
/// use portfolio_rag::FixedSizeChunker;
///
/// let chunker = FixedSizeChunker::new(1000);
/// let chunks = chunker.chunk(&document);
/// ```
#[derive(Debug, Clone)]
pub struct FixedSizeChunker {
    chunk_size: usize,
}

impl FixedSizeChunker {
    /// Create a new `FixedSizeChunker`.
    ///
    /// # Arguments
    ///
    /// * `chunk_size` — number of characters per chunk (the final chunk
    ///   may be shorter)
    pub fn new(chunk_size: usize) -> Self {
        Self { chunk_size }
    }
}

impl Default for FixedSizeChunker {
    fn default() -> Self {
        Self::new(DEFAULT_CHUNK_SIZE)
    }
}

impl Chunker for FixedSizeChunker {
    fn chunk(&self, document: &Document) -> Vec<Chunk> {
        if document.text.is_empty() || self.chunk_size == 0 {
            return Vec::new();
        }

        let text = document.text.as_str();
        let mut chunks = Vec::new();
        let mut start = 0;
        let mut chunk_index = 0;

        while start < text.len() {
            // Byte offset of the char one past this chunk, or end of text.
            let end = text[start..]
                .char_indices()
                .nth(self.chunk_size)
                .map_or(text.len(), |(offset, _)| start + offset);

            chunks.push(Chunk {
                id: format!("{}-{chunk_index}", document.id),
                text: text[start..end].to_string(),
                embedding: Vec::new(),
            });

            chunk_index += 1;
            start = end;
        }

        chunks
    }
}

#[cfg(test)]
mod tests {
    use super::{Chunker, FixedSizeChunker};
    use crate::document::Document;

    #[test]
    fn splits_into_fixed_size_pieces() {
        let chunker = FixedSizeChunker::new(4);
        let chunks = chunker.chunk(&Document::new("doc", "abcdef"));

        let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, ["abcd", "ef"]);
    }

    #[test]
    fn ids_follow_document_id_and_index() {
        let chunker = FixedSizeChunker::new(2);
        let chunks = chunker.chunk(&Document::new("resume", "abcde"));

        let ids: Vec<&str> = chunks.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["resume-0", "resume-1", "resume-2"]);
    }

    #[test]
    fn empty_text_yields_no_chunks() {
        let chunker = FixedSizeChunker::new(4);
        assert!(chunker.chunk(&Document::new("doc", "")).is_empty());
    }

    #[test]
    fn text_shorter_than_chunk_size_yields_one_chunk() {
        let chunker = FixedSizeChunker::new(1000);
        let chunks = chunker.chunk(&Document::new("doc", "short"));

        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, "short");
        assert_eq!(chunks[0].id, "doc-0");
    }

    #[test]
    fn multibyte_text_splits_on_char_boundaries() {
        let chunker = FixedSizeChunker::new(2);
        let chunks = chunker.chunk(&Document::new("doc", "héllöwø"));

        let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, ["hé", "ll", "öw", "ø"]);
    }

    #[test]
    fn chunks_carry_empty_embeddings() {
        let chunker = FixedSizeChunker::new(3);
        let chunks = chunker.chunk(&Document::new("doc", "abcdef"));

        assert!(chunks.iter().all(|c| c.embedding.is_empty()));
    }
}
