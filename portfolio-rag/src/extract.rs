//! Text extraction from uploaded source documents.
//!
//! The [`PdfExtractor`] implementation is only available when the `pdf`
//! feature is enabled.

use crate::error::Result;

/// Extracts plain text from a source document's raw bytes.
///
/// Extraction is synchronous CPU work. Callers inside an async runtime
/// should run it on a blocking thread (`tokio::task::spawn_blocking`).
pub trait TextExtractor: Send + Sync {
    /// Extract the full text of the document.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Extraction`](crate::RagError::Extraction) if the
    /// document is malformed, unreadable, or contains no extractable text.
    fn extract(&self, data: &[u8]) -> Result<String>;
}

/// A [`TextExtractor`] for PDF documents, backed by the `pdf-extract` crate.
#[cfg(feature = "pdf")]
#[derive(Debug, Clone, Default)]
pub struct PdfExtractor;

#[cfg(feature = "pdf")]
impl PdfExtractor {
    /// Create a new PDF extractor.
    pub fn new() -> Self {
        Self
    }
}

#[cfg(feature = "pdf")]
impl TextExtractor for PdfExtractor {
    fn extract(&self, data: &[u8]) -> Result<String> {
        use crate::error::RagError;

        let text = pdf_extract::extract_text_from_mem(data)
            .map_err(|e| RagError::Extraction(format!("failed to parse PDF: {e}")))?;

        // Image-only (scanned) PDFs parse fine but carry no text layer.
        if text.trim().is_empty() {
            return Err(RagError::Extraction("PDF contains no extractable text".to_string()));
        }

        Ok(text)
    }
}
