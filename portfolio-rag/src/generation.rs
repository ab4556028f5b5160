//! Generation provider trait for producing answer text from a prompt.

use async_trait::async_trait;

use crate::error::Result;

/// A provider that generates answer text from a fully assembled prompt.
///
/// One call is one blocking round trip to the backend; there is no
/// streaming surface. Prompt assembly is the pipeline's job, so
/// implementations receive the final prompt string as-is.
#[async_trait]
pub trait GenerationProvider: Send + Sync {
    /// Generate a response for the given prompt.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Upstream`](crate::RagError::Upstream) if the
    /// backend is unreachable, rejects the request, or returns no
    /// candidate text.
    async fn generate(&self, prompt: &str) -> Result<String>;
}
