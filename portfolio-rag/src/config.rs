//! Configuration for the RAG pipeline.

use serde::{Deserialize, Serialize};

use crate::error::{RagError, Result};

/// Default number of characters per chunk.
pub const DEFAULT_CHUNK_SIZE: usize = 1000;

/// Default number of results returned from vector search.
pub const DEFAULT_TOP_K: usize = 5;

/// The persona the generation model answers as.
///
/// `preamble` is prepended to every prompt; `subject` names the person the
/// retrieved context describes. [`Persona::prompt`] assembles the final
/// prompt sent to the generation backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Persona {
    /// Name of the person the context is about.
    pub subject: String,
    /// Instructions prepended to every prompt.
    pub preamble: String,
}

impl Default for Persona {
    fn default() -> Self {
        Self {
            subject: "Nirbhay".to_string(),
            preamble: "You are a highly experienced resume and career branding expert. \
                       Whenever you answer questions about Nirbhay, always highlight his \
                       strengths, achievements, and unique qualities in a compelling and \
                       professional manner. Your responses should be tailored to impress \
                       recruiters and hiring managers, making Nirbhay stand out as an \
                       exceptional candidate. Use persuasive language, focus on impact, \
                       and ensure every answer builds a strong, positive image of Nirbhay \
                       as a top talent."
                .to_string(),
        }
    }
}

impl Persona {
    /// Create a persona with the given subject and preamble.
    pub fn new(subject: impl Into<String>, preamble: impl Into<String>) -> Self {
        Self { subject: subject.into(), preamble: preamble.into() }
    }

    /// Assemble the generation prompt from retrieved context and the
    /// user's question.
    ///
    /// The prompt carries the preamble first, then the context block, then
    /// the question. An empty context produces an empty block; the prompt
    /// shape does not change.
    pub fn prompt(&self, context: &str, question: &str) -> String {
        format!(
            "{}\n\nBased on the following information about {}:\n{}\n\nAnswer this question: {}",
            self.preamble, self.subject, context, question
        )
    }
}

/// Configuration parameters for the RAG pipeline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RagConfig {
    /// Number of characters per chunk.
    pub chunk_size: usize,
    /// Number of top results to return from vector search.
    pub top_k: usize,
    /// Persona used for prompt assembly.
    pub persona: Persona,
}

impl Default for RagConfig {
    fn default() -> Self {
        Self { chunk_size: DEFAULT_CHUNK_SIZE, top_k: DEFAULT_TOP_K, persona: Persona::default() }
    }
}

impl RagConfig {
    /// Create a new builder for constructing a [`RagConfig`].
    pub fn builder() -> RagConfigBuilder {
        RagConfigBuilder::default()
    }
}

/// Builder for constructing a validated [`RagConfig`].
#[derive(Debug, Clone, Default)]
pub struct RagConfigBuilder {
    config: RagConfig,
}

impl RagConfigBuilder {
    /// Set the number of characters per chunk.
    pub fn chunk_size(mut self, size: usize) -> Self {
        self.config.chunk_size = size;
        self
    }

    /// Set the number of top results to return from vector search.
    pub fn top_k(mut self, k: usize) -> Self {
        self.config.top_k = k;
        self
    }

    /// Set the persona used for prompt assembly.
    pub fn persona(mut self, persona: Persona) -> Self {
        self.config.persona = persona;
        self
    }

    /// Build the [`RagConfig`], validating that parameters are consistent.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Config`] if `chunk_size == 0` or `top_k == 0`.
    pub fn build(self) -> Result<RagConfig> {
        if self.config.chunk_size == 0 {
            return Err(RagError::Config("chunk_size must be greater than zero".to_string()));
        }
        if self.config.top_k == 0 {
            return Err(RagError::Config("top_k must be greater than zero".to_string()));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::{Persona, RagConfig};

    #[test]
    fn default_config_values() {
        let config = RagConfig::default();
        assert_eq!(config.chunk_size, 1000);
        assert_eq!(config.top_k, 5);
        assert_eq!(config.persona.subject, "Nirbhay");
    }

    #[test]
    fn builder_rejects_zero_chunk_size() {
        assert!(RagConfig::builder().chunk_size(0).build().is_err());
    }

    #[test]
    fn builder_rejects_zero_top_k() {
        assert!(RagConfig::builder().top_k(0).build().is_err());
    }

    #[test]
    fn prompt_orders_preamble_context_question() {
        let persona = Persona::new("Ada", "You are a career coach.");
        let prompt = persona.prompt("Wrote a compiler.", "What did Ada build?");

        let preamble_at = prompt.find("You are a career coach.").unwrap();
        let context_at = prompt.find("Wrote a compiler.").unwrap();
        let question_at = prompt.find("What did Ada build?").unwrap();
        assert!(preamble_at < context_at);
        assert!(context_at < question_at);
        assert!(prompt.contains("Based on the following information about Ada:"));
    }

    #[test]
    fn prompt_with_empty_context_keeps_shape() {
        let persona = Persona::new("Ada", "You are a career coach.");
        let prompt = persona.prompt("", "What did Ada build?");

        assert!(prompt.contains("Based on the following information about Ada:\n\n"));
        assert!(prompt.ends_with("Answer this question: What did Ada build?"));
    }
}
