//! Gemini embedding and generation providers using the Gemini REST API.
//!
//! This module is only available when the `gemini` feature is enabled.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::generation::GenerationProvider;

/// The default Gemini API base URL.
const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// The default model for embeddings.
const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-004";

/// The dimensionality of `text-embedding-004` embeddings.
const DEFAULT_EMBEDDING_DIMENSIONS: usize = 768;

/// The default model for answer generation.
const DEFAULT_GENERATION_MODEL: &str = "gemini-2.5-pro";

/// The header carrying the API key.
const API_KEY_HEADER: &str = "x-goog-api-key";

fn require_api_key(api_key: String) -> Result<String> {
    if api_key.is_empty() {
        return Err(RagError::Config("Gemini API key must not be empty".to_string()));
    }
    Ok(api_key)
}

// ── Gemini API request/response types ───────────────────────────────

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

impl<'a> RequestContent<'a> {
    fn from_text(text: &'a str) -> Self {
        Self { parts: vec![RequestPart { text }] }
    }
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    content: RequestContent<'a>,
}

#[derive(Deserialize)]
struct EmbedResponse {
    embedding: EmbeddingValues,
}

#[derive(Deserialize)]
struct EmbeddingValues {
    values: Vec<f32>,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GenerateResponse {
    /// Concatenated text parts of the first candidate.
    fn text(self) -> String {
        self.candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|content| {
                content.parts.into_iter().filter_map(|p| p.text).collect::<Vec<_>>().join("")
            })
            .unwrap_or_default()
    }
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

/// Extract a human-readable message from an error body, falling back to
/// the raw body when it does not match the documented error shape.
fn error_detail(body: String) -> String {
    serde_json::from_str::<ErrorResponse>(&body).map(|e| e.error.message).unwrap_or(body)
}

// ── Embedding provider ──────────────────────────────────────────────

/// An [`EmbeddingProvider`] backed by the Gemini embeddings API.
///
/// Calls the `models/{model}:embedContent` endpoint with one text per
/// request. Batch embedding uses the trait's sequential default, so
/// ingesting N chunks issues N upstream calls in chunk order.
///
/// # Example
///
/// ```rust,ignore
/// use portfolio_rag::gemini::GeminiEmbedder;
///
/// let embedder = GeminiEmbedder::new("your-api-key")?;
/// let embedding = embedder.embed("hello world").await?;
/// assert_eq!(embedding.len(), 768);
/// ```
pub struct GeminiEmbedder {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
    dimensions: usize,
}

impl GeminiEmbedder {
    /// Create a new embedder with the given API key.
    ///
    /// Uses the default model (`text-embedding-004`, 768 dimensions).
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Config`] if the API key is empty.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Ok(Self {
            client: reqwest::Client::new(),
            api_key: require_api_key(api_key.into())?,
            model: DEFAULT_EMBEDDING_MODEL.into(),
            base_url: GEMINI_BASE_URL.into(),
            dimensions: DEFAULT_EMBEDDING_DIMENSIONS,
        })
    }

    /// Create a new embedder using the `GEMINI_API_KEY` environment variable.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("GEMINI_API_KEY").map_err(|_| {
            RagError::Config("GEMINI_API_KEY environment variable not set".to_string())
        })?;
        Self::new(api_key)
    }

    /// Set the model name.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the embedding dimensionality reported by
    /// [`dimensions()`](EmbeddingProvider::dimensions). Use together with
    /// [`with_model`](GeminiEmbedder::with_model) for models whose output
    /// size differs from the default.
    pub fn with_dimensions(mut self, dims: usize) -> Self {
        self.dimensions = dims;
        self
    }

    /// Override the API base URL (for proxies and tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl EmbeddingProvider for GeminiEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        debug!(provider = "Gemini", model = %self.model, text_len = text.len(), "embedding text");

        let model = format!("models/{}", self.model);
        let request_body =
            EmbedRequest { model: &model, content: RequestContent::from_text(text) };
        let url = format!("{}/{}:embedContent", self.base_url, model);

        let response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                error!(provider = "Gemini", error = %e, "embedding request failed");
                RagError::Upstream {
                    service: "Gemini".into(),
                    message: format!("request failed: {e}"),
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = error_detail(response.text().await.unwrap_or_default());

            error!(provider = "Gemini", %status, "embedding API error");
            return Err(RagError::Upstream {
                service: "Gemini".into(),
                message: format!("API returned {status}: {detail}"),
            });
        }

        let embed_response: EmbedResponse = response.json().await.map_err(|e| {
            error!(provider = "Gemini", error = %e, "failed to parse embedding response");
            RagError::Upstream {
                service: "Gemini".into(),
                message: format!("failed to parse response: {e}"),
            }
        })?;

        if embed_response.embedding.values.is_empty() {
            return Err(RagError::Upstream {
                service: "Gemini".into(),
                message: "API returned an empty embedding".into(),
            });
        }

        Ok(embed_response.embedding.values)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

// ── Generation provider ─────────────────────────────────────────────

/// A [`GenerationProvider`] backed by the Gemini text generation API.
///
/// Calls the `models/{model}:generateContent` endpoint with the assembled
/// prompt as a single user turn and returns the first candidate's text.
///
/// # Example
///
/// ```rust,ignore
/// use portfolio_rag::gemini::GeminiGenerator;
///
/// let generator = GeminiGenerator::new("your-api-key")?;
/// let answer = generator.generate("Say hello.").await?;
/// ```
pub struct GeminiGenerator {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiGenerator {
    /// Create a new generator with the given API key.
    ///
    /// Uses the default model (`gemini-2.5-pro`).
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Config`] if the API key is empty.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Ok(Self {
            client: reqwest::Client::new(),
            api_key: require_api_key(api_key.into())?,
            model: DEFAULT_GENERATION_MODEL.into(),
            base_url: GEMINI_BASE_URL.into(),
        })
    }

    /// Create a new generator using the `GEMINI_API_KEY` environment variable.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("GEMINI_API_KEY").map_err(|_| {
            RagError::Config("GEMINI_API_KEY environment variable not set".to_string())
        })?;
        Self::new(api_key)
    }

    /// Set the model name.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Override the API base URL (for proxies and tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl GenerationProvider for GeminiGenerator {
    async fn generate(&self, prompt: &str) -> Result<String> {
        debug!(provider = "Gemini", model = %self.model, prompt_len = prompt.len(), "generating");

        let request_body = GenerateRequest { contents: vec![RequestContent::from_text(prompt)] };
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);

        let response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                error!(provider = "Gemini", error = %e, "generation request failed");
                RagError::Upstream {
                    service: "Gemini".into(),
                    message: format!("request failed: {e}"),
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = error_detail(response.text().await.unwrap_or_default());

            error!(provider = "Gemini", %status, "generation API error");
            return Err(RagError::Upstream {
                service: "Gemini".into(),
                message: format!("API returned {status}: {detail}"),
            });
        }

        let generate_response: GenerateResponse = response.json().await.map_err(|e| {
            error!(provider = "Gemini", error = %e, "failed to parse generation response");
            RagError::Upstream {
                service: "Gemini".into(),
                message: format!("failed to parse response: {e}"),
            }
        })?;

        let text = generate_response.text();
        if text.is_empty() {
            return Err(RagError::Upstream {
                service: "Gemini".into(),
                message: "API returned no candidate text".into(),
            });
        }

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{EmbedRequest, EmbedResponse, GenerateResponse, RequestContent, error_detail};

    // ── Response parsing ────────────────────────────────────────────

    #[test]
    fn parse_embedding_response() {
        let json = json!({
            "embedding": {"values": [0.013168523, -0.00871193, -0.046782676]}
        });

        let resp: EmbedResponse = serde_json::from_value(json).unwrap();
        assert_eq!(resp.embedding.values.len(), 3);
        assert!((resp.embedding.values[0] - 0.013168523).abs() < 1e-9);
    }

    #[test]
    fn parse_generation_response() {
        let json = json!({
            "candidates": [{
                "content": {
                    "parts": [{"text": "Nirbhay is an exceptional candidate."}],
                    "role": "model"
                },
                "finishReason": "STOP",
                "index": 0
            }],
            "usageMetadata": {"promptTokenCount": 42, "totalTokenCount": 60},
            "modelVersion": "gemini-2.5-pro"
        });

        let resp: GenerateResponse = serde_json::from_value(json).unwrap();
        assert_eq!(resp.text(), "Nirbhay is an exceptional candidate.");
    }

    #[test]
    fn generation_text_concatenates_parts_of_first_candidate() {
        let json = json!({
            "candidates": [
                {"content": {"parts": [{"text": "Answer "}, {"text": "A"}], "role": "model"}},
                {"content": {"parts": [{"text": "Answer B"}], "role": "model"}}
            ]
        });

        let resp: GenerateResponse = serde_json::from_value(json).unwrap();
        assert_eq!(resp.text(), "Answer A");
    }

    #[test]
    fn generation_text_empty_when_no_candidates() {
        let resp: GenerateResponse =
            serde_json::from_value(json!({"promptFeedback": {"blockReason": "SAFETY"}})).unwrap();
        assert_eq!(resp.text(), "");
    }

    #[test]
    fn generation_text_empty_when_candidate_has_no_content() {
        let resp: GenerateResponse =
            serde_json::from_value(json!({"candidates": [{"finishReason": "SAFETY"}]})).unwrap();
        assert_eq!(resp.text(), "");
    }

    // ── Request shape ───────────────────────────────────────────────

    #[test]
    fn embed_request_wire_shape() {
        let request = EmbedRequest {
            model: "models/text-embedding-004",
            content: RequestContent::from_text("hello"),
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({
                "model": "models/text-embedding-004",
                "content": {"parts": [{"text": "hello"}]}
            })
        );
    }

    // ── Error body parsing ──────────────────────────────────────────

    #[test]
    fn error_detail_extracts_api_message() {
        let body = json!({
            "error": {"code": 400, "message": "API key not valid", "status": "INVALID_ARGUMENT"}
        })
        .to_string();

        assert_eq!(error_detail(body), "API key not valid");
    }

    #[test]
    fn error_detail_falls_back_to_raw_body() {
        assert_eq!(error_detail("<html>502</html>".to_string()), "<html>502</html>");
    }
}
