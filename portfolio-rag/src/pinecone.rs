//! Pinecone vector store backend using the Pinecone REST API.
//!
//! This module is only available when the `pinecone` feature is enabled.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::document::{Chunk, SearchResult};
use crate::error::{RagError, Result};
use crate::vectorstore::VectorStore;

/// The Pinecone control plane base URL, used to resolve index hosts.
const CONTROL_PLANE_URL: &str = "https://api.pinecone.io";

/// The header carrying the API key.
const API_KEY_HEADER: &str = "Api-Key";

/// The Pinecone API version header and pinned version.
const API_VERSION_HEADER: &str = "X-Pinecone-API-Version";
const API_VERSION: &str = "2025-01";

// ── Pinecone API request/response types ─────────────────────────────

#[derive(Deserialize)]
struct DescribeIndexResponse {
    host: String,
    dimension: usize,
}

#[derive(Serialize)]
struct RecordMetadata<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct VectorRecord<'a> {
    id: &'a str,
    values: &'a [f32],
    metadata: RecordMetadata<'a>,
}

#[derive(Serialize)]
struct UpsertRequest<'a> {
    vectors: Vec<VectorRecord<'a>>,
}

#[derive(Deserialize)]
struct UpsertResponse {
    #[serde(rename = "upsertedCount", default)]
    upserted_count: usize,
}

#[derive(Serialize)]
struct QueryRequest<'a> {
    vector: &'a [f32],
    #[serde(rename = "topK")]
    top_k: usize,
    #[serde(rename = "includeMetadata")]
    include_metadata: bool,
}

#[derive(Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<QueryMatch>,
}

#[derive(Deserialize)]
struct QueryMatch {
    id: String,
    #[serde(default)]
    score: f32,
    metadata: Option<MatchMetadata>,
}

#[derive(Deserialize)]
struct MatchMetadata {
    #[serde(default)]
    text: String,
}

impl From<QueryMatch> for SearchResult {
    fn from(m: QueryMatch) -> Self {
        // Only the stored text travels back; embeddings stay in the index.
        let text = m.metadata.map(|meta| meta.text).unwrap_or_default();
        SearchResult { chunk: Chunk { id: m.id, text, embedding: Vec::new() }, score: m.score }
    }
}

#[derive(Deserialize)]
struct DataPlaneError {
    message: String,
}

#[derive(Deserialize)]
struct ControlPlaneError {
    error: DataPlaneError,
}

/// Extract a human-readable message from an error body. The data plane
/// reports `{message}`, the control plane `{error: {message}}`; anything
/// else falls back to the raw body.
fn error_detail(body: String) -> String {
    if let Ok(e) = serde_json::from_str::<DataPlaneError>(&body) {
        return e.message;
    }
    if let Ok(e) = serde_json::from_str::<ControlPlaneError>(&body) {
        return e.error.message;
    }
    body
}

fn upstream(message: String) -> RagError {
    RagError::Upstream { service: "Pinecone".into(), message }
}

// ── Vector store implementation ─────────────────────────────────────

/// A [`VectorStore`] backed by a single Pinecone index.
///
/// Records are written as `{id, values, metadata: {text}}`; search reads
/// the stored text back out of the match metadata. The store is bound to
/// one index host; index administration happens out-of-band.
///
/// # Example
///
/// ```rust,ignore
/// use portfolio_rag::pinecone::PineconeVectorStore;
///
/// let store = PineconeVectorStore::connect("api-key", "portfolio-data").await?;
/// store.upsert(&chunks).await?;
/// ```
pub struct PineconeVectorStore {
    client: reqwest::Client,
    api_key: String,
    endpoint: String,
    dimension: Option<usize>,
}

impl PineconeVectorStore {
    /// Connect to a named index, resolving its data plane host (and
    /// recording its dimension) through the control plane.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Config`] if the API key is empty, or
    /// [`RagError::Upstream`] if the index cannot be described (unknown
    /// index, bad credentials, network failure).
    pub async fn connect(api_key: impl Into<String>, index_name: &str) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(RagError::Config("Pinecone API key must not be empty".to_string()));
        }

        let client = reqwest::Client::new();
        let url = format!("{CONTROL_PLANE_URL}/indexes/{index_name}");

        let response = client
            .get(&url)
            .header(API_KEY_HEADER, &api_key)
            .header(API_VERSION_HEADER, API_VERSION)
            .send()
            .await
            .map_err(|e| {
                error!(backend = "Pinecone", error = %e, "describe index request failed");
                upstream(format!("describe index request failed: {e}"))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = error_detail(response.text().await.unwrap_or_default());

            error!(backend = "Pinecone", %status, index = index_name, "describe index failed");
            return Err(upstream(format!(
                "describe index '{index_name}' returned {status}: {detail}"
            )));
        }

        let described: DescribeIndexResponse = response.json().await.map_err(|e| {
            error!(backend = "Pinecone", error = %e, "failed to parse describe index response");
            upstream(format!("failed to parse describe index response: {e}"))
        })?;

        info!(
            backend = "Pinecone",
            index = index_name,
            host = %described.host,
            dimension = described.dimension,
            "connected to index"
        );

        Ok(Self {
            client,
            api_key,
            endpoint: normalize_endpoint(&described.host),
            dimension: Some(described.dimension),
        })
    }

    /// Bind directly to an index data plane host, skipping the control
    /// plane lookup. The index dimension is unknown on this path.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Config`] if the API key is empty.
    pub fn with_host(api_key: impl Into<String>, host: impl AsRef<str>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(RagError::Config("Pinecone API key must not be empty".to_string()));
        }

        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            endpoint: normalize_endpoint(host.as_ref()),
            dimension: None,
        })
    }

    /// The index dimension reported by the control plane, when known.
    pub fn dimension(&self) -> Option<usize> {
        self.dimension
    }

    /// Build a data plane POST carrying the auth and API version headers.
    fn data_plane_post(&self, path: &str) -> reqwest::RequestBuilder {
        self.client
            .post(format!("{}{}", self.endpoint, path))
            .header(API_KEY_HEADER, &self.api_key)
            .header(API_VERSION_HEADER, API_VERSION)
    }
}

/// Prefix the data plane host with a scheme when the caller (or the
/// control plane) supplied a bare hostname.
fn normalize_endpoint(host: &str) -> String {
    if host.starts_with("http://") || host.starts_with("https://") {
        host.trim_end_matches('/').to_string()
    } else {
        format!("https://{}", host.trim_end_matches('/'))
    }
}

#[async_trait]
impl VectorStore for PineconeVectorStore {
    async fn upsert(&self, chunks: &[Chunk]) -> Result<()> {
        if chunks.is_empty() {
            return Ok(());
        }

        let request_body = UpsertRequest {
            vectors: chunks
                .iter()
                .map(|chunk| VectorRecord {
                    id: &chunk.id,
                    values: &chunk.embedding,
                    metadata: RecordMetadata { text: &chunk.text },
                })
                .collect(),
        };

        let response = self
            .data_plane_post("/vectors/upsert")
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                error!(backend = "Pinecone", error = %e, "upsert request failed");
                upstream(format!("upsert request failed: {e}"))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = error_detail(response.text().await.unwrap_or_default());

            error!(backend = "Pinecone", %status, "upsert failed");
            return Err(upstream(format!("upsert returned {status}: {detail}")));
        }

        let upsert_response: UpsertResponse = response.json().await.map_err(|e| {
            error!(backend = "Pinecone", error = %e, "failed to parse upsert response");
            upstream(format!("failed to parse upsert response: {e}"))
        })?;

        debug!(
            backend = "Pinecone",
            sent = chunks.len(),
            upserted = upsert_response.upserted_count,
            "upserted records"
        );

        Ok(())
    }

    async fn search(&self, embedding: &[f32], top_k: usize) -> Result<Vec<SearchResult>> {
        let request_body = QueryRequest { vector: embedding, top_k, include_metadata: true };

        let response = self
            .data_plane_post("/query")
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                error!(backend = "Pinecone", error = %e, "query request failed");
                upstream(format!("query request failed: {e}"))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = error_detail(response.text().await.unwrap_or_default());

            error!(backend = "Pinecone", %status, "query failed");
            return Err(upstream(format!("query returned {status}: {detail}")));
        }

        let query_response: QueryResponse = response.json().await.map_err(|e| {
            error!(backend = "Pinecone", error = %e, "failed to parse query response");
            upstream(format!("failed to parse query response: {e}"))
        })?;

        debug!(backend = "Pinecone", matches = query_response.matches.len(), "query completed");

        Ok(query_response.matches.into_iter().map(SearchResult::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{
        DescribeIndexResponse, PineconeVectorStore, QueryRequest, QueryResponse, RecordMetadata,
        SearchResult, UpsertRequest, VectorRecord, error_detail, normalize_endpoint,
    };

    // ── Response parsing ────────────────────────────────────────────

    #[test]
    fn parse_describe_index_response() {
        let json = json!({
            "name": "portfolio-data",
            "dimension": 768,
            "metric": "cosine",
            "host": "portfolio-data-abc1234.svc.aped-4627-b74a.pinecone.io",
            "spec": {"serverless": {"cloud": "aws", "region": "us-east-1"}},
            "status": {"ready": true, "state": "Ready"}
        });

        let resp: DescribeIndexResponse = serde_json::from_value(json).unwrap();
        assert_eq!(resp.host, "portfolio-data-abc1234.svc.aped-4627-b74a.pinecone.io");
        assert_eq!(resp.dimension, 768);
    }

    #[test]
    fn parse_query_response_with_metadata() {
        let json = json!({
            "matches": [
                {"id": "resume-0", "score": 0.91, "values": [], "metadata": {"text": "Led Y"}},
                {"id": "resume-1", "score": 0.83, "values": [], "metadata": {"text": "Built Z"}}
            ],
            "namespace": "",
            "usage": {"readUnits": 6}
        });

        let resp: QueryResponse = serde_json::from_value(json).unwrap();
        let results: Vec<SearchResult> = resp.matches.into_iter().map(Into::into).collect();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].chunk.id, "resume-0");
        assert_eq!(results[0].chunk.text, "Led Y");
        assert!(results[0].chunk.embedding.is_empty());
        assert!((results[0].score - 0.91).abs() < 1e-6);
    }

    #[test]
    fn query_match_without_metadata_maps_to_empty_text() {
        let json = json!({"matches": [{"id": "resume-2", "score": 0.5}]});

        let resp: QueryResponse = serde_json::from_value(json).unwrap();
        let results: Vec<SearchResult> = resp.matches.into_iter().map(Into::into).collect();
        assert_eq!(results[0].chunk.text, "");
    }

    // ── Request shape ───────────────────────────────────────────────

    #[test]
    fn upsert_request_wire_shape() {
        // Exactly representable floats, so f32 → f64 widening is lossless.
        let values = [0.5_f32, 0.25];
        let request = UpsertRequest {
            vectors: vec![VectorRecord {
                id: "resume-0",
                values: &values,
                metadata: RecordMetadata { text: "Expert in X" },
            }],
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({
                "vectors": [{
                    "id": "resume-0",
                    "values": [0.5, 0.25],
                    "metadata": {"text": "Expert in X"}
                }]
            })
        );
    }

    #[test]
    fn query_request_uses_camel_case_keys() {
        let vector = [0.5_f32];
        let request = QueryRequest { vector: &vector, top_k: 5, include_metadata: true };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value, json!({"vector": [0.5], "topK": 5, "includeMetadata": true}));
    }

    #[test]
    fn data_plane_requests_carry_auth_and_version_headers() {
        let store = PineconeVectorStore::with_host("key", "index.svc.pinecone.io").unwrap();

        // build() assembles the request without sending it.
        let request = store.data_plane_post("/query").build().unwrap();

        assert_eq!(request.url().as_str(), "https://index.svc.pinecone.io/query");
        assert_eq!(request.headers().get("Api-Key").unwrap(), "key");
        assert_eq!(request.headers().get("X-Pinecone-API-Version").unwrap(), "2025-01");
    }

    // ── Error body parsing ──────────────────────────────────────────

    #[test]
    fn error_detail_reads_data_plane_shape() {
        let body = json!({"code": 3, "message": "Vector dimension 4 does not match", "details": []})
            .to_string();
        assert_eq!(error_detail(body), "Vector dimension 4 does not match");
    }

    #[test]
    fn error_detail_reads_control_plane_shape() {
        let body = json!({"error": {"code": "NOT_FOUND", "message": "Resource not found"}, "status": 404})
            .to_string();
        assert_eq!(error_detail(body), "Resource not found");
    }

    // ── Host normalization ──────────────────────────────────────────

    #[test]
    fn normalize_endpoint_adds_scheme_to_bare_host() {
        assert_eq!(normalize_endpoint("index.svc.pinecone.io"), "https://index.svc.pinecone.io");
        assert_eq!(normalize_endpoint("http://localhost:5080/"), "http://localhost:5080");
    }
}
