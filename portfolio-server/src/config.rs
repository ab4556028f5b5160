//! Environment configuration for the server.

use anyhow::Context;

/// Default port the server listens on.
pub const DEFAULT_PORT: u16 = 3001;

/// Default Pinecone index holding the resume chunks.
pub const DEFAULT_PINECONE_INDEX: &str = "portfolio-data";

/// Default CORS allow-list: the local dev frontend and the deployed site.
const DEFAULT_ALLOWED_ORIGINS: [&str; 2] =
    ["http://localhost:5173", "https://nirbhayportfolioai.netlify.app"];

/// Server configuration, loaded from the environment.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address.
    pub host: String,
    /// Bind port.
    pub port: u16,
    /// Gemini API key (required).
    pub gemini_api_key: String,
    /// Pinecone API key (required).
    pub pinecone_api_key: String,
    /// Name of the Pinecone index to query.
    pub pinecone_index: String,
    /// Optional index data plane host; when set, the control plane
    /// lookup is skipped.
    pub pinecone_host: Option<String>,
    /// Origins allowed by the CORS policy.
    pub allowed_origins: Vec<String>,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// `GEMINI_API_KEY` and `PINECONE_API_KEY` are required; startup fails
    /// fast when either is absent. Everything else has a default:
    /// `HOST` (0.0.0.0), `PORT` (3001), `PINECONE_INDEX` (portfolio-data),
    /// `PINECONE_HOST` (unset), `ALLOWED_ORIGINS` (comma-separated; the
    /// dev and deployed frontends).
    pub fn from_env() -> anyhow::Result<Self> {
        let gemini_api_key = std::env::var("GEMINI_API_KEY")
            .context("GEMINI_API_KEY environment variable must be set")?;
        let pinecone_api_key = std::env::var("PINECONE_API_KEY")
            .context("PINECONE_API_KEY environment variable must be set")?;

        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = std::env::var("PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);

        let pinecone_index = std::env::var("PINECONE_INDEX")
            .unwrap_or_else(|_| DEFAULT_PINECONE_INDEX.to_string());
        let pinecone_host = std::env::var("PINECONE_HOST").ok().filter(|h| !h.is_empty());

        let allowed_origins = match std::env::var("ALLOWED_ORIGINS") {
            Ok(origins) => origins
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(String::from)
                .collect(),
            Err(_) => DEFAULT_ALLOWED_ORIGINS.iter().map(|o| o.to_string()).collect(),
        };

        Ok(Self {
            host,
            port,
            gemini_api_key,
            pinecone_api_key,
            pinecone_index,
            pinecone_host,
            allowed_origins,
        })
    }
}
