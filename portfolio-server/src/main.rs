use std::sync::Arc;

use portfolio_rag::{
    EmbeddingProvider, FixedSizeChunker, GeminiEmbedder, GeminiGenerator, PdfExtractor,
    PineconeVectorStore, RagConfig, RagPipeline,
};
use portfolio_server::config::ServerConfig;
use portfolio_server::server::{AppState, run_server};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let config = ServerConfig::from_env()?;

    let embedder = Arc::new(GeminiEmbedder::new(config.gemini_api_key.clone())?);
    let generator = Arc::new(GeminiGenerator::new(config.gemini_api_key.clone())?);

    let store = match &config.pinecone_host {
        Some(host) => PineconeVectorStore::with_host(config.pinecone_api_key.clone(), host)?,
        None => {
            PineconeVectorStore::connect(config.pinecone_api_key.clone(), &config.pinecone_index)
                .await?
        }
    };

    // The index and the embedder must agree on dimensionality before any
    // record is written or queried.
    if let Some(dimension) = store.dimension() {
        anyhow::ensure!(
            dimension == embedder.dimensions(),
            "index '{}' holds {}-dimensional vectors but the embedder produces {}",
            config.pinecone_index,
            dimension,
            embedder.dimensions(),
        );
    }

    let rag_config = RagConfig::default();
    let chunker = FixedSizeChunker::new(rag_config.chunk_size);

    let pipeline = RagPipeline::builder()
        .config(rag_config)
        .embedding_provider(embedder)
        .vector_store(Arc::new(store))
        .generation_provider(generator)
        .chunker(Arc::new(chunker))
        .build()?;

    let state =
        AppState { pipeline: Arc::new(pipeline), extractor: Arc::new(PdfExtractor::new()) };

    run_server(config, state).await
}
