//! `portfolio-server` exposes the resume chat HTTP API: a chat endpoint
//! backed by retrieval-augmented generation and a PDF ingestion endpoint
//! that chunks, embeds, and indexes uploaded documents.

pub mod config;
pub mod error;
pub mod server;

pub use config::ServerConfig;
pub use error::ApiError;
pub use server::{AppState, app_router, run_server};
