//! Remote knowledge: indexing, retrieval, and grounded answering.
//!
//! Documents are indexed by a remote retrieval service; this crate only
//! submits them by URL, queries passages, and orchestrates answering
//! through [`RagPipeline`].
//!
//! # Example
//! ```no_run
//! use ragline_core::{AppConfig, SharedSecret};
//! use ragline_knowledge::{IndexMode, RagPipeline};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::load()?;
//! let key = SharedSecret::new("sk-...", "generation API key")?;
//! let pipeline = RagPipeline::from_config(&config, key)?;
//!
//! pipeline
//!     .ingest("https://docs.example.com/guide.pdf", None, IndexMode::Fast)
//!     .await?;
//! let answer = pipeline.answer("What does the guide cover?").await?;
//! println!("{}", answer);
//! # Ok(())
//! # }
//! ```

pub mod gateway;
pub mod rag;
pub mod ragie;
pub mod types;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use gateway::{LatencyHook, LatencySample, RetrievalGateway, TimedRetrieval};
pub use rag::{
    Answer, IngestReceipt, PipelineOptions, RagPipeline, SettlePolicy, NO_INFORMATION_ANSWER,
};
pub use ragie::RagieClient;
pub use types::{
    DocumentRef, IndexMode, IndexingStatus, RemoteDocumentHandle, RetrievedChunk,
    FALLBACK_DOCUMENT_NAME,
};
