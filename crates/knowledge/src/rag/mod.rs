//! RAG (Retrieval-Augmented Generation) answering system.
//!
//! Orchestrates remote ingestion, retrieval, prompt assembly, and
//! generation into `ingest` and `answer` operations.

pub mod pipeline;
pub mod types;

pub use pipeline::{PipelineOptions, RagPipeline, SettlePolicy, DEFAULT_SETTLE_TIME};
pub use types::{Answer, IngestReceipt, NO_INFORMATION_ANSWER};
