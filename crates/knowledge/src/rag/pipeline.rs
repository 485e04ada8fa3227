//! RAG pipeline orchestration.
//!
//! `ingest` submits a document and waits for it to become searchable.
//! `answer` retrieves passages, short-circuits on an empty result, and
//! otherwise grounds a single completion in the passages. Both operations
//! are stateless and surface the first failure unchanged.

use crate::gateway::{RetrievalGateway, TimedRetrieval};
use crate::rag::types::{Answer, IngestReceipt};
use crate::ragie::RagieClient;
use crate::types::{DocumentRef, IndexMode, IndexingStatus, RemoteDocumentHandle};
use ragline_core::{AppConfig, AppError, AppResult, SharedSecret};
use ragline_llm::{create_client, GenerationGateway, GenerationSettings};
use ragline_prompt::PromptAssembler;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// Default wait after a successful submission.
pub const DEFAULT_SETTLE_TIME: Duration = Duration::from_secs(5);

/// How `ingest` waits between "accepted" and "searchable".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettlePolicy {
    /// Sleep for a fixed indexing settle time
    Fixed(Duration),

    /// Poll the document status until searchable, failed, or timed out
    Poll { interval: Duration, timeout: Duration },
}

impl Default for SettlePolicy {
    fn default() -> Self {
        Self::Fixed(DEFAULT_SETTLE_TIME)
    }
}

/// Tunables for a [`RagPipeline`].
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Scope used by [`RagPipeline::answer`]
    pub default_scope: String,
    pub settle: SettlePolicy,
    pub assembler: PromptAssembler,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            default_scope: "tutorial".to_string(),
            settle: SettlePolicy::default(),
            assembler: PromptAssembler::new(),
        }
    }
}

impl PipelineOptions {
    pub fn from_config(config: &AppConfig) -> Self {
        let settle = if config.ingest.poll {
            SettlePolicy::Poll {
                interval: Duration::from_millis(config.ingest.poll_interval_ms),
                timeout: Duration::from_secs(config.ingest.poll_timeout_secs),
            }
        } else {
            SettlePolicy::Fixed(Duration::from_secs(config.ingest.settle_secs))
        };

        Self {
            default_scope: config.retrieval.default_scope.clone(),
            settle,
            assembler: PromptAssembler::new(),
        }
    }
}

/// Retrieval-augmented answering over remotely indexed documents.
pub struct RagPipeline {
    retrieval: Arc<dyn RetrievalGateway>,
    generation: GenerationGateway,
    options: PipelineOptions,
}

impl RagPipeline {
    pub fn new(
        retrieval: Arc<dyn RetrievalGateway>,
        generation: GenerationGateway,
        options: PipelineOptions,
    ) -> Self {
        Self {
            retrieval,
            generation,
            options,
        }
    }

    /// Build the production pipeline: Ragie for retrieval, the configured
    /// provider for generation.
    ///
    /// Fails with `AppError::Config` before any network call when the
    /// retrieval credential is missing or the provider is unknown.
    pub fn from_config(config: &AppConfig, generation_key: SharedSecret) -> AppResult<Self> {
        let retrieval_key = config.require_retrieval_key()?;
        let ragie = RagieClient::with_base_url(&config.retrieval.base_url, retrieval_key)?;

        let client = create_client(
            &config.generation.provider,
            config.generation.endpoint.as_deref(),
            Some(generation_key),
        )?;
        let generation = GenerationGateway::new(client, GenerationSettings::from(&config.generation));

        tracing::debug!(
            retrieval = %config.retrieval.base_url,
            provider = %config.generation.provider,
            model = %config.generation.model,
            "Pipeline configured"
        );

        Ok(Self::new(
            Arc::new(TimedRetrieval::new(ragie)),
            generation,
            PipelineOptions::from_config(config),
        ))
    }

    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    /// Submit a document by URL and wait for it to settle.
    ///
    /// `name` defaults to the URL's final path segment.
    pub async fn ingest(
        &self,
        url: &str,
        name: Option<&str>,
        mode: IndexMode,
    ) -> AppResult<IngestReceipt> {
        let document = DocumentRef::new(url, name, mode)?;
        self.ingest_document(document).await
    }

    /// Submit a prepared document reference and wait for it to settle.
    ///
    /// No wait happens when the submission fails.
    pub async fn ingest_document(&self, document: DocumentRef) -> AppResult<IngestReceipt> {
        tracing::info!(
            "Ingesting '{}' ({} mode)",
            document.display_name,
            document.index_mode
        );

        let handle = self
            .retrieval
            .submit(&document)
            .await
            .inspect_err(|e| tracing::warn!(stage = %e.stage(), "Ingestion failed: {}", e))?;

        let document_id = handle.id.clone();
        let status = self.wait_until_searchable(handle).await?;

        tracing::info!("Document '{}' submitted ({})", document.display_name, status);

        Ok(IngestReceipt {
            source_url: document.source_url,
            display_name: document.display_name,
            document_id,
            status,
        })
    }

    async fn wait_until_searchable(&self, handle: RemoteDocumentHandle) -> AppResult<IndexingStatus> {
        match self.options.settle {
            SettlePolicy::Fixed(delay) => {
                if !delay.is_zero() {
                    tracing::info!("Waiting {:.1}s for indexing to settle", delay.as_secs_f64());
                    tokio::time::sleep(delay).await;
                }
                Ok(handle.status)
            }
            SettlePolicy::Poll { interval, timeout } => {
                let document_id = handle.id.ok_or_else(|| {
                    AppError::MalformedResponse(
                        "Upload response has no document id; cannot poll indexing status"
                            .to_string(),
                    )
                })?;
                self.poll_status(&document_id, handle.status, interval, timeout)
                    .await
            }
        }
    }

    async fn poll_status(
        &self,
        document_id: &str,
        initial: IndexingStatus,
        interval: Duration,
        timeout: Duration,
    ) -> AppResult<IndexingStatus> {
        let deadline = Instant::now() + timeout;
        let mut status = initial;

        loop {
            if status == IndexingStatus::Failed {
                return Err(AppError::Indexing {
                    document_id: document_id.to_string(),
                    status: status.to_string(),
                });
            }

            if status.is_searchable() {
                return Ok(status);
            }

            if Instant::now() >= deadline {
                return Err(AppError::Indexing {
                    document_id: document_id.to_string(),
                    status: format!("still {} after {:.1}s", status, timeout.as_secs_f64()),
                });
            }

            tracing::debug!(document_id, %status, "Document not searchable yet");
            tokio::time::sleep(interval).await;
            status = self.retrieval.document_status(document_id).await?;
        }
    }

    /// Answer a query against the default scope.
    pub async fn answer(&self, query: &str) -> AppResult<Answer> {
        self.answer_in_scope(query, &self.options.default_scope)
            .await
    }

    /// Answer a query against an explicit scope.
    ///
    /// Generation is never attempted when retrieval fails or returns no
    /// passages.
    pub async fn answer_in_scope(&self, query: &str, scope: &str) -> AppResult<Answer> {
        tracing::info!("Answering query in scope '{}': {}", scope, query);

        let chunks = self
            .retrieval
            .search(query, scope)
            .await
            .inspect_err(|e| tracing::warn!(stage = %e.stage(), "Retrieval failed: {}", e))?;

        if chunks.is_empty() {
            tracing::info!("No chunks retrieved; skipping generation");
            return Ok(Answer::NoInformation);
        }

        tracing::info!("Retrieved {} chunks", chunks.len());

        let prompt = self.options.assembler.build(&chunks);
        let text = self
            .generation
            .complete(prompt.as_str(), query)
            .await
            .inspect_err(|e| tracing::warn!(stage = %e.stage(), "Generation failed: {}", e))?;

        Ok(Answer::Generated(text))
    }
}
