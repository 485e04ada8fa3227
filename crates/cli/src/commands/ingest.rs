//! Ingest command handler.
//!
//! Submits a document URL to the retrieval service and waits until it
//! can be queried.

use super::{build_pipeline, print_json};
use clap::Args;
use ragline_core::{config::AppConfig, AppResult};
use ragline_knowledge::{DocumentRef, IndexMode};

/// Submit a document URL for indexing
#[derive(Args, Debug)]
pub struct IngestCommand {
    /// Publicly reachable document URL
    pub url: String,

    /// Display name (default: last path segment of the URL)
    #[arg(short, long)]
    pub name: Option<String>,

    /// Indexing mode (fast, accurate)
    #[arg(long)]
    pub mode: Option<String>,

    /// Tag the document with a retrieval scope
    #[arg(short, long)]
    pub scope: Option<String>,

    /// Seconds to wait after submission
    #[arg(long, conflicts_with = "poll")]
    pub settle_secs: Option<u64>,

    /// Poll the indexing status instead of waiting a fixed time
    #[arg(long)]
    pub poll: bool,

    /// Generation API key for this session
    #[arg(long, env = "SAMBANOVA_API_KEY", hide_env_values = true)]
    pub generation_key: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl IngestCommand {
    pub async fn execute(&self, mut config: AppConfig) -> AppResult<()> {
        tracing::info!("Executing ingest command for {}", self.url);

        if let Some(secs) = self.settle_secs {
            config.ingest.settle_secs = secs;
            config.ingest.poll = false;
        }

        if self.poll {
            config.ingest.poll = true;
        }

        let mode: IndexMode = self.mode.as_deref().unwrap_or(&config.ingest.mode).parse()?;

        let pipeline = build_pipeline(&config, self.generation_key.as_deref())?;

        let mut document = DocumentRef::new(&self.url, self.name.as_deref(), mode)?;
        if let Some(ref scope) = self.scope {
            document = document.with_scope(scope.as_str());
        }

        let receipt = pipeline.ingest_document(document).await?;

        if self.json {
            print_json(&serde_json::json!({
                "url": receipt.source_url,
                "name": receipt.display_name,
                "mode": mode.as_str(),
                "documentId": receipt.document_id,
                "status": receipt.status.as_str(),
            }))?;
        } else {
            println!("Document '{}' uploaded successfully!", receipt.display_name);
            if let Some(ref id) = receipt.document_id {
                println!("  id:     {}", id);
            }
            println!("  status: {}", receipt.status);
        }

        Ok(())
    }
}
