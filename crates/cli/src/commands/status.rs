//! Status command handler.

use super::print_json;
use clap::Args;
use ragline_core::{config::AppConfig, AppResult};
use ragline_knowledge::{RagieClient, RetrievalGateway};

/// Show the indexing status of a submitted document
#[derive(Args, Debug)]
pub struct StatusCommand {
    /// Document id returned by `ingest`
    pub document_id: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl StatusCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Checking status of document {}", self.document_id);

        let client =
            RagieClient::with_base_url(&config.retrieval.base_url, config.require_retrieval_key()?)?;
        let status = client.document_status(&self.document_id).await?;

        if self.json {
            print_json(&serde_json::json!({
                "documentId": self.document_id,
                "status": status.as_str(),
                "searchable": status.is_searchable(),
            }))?;
        } else {
            let note = if status.is_searchable() {
                "searchable"
            } else {
                "not searchable yet"
            };
            println!("{}: {} ({})", self.document_id, status, note);
        }

        Ok(())
    }
}
