//! Ask command handler.
//!
//! Answers a question from the passages the retrieval service returns.

use super::{build_pipeline, print_json};
use clap::Args;
use ragline_core::{config::AppConfig, AppError, AppResult};

/// Answer a question from indexed documents
#[derive(Args, Debug)]
pub struct AskCommand {
    /// The question to ask
    pub query: String,

    /// Retrieval scope (default: from config)
    #[arg(short, long)]
    pub scope: Option<String>,

    /// Generation API key for this session
    #[arg(long, env = "SAMBANOVA_API_KEY", hide_env_values = true)]
    pub generation_key: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl AskCommand {
    pub async fn execute(&self, config: AppConfig) -> AppResult<()> {
        tracing::info!("Executing ask command");

        let query = self.query.trim();
        if query.is_empty() {
            return Err(AppError::Config("No question provided".to_string()));
        }

        let pipeline = build_pipeline(&config, self.generation_key.as_deref())?;
        let scope = self
            .scope
            .as_deref()
            .unwrap_or(&pipeline.options().default_scope)
            .to_string();

        let answer = pipeline.answer_in_scope(query, &scope).await?;

        if self.json {
            print_json(&serde_json::json!({
                "query": query,
                "scope": scope,
                "answer": answer.text(),
                "grounded": answer.is_generated(),
                "model": config.generation.model,
                "provider": config.generation.provider,
            }))?;
        } else {
            println!("{}", answer);
        }

        Ok(())
    }
}
