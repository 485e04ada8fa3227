//! Command handlers for the ragline CLI.
//!
//! This module organizes all CLI commands into separate submodules.

pub mod ask;
pub mod ingest;
pub mod status;

// Re-export command types for convenience
pub use ask::AskCommand;
pub use ingest::IngestCommand;
pub use status::StatusCommand;

use ragline_core::{config::AppConfig, AppError, AppResult, SharedSecret};
use ragline_knowledge::{IndexMode, RagPipeline};
use ragline_llm::ProviderType;

/// Validate the loaded configuration, using the same parsers the
/// pipeline uses for provider and index mode names.
pub(crate) fn check_config(config: &AppConfig) -> AppResult<()> {
    config.validate()?;

    if ProviderType::parse(&config.generation.provider).is_none() {
        return Err(AppError::Config(format!(
            "Unknown provider: {}. Supported: sambanova, openai, ollama",
            config.generation.provider
        )));
    }

    config.ingest.mode.parse::<IndexMode>()?;
    Ok(())
}

/// Build the pipeline with the session generation key.
///
/// An explicit key wins over the configured environment variable. Both
/// credentials are checked before any network call.
pub(crate) fn build_pipeline(
    config: &AppConfig,
    generation_key: Option<&str>,
) -> AppResult<RagPipeline> {
    config.require_retrieval_key()?;

    let key = generation_key
        .map(str::to_string)
        .filter(|key| !key.trim().is_empty())
        .or_else(|| config.resolve_generation_key())
        .ok_or_else(|| {
            AppError::Config(format!(
                "Missing generation API key! Pass --generation-key or set {}.",
                config.generation.api_key_env
            ))
        })?;

    let key = SharedSecret::new(key, "generation API key")?;
    RagPipeline::from_config(config, key)
}

/// Print a JSON value to stdout.
pub(crate) fn print_json(value: &serde_json::Value) -> AppResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
