//! LLM provider factory.
//!
//! Creates LLM clients from a provider name, resolving the default
//! endpoint and checking that providers which need a key received one.

use crate::client::LlmClient;
use crate::providers::OpenAiCompatClient;
use crate::types::ProviderType;
use ragline_core::{AppError, AppResult, SharedSecret};
use std::sync::Arc;

/// Create an LLM client based on the provider name.
///
/// # Arguments
/// * `provider` - Provider identifier ("sambanova", "openai", "ollama")
/// * `endpoint` - Optional custom OpenAI-compatible base URL
/// * `api_key` - Session credential; required by every provider except Ollama
///
/// # Errors
/// Returns `AppError::Config` if the provider is unknown or a required
/// key is missing.
pub fn create_client(
    provider: &str,
    endpoint: Option<&str>,
    api_key: Option<SharedSecret>,
) -> AppResult<Arc<dyn LlmClient>> {
    let provider_type = ProviderType::parse(provider)
        .ok_or_else(|| AppError::Config(format!("Unknown provider: {}", provider)))?;

    if provider_type.requires_api_key() && api_key.is_none() {
        return Err(AppError::Config(format!(
            "{} provider requires API key",
            provider_type.as_str()
        )));
    }

    let base_url = endpoint.unwrap_or(provider_type.default_base_url());
    tracing::debug!("Creating {} client for {}", provider_type.as_str(), base_url);

    Ok(Arc::new(OpenAiCompatClient::with_base_url(
        provider_type,
        base_url,
        api_key,
    )))
}
