//! Grounded answer generation.

use crate::client::{ChatMessage, LlmClient, LlmRequest};
use crate::types::GenerationSettings;
use ragline_core::{AppError, AppResult};
use std::sync::Arc;

/// Sends a grounding prompt plus the user's question to an LLM.
///
/// Every request carries exactly two messages, system then user, with the
/// configured sampling policy. Any failure surfaces as
/// `AppError::Generation`; nothing is retried.
pub struct GenerationGateway {
    client: Arc<dyn LlmClient>,
    settings: GenerationSettings,
}

impl GenerationGateway {
    pub fn new(client: Arc<dyn LlmClient>, settings: GenerationSettings) -> Self {
        Self { client, settings }
    }

    /// Build the two-message request for a prompt and question.
    fn build_request(&self, system_prompt: &str, user_query: &str) -> LlmRequest {
        let mut request = LlmRequest::new(
            vec![ChatMessage::system(system_prompt), ChatMessage::user(user_query)],
            &self.settings.model,
        )
        .with_temperature(self.settings.temperature)
        .with_top_p(self.settings.top_p);

        if let Some(max_tokens) = self.settings.max_tokens {
            request = request.with_max_tokens(max_tokens);
        }

        request
    }

    /// Generate an answer; returns the first candidate's text unmodified.
    pub async fn complete(&self, system_prompt: &str, user_query: &str) -> AppResult<String> {
        let request = self.build_request(system_prompt, user_query);

        tracing::debug!(
            provider = self.client.provider_name(),
            model = %self.settings.model,
            prompt_chars = system_prompt.len(),
            "Generating grounded answer"
        );

        let response = self.client.complete(&request).await.map_err(|e| match e {
            AppError::Generation(_) => e,
            other => AppError::Generation(other.to_string()),
        })?;

        Ok(response.content)
    }
}
