//! OpenAI-compatible chat completion provider.
//!
//! SambaNova Cloud, OpenAI, and Ollama (`/v1`) all accept the same
//! `POST {base}/chat/completions` contract, so one client covers them.

use crate::client::{ChatMessage, LlmClient, LlmRequest, LlmResponse, LlmUsage};
use crate::types::ProviderType;
use ragline_core::{AppError, AppResult, SharedSecret};
use serde::{Deserialize, Serialize};

/// Chat completion request body.
#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    stream: bool,
}

/// Chat completion response body.
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Option<ChatUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatUsage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
}

/// OpenAI-compatible LLM client.
pub struct OpenAiCompatClient {
    provider: ProviderType,

    /// Base URL, without the `/chat/completions` suffix
    base_url: String,

    /// Read at request time so rotations apply to the next call
    api_key: Option<SharedSecret>,

    client: reqwest::Client,
}

impl OpenAiCompatClient {
    /// Create a client for a provider at its default endpoint.
    pub fn new(provider: ProviderType, api_key: Option<SharedSecret>) -> Self {
        Self::with_base_url(provider, provider.default_base_url(), api_key)
    }

    /// Create a client with a custom base URL.
    pub fn with_base_url(
        provider: ProviderType,
        base_url: impl Into<String>,
        api_key: Option<SharedSecret>,
    ) -> Self {
        let base_url: String = base_url.into();
        Self {
            provider,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            client: reqwest::Client::new(),
        }
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    /// Bearer token for the next request, if any.
    fn bearer_token(&self) -> Option<String> {
        self.api_key.as_ref().map(SharedSecret::get)
    }

    fn to_wire_request<'a>(&self, request: &'a LlmRequest) -> ChatCompletionRequest<'a> {
        ChatCompletionRequest {
            model: &request.model,
            messages: &request.messages,
            temperature: request.temperature,
            top_p: request.top_p,
            max_tokens: request.max_tokens,
            stream: false,
        }
    }

    /// Take the first candidate; later candidates are ignored.
    fn convert_response(
        &self,
        response: ChatCompletionResponse,
        requested_model: &str,
    ) -> AppResult<LlmResponse> {
        let first = response.choices.into_iter().next().ok_or_else(|| {
            AppError::Generation(format!("No choices in {} response", self.provider.as_str()))
        })?;

        let content = first.message.content.ok_or_else(|| {
            AppError::Generation(format!(
                "First {} choice has no message content",
                self.provider.as_str()
            ))
        })?;

        let usage = response
            .usage
            .map(|u| LlmUsage::new(u.prompt_tokens, u.completion_tokens))
            .unwrap_or_default();

        Ok(LlmResponse {
            content,
            model: response
                .model
                .unwrap_or_else(|| requested_model.to_string()),
            usage,
        })
    }
}

#[async_trait::async_trait]
impl LlmClient for OpenAiCompatClient {
    fn provider_name(&self) -> &str {
        self.provider.as_str()
    }

    async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse> {
        tracing::info!(
            provider = self.provider.as_str(),
            model = %request.model,
            "Sending chat completion request"
        );

        let url = self.completions_url();
        let mut builder = self
            .client
            .post(&url)
            .header("accept", "application/json")
            .json(&self.to_wire_request(request));

        if let Some(token) = self.bearer_token() {
            builder = builder.bearer_auth(token);
        }

        let response = builder.send().await.map_err(|e| {
            AppError::Generation(format!(
                "Failed to send request to {}: {}",
                self.provider.as_str(),
                e
            ))
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::Generation(format!(
                "{} API error ({}): {}",
                self.provider.as_str(),
                status,
                error_text
            )));
        }

        let body: ChatCompletionResponse = response.json().await.map_err(|e| {
            AppError::Generation(format!(
                "Failed to parse {} response: {}",
                self.provider.as_str(),
                e
            ))
        })?;

        let converted = self.convert_response(body, &request.model)?;

        tracing::info!("Received completion from {}", self.provider.as_str());
        tracing::debug!(
            prompt_tokens = converted.usage.prompt_tokens,
            completion_tokens = converted.usage.completion_tokens,
            "Completion usage"
        );

        Ok(converted)
    }
}
