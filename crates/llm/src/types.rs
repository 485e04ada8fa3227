//! LLM provider and sampling types.

use ragline_core::config::GenerationConfig;
use serde::{Deserialize, Serialize};

/// Provider type enum for matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderType {
    SambaNova,
    OpenAI,
    Ollama,
}

impl ProviderType {
    /// Parse provider type from string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "sambanova" | "samba" => Some(Self::SambaNova),
            "openai" => Some(Self::OpenAI),
            "ollama" => Some(Self::Ollama),
            _ => None,
        }
    }

    /// Get the canonical provider name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SambaNova => "sambanova",
            Self::OpenAI => "openai",
            Self::Ollama => "ollama",
        }
    }

    /// OpenAI-compatible base URL used when no endpoint is configured.
    pub fn default_base_url(&self) -> &'static str {
        match self {
            Self::SambaNova => "https://api.sambanova.ai/v1",
            Self::OpenAI => "https://api.openai.com/v1",
            Self::Ollama => "http://localhost:11434/v1",
        }
    }

    /// Whether requests must carry a bearer token.
    pub fn requires_api_key(&self) -> bool {
        !matches!(self, Self::Ollama)
    }
}

/// Sampling policy applied to every grounded completion.
///
/// Low temperature and top-p bias the model toward deterministic output
/// that stays close to the retrieved passages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationSettings {
    pub model: String,
    pub temperature: f32,
    pub top_p: f32,
    pub max_tokens: Option<u32>,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            model: "Llama-3.2-11B-Vision-Instruct".to_string(),
            temperature: 0.1,
            top_p: 0.1,
            max_tokens: None,
        }
    }
}

impl From<&GenerationConfig> for GenerationSettings {
    fn from(config: &GenerationConfig) -> Self {
        Self {
            model: config.model.clone(),
            temperature: config.temperature,
            top_p: config.top_p,
            max_tokens: config.max_tokens,
        }
    }
}
