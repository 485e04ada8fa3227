//! LLM integration crate for Ragline.
//!
//! This crate provides a provider-agnostic abstraction over OpenAI-compatible
//! chat completion services and the [`GenerationGateway`] that turns a
//! grounding prompt and a question into an answer.
//!
//! # Providers
//! - **SambaNova** Cloud (default)
//! - **OpenAI**
//! - **Ollama** through its `/v1` compatibility endpoint
//!
//! # Example
//! ```no_run
//! use ragline_core::SharedSecret;
//! use ragline_llm::{create_client, GenerationGateway, GenerationSettings};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let key = SharedSecret::new("sk-...", "generation API key")?;
//! let client = create_client("sambanova", None, Some(key))?;
//! let gateway = GenerationGateway::new(client, GenerationSettings::default());
//! let answer = gateway.complete("You are a helpful assistant.", "Hello!").await?;
//! println!("{}", answer);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod factory;
pub mod gateway;
pub mod providers;
pub mod types;

// Re-export main types
pub use client::{ChatMessage, ChatRole, LlmClient, LlmRequest, LlmResponse, LlmUsage};
pub use factory::create_client;
pub use gateway::GenerationGateway;
pub use providers::OpenAiCompatClient;
pub use types::{GenerationSettings, ProviderType};
