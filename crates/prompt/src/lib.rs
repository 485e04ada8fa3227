//! Prompt system for Ragline.
//!
//! This crate turns retrieved passages into the grounding system prompt
//! sent alongside the user's question. Assembly is pure: the same passages
//! always produce byte-identical prompts.

pub mod builder;
pub mod types;

// Re-export main types
pub use builder::{PromptAssembler, DEFAULT_ASSISTANT_NAME};
pub use types::SystemPrompt;
