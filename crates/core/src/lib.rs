//! Ragline Core Library
//!
//! This crate provides the foundational utilities shared by every Ragline crate:
//! - Error handling (`AppError`, `AppResult`, `Stage`)
//! - Logging infrastructure
//! - Configuration management
//! - Rotatable credentials (`SharedSecret`)

pub mod config;
pub mod error;
pub mod logging;
pub mod secret;

// Re-export commonly used types
pub use config::AppConfig;
pub use error::{AppError, AppResult, Stage};
pub use secret::SharedSecret;
