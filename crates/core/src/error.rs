//! Error types for Ragline.
//!
//! This module defines a unified error enum covering every stage of the
//! pipeline: configuration, ingestion, retrieval, generation, and the
//! supporting I/O and serialization concerns.

use std::fmt;
use thiserror::Error;

/// Unified error type for Ragline.
///
/// All fallible functions return `Result<T, AppError>`. Each variant maps
/// to exactly one pipeline [`Stage`] so callers can decide on retry or
/// user notification without parsing messages.
#[derive(Error, Debug)]
pub enum AppError {
    /// Missing credential or invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Document reference could not be built
    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    /// Indexing submission rejected or unreachable
    #[error("Document upload failed: {}", http_detail(.status, .reason))]
    Ingestion { status: Option<u16>, reason: String },

    /// Remote indexer reported a failure or never became ready
    #[error("Indexing of document {document_id} did not complete: {status}")]
    Indexing { document_id: String, status: String },

    /// Retrieval query rejected or unreachable
    #[error("Retrieval failed: {}", http_detail(.status, .reason))]
    Retrieval { status: Option<u16>, reason: String },

    /// Remote response lacked an expected field or was not valid JSON
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Completion call failed (transport, auth, rate limit, bad body)
    #[error("Generation failed: {0}")]
    Generation(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

fn http_detail(status: &Option<u16>, reason: &str) -> String {
    match status {
        Some(code) => format!("{} {}", code, reason),
        None => reason.to_string(),
    }
}

/// Pipeline stage an error originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Configuration,
    Ingestion,
    Retrieval,
    MalformedResponse,
    Generation,
    Internal,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Configuration => "configuration",
            Self::Ingestion => "ingestion",
            Self::Retrieval => "retrieval",
            Self::MalformedResponse => "malformed-response",
            Self::Generation => "generation",
            Self::Internal => "internal",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AppError {
    /// The stage that produced this error.
    pub fn stage(&self) -> Stage {
        match self {
            Self::Config(_) => Stage::Configuration,
            Self::InvalidDocument(_) | Self::Ingestion { .. } | Self::Indexing { .. } => {
                Stage::Ingestion
            }
            Self::Retrieval { .. } => Stage::Retrieval,
            Self::MalformedResponse(_) => Stage::MalformedResponse,
            Self::Generation(_) => Stage::Generation,
            Self::Io(_) | Self::Serialization(_) => Stage::Internal,
        }
    }

    /// HTTP status observed by the failing call, if any.
    pub fn http_status(&self) -> Option<u16> {
        match self {
            Self::Ingestion { status, .. } | Self::Retrieval { status, .. } => *status,
            _ => None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;
