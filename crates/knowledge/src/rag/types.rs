//! RAG response types.

use crate::types::IndexingStatus;
use std::fmt;

/// Answer returned when retrieval finds nothing.
pub const NO_INFORMATION_ANSWER: &str = "No relevant information found for your query.";

/// Outcome of a successful `answer` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    /// Text produced by the generation service, unmodified
    Generated(String),

    /// Retrieval returned no passages; generation was skipped
    NoInformation,
}

impl Answer {
    /// Text to show the user.
    pub fn text(&self) -> &str {
        match self {
            Self::Generated(text) => text,
            Self::NoInformation => NO_INFORMATION_ANSWER,
        }
    }

    pub fn into_text(self) -> String {
        match self {
            Self::Generated(text) => text,
            Self::NoInformation => NO_INFORMATION_ANSWER.to_string(),
        }
    }

    /// Whether the answer came from the model.
    pub fn is_generated(&self) -> bool {
        matches!(self, Self::Generated(_))
    }
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

/// Confirmation of a completed `ingest` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestReceipt {
    pub source_url: String,
    pub display_name: String,

    /// Remote document id, when the service returned one
    pub document_id: Option<String>,

    /// Last known indexing status
    pub status: IndexingStatus,
}
