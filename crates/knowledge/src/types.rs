//! Core types for documents and retrieved passages.

use ragline_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use url::Url;

/// Display name used when a URL has no usable final path segment.
pub const FALLBACK_DOCUMENT_NAME: &str = "document";

/// How thoroughly the remote service should index a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexMode {
    #[default]
    Fast,
    Accurate,
}

impl IndexMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fast => "fast",
            Self::Accurate => "accurate",
        }
    }
}

impl fmt::Display for IndexMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IndexMode {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "fast" => Ok(Self::Fast),
            "accurate" => Ok(Self::Accurate),
            other => Err(AppError::Config(format!(
                "Unknown index mode: {}. Supported: fast, accurate",
                other
            ))),
        }
    }
}

/// A document submitted to the indexing service by reference.
///
/// Serializes directly to the submission payload
/// `{"mode", "name", "url"}`, plus `"metadata"` when set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentRef {
    #[serde(rename = "mode")]
    pub index_mode: IndexMode,

    #[serde(rename = "name")]
    pub display_name: String,

    #[serde(rename = "url")]
    pub source_url: String,

    /// Optional key/value metadata stored with the document (e.g. scope)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Map<String, serde_json::Value>>,
}

impl DocumentRef {
    /// Build a reference, deriving the display name from the URL when
    /// `name` is absent or blank.
    ///
    /// # Errors
    /// `AppError::InvalidDocument` if `url` is not an absolute http(s) URL.
    pub fn new(url: &str, name: Option<&str>, index_mode: IndexMode) -> AppResult<Self> {
        let source_url = url.trim();
        let parsed = Url::parse(source_url).map_err(|e| {
            AppError::InvalidDocument(format!("'{}' is not a valid URL: {}", source_url, e))
        })?;

        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(AppError::InvalidDocument(format!(
                "Unsupported URL scheme '{}' in {}",
                parsed.scheme(),
                source_url
            )));
        }

        let display_name = match name.map(str::trim).filter(|n| !n.is_empty()) {
            Some(explicit) => explicit.to_string(),
            None => display_name_for(source_url),
        };

        Ok(Self {
            index_mode,
            display_name,
            source_url: source_url.to_string(),
            metadata: None,
        })
    }

    /// Attach a metadata entry.
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.metadata
            .get_or_insert_with(serde_json::Map::new)
            .insert(key.into(), value.into());
        self
    }

    /// Tag the document with the scope that queries filter on.
    pub fn with_scope(self, scope: impl Into<String>) -> Self {
        let scope: String = scope.into();
        self.with_metadata("scope", scope)
    }
}

/// Final path segment of the URL as written, or the fallback literal.
///
/// Works on the raw input so spaces and non-ASCII characters are kept
/// instead of the parser's percent-encoded form.
fn display_name_for(raw_url: &str) -> String {
    let without_suffix = raw_url
        .split(|c: char| c == '?' || c == '#')
        .next()
        .unwrap_or(raw_url);
    let after_scheme = without_suffix
        .split_once("://")
        .map_or(without_suffix, |(_, rest)| rest);

    after_scheme
        .split_once('/')
        .and_then(|(_, path)| path.rsplit('/').next())
        .filter(|segment| !segment.is_empty())
        .unwrap_or(FALLBACK_DOCUMENT_NAME)
        .to_string()
}

/// A passage returned by the retrieval service, in relevance order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetrievedChunk {
    pub text: String,
}

impl RetrievedChunk {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl AsRef<str> for RetrievedChunk {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

/// Indexing state reported by the remote service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexingStatus {
    /// Still being processed (e.g. "pending", "partitioning", "chunked")
    Pending(String),

    /// Searchable, with optional enrichment still running
    Indexed(String),

    /// Fully processed
    Ready,

    Failed,
}

impl IndexingStatus {
    /// Map a remote status string onto the known states.
    pub fn from_remote(status: &str) -> Self {
        match status.trim().to_lowercase().as_str() {
            "ready" => Self::Ready,
            "failed" => Self::Failed,
            s @ ("indexed" | "keyword_indexed" | "summary_indexed") => Self::Indexed(s.to_string()),
            s => Self::Pending(s.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending(s) | Self::Indexed(s) => s,
            Self::Ready => "ready",
            Self::Failed => "failed",
        }
    }

    /// Whether queries can already see the document.
    pub fn is_searchable(&self) -> bool {
        matches!(self, Self::Indexed(_) | Self::Ready)
    }
}

impl fmt::Display for IndexingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the indexing service returned for an accepted submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteDocumentHandle {
    /// Remote document identifier, when the response carried one
    pub id: Option<String>,

    /// Status at submission time
    pub status: IndexingStatus,
}
