//! HTTP client for the Ragie indexing and retrieval API.
//!
//! Endpoints:
//! - `POST /documents/url` submits a document by URL
//! - `POST /retrievals` fetches scored chunks for a query
//! - `GET /documents/{id}` reports indexing status

use crate::gateway::RetrievalGateway;
use crate::types::{DocumentRef, IndexingStatus, RemoteDocumentHandle, RetrievedChunk};
use async_trait::async_trait;
use ragline_core::{AppError, AppResult, SharedSecret};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use url::Url;

/// Default Ragie API base URL.
pub const DEFAULT_RAGIE_URL: &str = "https://api.ragie.ai";

const UPLOAD_ENDPOINT: &str = "/documents/url";
const RETRIEVAL_ENDPOINT: &str = "/retrievals";
const DOCUMENTS_SEGMENT: &str = "documents";

/// Retrieval request payload.
#[derive(Debug, Serialize)]
struct RetrievalRequest<'a> {
    query: &'a str,
    filters: RetrievalFilters<'a>,
}

#[derive(Debug, Serialize)]
struct RetrievalFilters<'a> {
    scope: &'a str,
}

/// Retrieval response; `scored_chunks` is mandatory.
#[derive(Debug, Deserialize)]
struct RetrievalResponse {
    scored_chunks: Option<Vec<ScoredChunk>>,
}

#[derive(Debug, Deserialize)]
struct ScoredChunk {
    text: String,
}

/// Subset of the document resource we read.
#[derive(Debug, Deserialize)]
struct DocumentResponse {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    status: Option<String>,
}

/// Ragie API client.
#[derive(Debug, Clone)]
pub struct RagieClient {
    client: Client,
    base_url: String,
    api_key: SharedSecret,
}

impl RagieClient {
    /// Create a client against the public Ragie API.
    ///
    /// # Errors
    /// `AppError::Config` if the key is empty.
    pub fn new(api_key: &str) -> AppResult<Self> {
        Self::with_base_url(DEFAULT_RAGIE_URL, api_key)
    }

    /// Create a client against a custom base URL.
    pub fn with_base_url(base_url: impl Into<String>, api_key: &str) -> AppResult<Self> {
        let api_key = SharedSecret::new(api_key, "retrieval API key")?;
        let base_url: String = base_url.into();

        Ok(Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `{base}/documents/{id}`, with the id encoded as a single segment.
    fn document_url(&self, document_id: &str) -> AppResult<Url> {
        let mut url = Url::parse(&self.base_url).map_err(|e| {
            AppError::Config(format!("Invalid retrieval base URL '{}': {}", self.base_url, e))
        })?;

        url.path_segments_mut()
            .map_err(|_| {
                AppError::Config(format!("Retrieval base URL cannot hold a path: {}", self.base_url))
            })?
            .pop_if_empty()
            .push(DOCUMENTS_SEGMENT)
            .push(document_id);

        Ok(url)
    }

    fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.client
            .post(self.endpoint(path))
            .header("accept", "application/json")
            .bearer_auth(self.api_key.get())
    }
}

/// Reason phrase for a status, e.g. "Not Found".
fn reason_phrase(status: StatusCode) -> String {
    status
        .canonical_reason()
        .unwrap_or("Unknown Status")
        .to_string()
}

fn ingestion_error(status: StatusCode) -> AppError {
    AppError::Ingestion {
        status: Some(status.as_u16()),
        reason: reason_phrase(status),
    }
}

fn retrieval_error(status: StatusCode) -> AppError {
    AppError::Retrieval {
        status: Some(status.as_u16()),
        reason: reason_phrase(status),
    }
}

/// Extract chunk texts, keeping the server's order.
fn parse_retrieval_body(body: &str) -> AppResult<Vec<RetrievedChunk>> {
    let response: RetrievalResponse = serde_json::from_str(body)
        .map_err(|e| AppError::MalformedResponse(format!("Invalid retrieval response: {}", e)))?;

    let scored = response.scored_chunks.ok_or_else(|| {
        AppError::MalformedResponse("Retrieval response has no 'scored_chunks' field".to_string())
    })?;

    Ok(scored
        .into_iter()
        .map(|chunk| RetrievedChunk::new(chunk.text))
        .collect())
}

/// Read the handle out of a submission response.
///
/// The body only matters for the document id, so an unreadable body still
/// counts as an accepted submission.
fn parse_submission_body(body: &str) -> RemoteDocumentHandle {
    match serde_json::from_str::<DocumentResponse>(body) {
        Ok(doc) => RemoteDocumentHandle {
            id: doc.id,
            status: IndexingStatus::from_remote(doc.status.as_deref().unwrap_or("pending")),
        },
        Err(e) => {
            warn!("Could not read document id from upload response: {}", e);
            RemoteDocumentHandle {
                id: None,
                status: IndexingStatus::Pending("unknown".to_string()),
            }
        }
    }
}

#[async_trait]
impl RetrievalGateway for RagieClient {
    async fn submit(&self, document: &DocumentRef) -> AppResult<RemoteDocumentHandle> {
        info!(
            name = %document.display_name,
            mode = %document.index_mode,
            "Uploading document {}",
            document.source_url
        );

        let response = self
            .post(UPLOAD_ENDPOINT)
            .json(document)
            .send()
            .await
            .map_err(|e| AppError::Ingestion {
                status: None,
                reason: format!("Failed to reach indexing service: {}", e),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ingestion_error(status));
        }

        let body = response.text().await.unwrap_or_default();
        let handle = parse_submission_body(&body);

        debug!(id = ?handle.id, status = %handle.status, "Document accepted");
        Ok(handle)
    }

    async fn search(&self, query: &str, scope: &str) -> AppResult<Vec<RetrievedChunk>> {
        debug!(scope = scope, "Retrieving chunks for query: {}", query);

        let payload = RetrievalRequest {
            query,
            filters: RetrievalFilters { scope },
        };

        let response = self
            .post(RETRIEVAL_ENDPOINT)
            .json(&payload)
            .send()
            .await
            .map_err(|e| AppError::Retrieval {
                status: None,
                reason: format!("Failed to reach retrieval service: {}", e),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(retrieval_error(status));
        }

        let body = response.text().await.map_err(|e| {
            AppError::MalformedResponse(format!("Failed to read retrieval response: {}", e))
        })?;

        let chunks = parse_retrieval_body(&body)?;
        debug!("Retrieved {} chunks", chunks.len());
        Ok(chunks)
    }

    async fn document_status(&self, document_id: &str) -> AppResult<IndexingStatus> {
        let url = self.document_url(document_id)?;

        let response = self
            .client
            .get(url)
            .header("accept", "application/json")
            .bearer_auth(self.api_key.get())
            .send()
            .await
            .map_err(|e| AppError::Indexing {
                document_id: document_id.to_string(),
                status: format!("status check failed: {}", e),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Indexing {
                document_id: document_id.to_string(),
                status: format!("status check failed: {} {}", status.as_u16(), reason_phrase(status)),
            });
        }

        let body: DocumentResponse = response.json().await.map_err(|e| {
            AppError::MalformedResponse(format!("Invalid document status response: {}", e))
        })?;

        let remote = body.status.ok_or_else(|| {
            AppError::MalformedResponse("Document response has no 'status' field".to_string())
        })?;

        Ok(IndexingStatus::from_remote(&remote))
    }
}
