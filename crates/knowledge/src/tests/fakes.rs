//! In-process stand-ins for the retrieval and generation services.

use crate::gateway::RetrievalGateway;
use crate::types::{DocumentRef, IndexingStatus, RemoteDocumentHandle, RetrievedChunk};
use async_trait::async_trait;
use ragline_core::{AppError, AppResult, SharedSecret};
use ragline_llm::{ChatRole, LlmClient, LlmRequest, LlmResponse, LlmUsage};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Scripted retrieval behavior.
pub enum SearchBehavior {
    Chunks(Vec<&'static str>),
    HttpError(u16, &'static str),
    Malformed,
}

pub enum SubmitBehavior {
    Accept { id: Option<&'static str>, status: &'static str },
    Reject(u16, &'static str),
}

pub struct FakeRetrieval {
    search: SearchBehavior,
    submit: SubmitBehavior,
    statuses: Mutex<VecDeque<&'static str>>,
    pub submit_calls: AtomicUsize,
    pub search_calls: AtomicUsize,
    pub status_calls: AtomicUsize,
    pub submitted: Mutex<Vec<DocumentRef>>,
    pub scopes: Mutex<Vec<String>>,
}

impl FakeRetrieval {
    pub fn new(search: SearchBehavior, submit: SubmitBehavior) -> Self {
        Self {
            search,
            submit,
            statuses: Mutex::new(VecDeque::new()),
            submit_calls: AtomicUsize::new(0),
            search_calls: AtomicUsize::new(0),
            status_calls: AtomicUsize::new(0),
            submitted: Mutex::new(Vec::new()),
            scopes: Mutex::new(Vec::new()),
        }
    }

    pub fn searching(chunks: Vec<&'static str>) -> Self {
        Self::new(
            SearchBehavior::Chunks(chunks),
            SubmitBehavior::Accept {
                id: Some("doc-1"),
                status: "pending",
            },
        )
    }

    /// Statuses returned by successive `document_status` calls; the last
    /// one repeats.
    pub fn with_statuses(self, statuses: &[&'static str]) -> Self {
        *self.statuses.lock().unwrap() = statuses.iter().copied().collect();
        self
    }

    pub fn submits(&self) -> usize {
        self.submit_calls.load(Ordering::SeqCst)
    }

    pub fn searches(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst)
    }

    pub fn status_checks(&self) -> usize {
        self.status_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RetrievalGateway for FakeRetrieval {
    async fn submit(&self, document: &DocumentRef) -> AppResult<RemoteDocumentHandle> {
        self.submit_calls.fetch_add(1, Ordering::SeqCst);
        self.submitted.lock().unwrap().push(document.clone());

        match &self.submit {
            SubmitBehavior::Accept { id, status } => Ok(RemoteDocumentHandle {
                id: id.map(str::to_string),
                status: IndexingStatus::from_remote(status),
            }),
            SubmitBehavior::Reject(code, reason) => Err(AppError::Ingestion {
                status: Some(*code),
                reason: reason.to_string(),
            }),
        }
    }

    async fn search(&self, _query: &str, scope: &str) -> AppResult<Vec<RetrievedChunk>> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        self.scopes.lock().unwrap().push(scope.to_string());

        match &self.search {
            SearchBehavior::Chunks(texts) => {
                Ok(texts.iter().map(|t| RetrievedChunk::new(*t)).collect())
            }
            SearchBehavior::HttpError(code, reason) => Err(AppError::Retrieval {
                status: Some(*code),
                reason: reason.to_string(),
            }),
            SearchBehavior::Malformed => Err(AppError::MalformedResponse(
                "Retrieval response has no 'scored_chunks' field".to_string(),
            )),
        }
    }

    async fn document_status(&self, _document_id: &str) -> AppResult<IndexingStatus> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        let mut statuses = self.statuses.lock().unwrap();
        let next = if statuses.len() > 1 {
            statuses.pop_front()
        } else {
            statuses.front().copied()
        };
        Ok(IndexingStatus::from_remote(next.unwrap_or("pending")))
    }
}

/// Generation fake that records every request.
///
/// With a key attached it reads the secret per request, the way the HTTP
/// client builds its bearer header, and records what it read.
pub struct FakeLlm {
    reply: Result<&'static str, &'static str>,
    api_key: Option<SharedSecret>,
    pub calls: AtomicUsize,
    pub requests: Mutex<Vec<LlmRequest>>,
    pub bearer_tokens: Mutex<Vec<String>>,
}

impl FakeLlm {
    pub fn replying(text: &'static str) -> Self {
        Self {
            reply: Ok(text),
            api_key: None,
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
            bearer_tokens: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &'static str) -> Self {
        Self {
            reply: Err(message),
            api_key: None,
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
            bearer_tokens: Mutex::new(Vec::new()),
        }
    }

    pub fn with_api_key(mut self, key: SharedSecret) -> Self {
        self.api_key = Some(key);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// System message of the most recent request.
    pub fn last_system_prompt(&self) -> Option<String> {
        self.requests.lock().unwrap().last().and_then(|request| {
            request
                .messages
                .iter()
                .find(|m| m.role == ChatRole::System)
                .map(|m| m.content.clone())
        })
    }
}

#[async_trait]
impl LlmClient for FakeLlm {
    fn provider_name(&self) -> &str {
        "fake"
    }

    async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());
        if let Some(key) = &self.api_key {
            self.bearer_tokens.lock().unwrap().push(key.get());
        }

        match self.reply {
            Ok(text) => Ok(LlmResponse {
                content: text.to_string(),
                model: request.model.clone(),
                usage: LlmUsage::new(10, 5),
            }),
            Err(message) => Err(AppError::Generation(message.to_string())),
        }
    }
}
