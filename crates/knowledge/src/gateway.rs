//! Retrieval service abstraction.
//!
//! [`RetrievalGateway`] is the seam between the pipeline and the remote
//! indexing/retrieval service. [`TimedRetrieval`] wraps any gateway and
//! reports search latency out of band, leaving results untouched.

use crate::types::{DocumentRef, IndexingStatus, RemoteDocumentHandle, RetrievedChunk};
use async_trait::async_trait;
use ragline_core::AppResult;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Remote indexing and retrieval operations.
#[async_trait]
pub trait RetrievalGateway: Send + Sync {
    /// Submit a document for indexing.
    ///
    /// Returns once the service has accepted the document; indexing
    /// continues remotely. Never retried.
    async fn submit(&self, document: &DocumentRef) -> AppResult<RemoteDocumentHandle>;

    /// Fetch passages for a query within a scope, in server rank order.
    async fn search(&self, query: &str, scope: &str) -> AppResult<Vec<RetrievedChunk>>;

    /// Current indexing state of a submitted document.
    async fn document_status(&self, document_id: &str) -> AppResult<IndexingStatus>;
}

/// One timed search call.
#[derive(Debug, Clone, PartialEq)]
pub struct LatencySample {
    pub scope: String,
    pub elapsed: Duration,
    pub succeeded: bool,
}

/// Callback receiving latency samples.
pub type LatencyHook = Arc<dyn Fn(&LatencySample) + Send + Sync>;

/// Gateway decorator that measures wall-clock time of each search.
///
/// Every sample is logged at info level and forwarded to the optional
/// hook. The wrapped result is returned as is.
pub struct TimedRetrieval<G> {
    inner: G,
    hook: Option<LatencyHook>,
}

impl<G: RetrievalGateway> TimedRetrieval<G> {
    pub fn new(inner: G) -> Self {
        Self { inner, hook: None }
    }

    pub fn with_hook(mut self, hook: LatencyHook) -> Self {
        self.hook = Some(hook);
        self
    }
}

#[async_trait]
impl<G: RetrievalGateway> RetrievalGateway for TimedRetrieval<G> {
    async fn submit(&self, document: &DocumentRef) -> AppResult<RemoteDocumentHandle> {
        self.inner.submit(document).await
    }

    async fn search(&self, query: &str, scope: &str) -> AppResult<Vec<RetrievedChunk>> {
        let start = Instant::now();
        let result = self.inner.search(query, scope).await;
        let sample = LatencySample {
            scope: scope.to_string(),
            elapsed: start.elapsed(),
            succeeded: result.is_ok(),
        };

        tracing::info!(
            scope = %sample.scope,
            elapsed_secs = sample.elapsed.as_secs_f64(),
            succeeded = sample.succeeded,
            "Time taken to retrieve document information: {:.2} seconds",
            sample.elapsed.as_secs_f64()
        );

        if let Some(hook) = &self.hook {
            hook(&sample);
        }

        result
    }

    async fn document_status(&self, document_id: &str) -> AppResult<IndexingStatus> {
        self.inner.document_status(document_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ragline_core::AppError;
    use std::sync::Mutex;

    struct StaticGateway {
        fail: bool,
    }

    #[async_trait]
    impl RetrievalGateway for StaticGateway {
        async fn submit(&self, _document: &DocumentRef) -> AppResult<RemoteDocumentHandle> {
            Ok(RemoteDocumentHandle {
                id: None,
                status: IndexingStatus::Pending("pending".to_string()),
            })
        }

        async fn search(&self, _query: &str, _scope: &str) -> AppResult<Vec<RetrievedChunk>> {
            tokio::time::sleep(Duration::from_millis(15)).await;
            if self.fail {
                Err(AppError::Retrieval {
                    status: Some(503),
                    reason: "Service Unavailable".to_string(),
                })
            } else {
                Ok(vec![RetrievedChunk::new("b"), RetrievedChunk::new("a")])
            }
        }

        async fn document_status(&self, _document_id: &str) -> AppResult<IndexingStatus> {
            Ok(IndexingStatus::Ready)
        }
    }

    fn recording_hook() -> (LatencyHook, Arc<Mutex<Vec<LatencySample>>>) {
        let samples = Arc::new(Mutex::new(Vec::new()));
        let sink = samples.clone();
        let hook: LatencyHook = Arc::new(move |sample: &LatencySample| {
            sink.lock().unwrap().push(sample.clone());
        });
        (hook, samples)
    }

    #[tokio::test]
    async fn test_latency_reported_without_touching_results() {
        let (hook, samples) = recording_hook();
        let gateway = TimedRetrieval::new(StaticGateway { fail: false }).with_hook(hook);

        let chunks = gateway.search("q", "tutorial").await.unwrap();
        assert_eq!(chunks, vec![RetrievedChunk::new("b"), RetrievedChunk::new("a")]);

        let samples = samples.lock().unwrap();
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].scope, "tutorial");
        assert!(samples[0].succeeded);
        assert!(samples[0].elapsed >= Duration::from_millis(15));
    }

    #[tokio::test]
    async fn test_latency_reported_on_failure_and_error_kept() {
        let (hook, samples) = recording_hook();
        let gateway = TimedRetrieval::new(StaticGateway { fail: true }).with_hook(hook);

        let err = gateway.search("q", "tutorial").await.unwrap_err();
        assert_eq!(err.http_status(), Some(503));

        let samples = samples.lock().unwrap();
        assert_eq!(samples.len(), 1);
        assert!(!samples[0].succeeded);
    }

    #[tokio::test]
    async fn test_submit_passes_through_untimed() {
        let (hook, samples) = recording_hook();
        let gateway = TimedRetrieval::new(StaticGateway { fail: false }).with_hook(hook);

        let doc = DocumentRef::new("https://example.com/a.pdf", None, Default::default()).unwrap();
        gateway.submit(&doc).await.unwrap();
        assert!(samples.lock().unwrap().is_empty());
    }
}
