//! End-to-end behavior of `ingest` and `answer` against fake services.

use super::fakes::{FakeLlm, FakeRetrieval, SearchBehavior, SubmitBehavior};
use crate::rag::{Answer, PipelineOptions, RagPipeline, SettlePolicy, NO_INFORMATION_ANSWER};
use crate::types::{IndexMode, IndexingStatus, FALLBACK_DOCUMENT_NAME};
use ragline_core::{AppError, SharedSecret, Stage};
use ragline_llm::{GenerationGateway, GenerationSettings};
use std::sync::Arc;
use std::time::{Duration, Instant};

fn pipeline_with(
    retrieval: Arc<FakeRetrieval>,
    llm: Arc<FakeLlm>,
    settle: SettlePolicy,
) -> RagPipeline {
    let options = PipelineOptions {
        settle,
        ..PipelineOptions::default()
    };
    RagPipeline::new(
        retrieval,
        GenerationGateway::new(llm, GenerationSettings::default()),
        options,
    )
}

fn no_wait() -> SettlePolicy {
    SettlePolicy::Fixed(Duration::ZERO)
}

#[tokio::test]
async fn test_empty_retrieval_returns_sentinel_without_generation() {
    let retrieval = Arc::new(FakeRetrieval::searching(vec![]));
    let llm = Arc::new(FakeLlm::replying("should never be used"));
    let pipeline = pipeline_with(retrieval.clone(), llm.clone(), no_wait());

    let answer = pipeline.answer("What is the capital of France?").await.unwrap();

    assert_eq!(answer, Answer::NoInformation);
    assert_eq!(answer.text(), NO_INFORMATION_ANSWER);
    assert_eq!(answer.text(), "No relevant information found for your query.");
    assert_eq!(retrieval.searches(), 1);
    assert_eq!(llm.call_count(), 0);
}

#[tokio::test]
async fn test_grounded_answer_embeds_chunks_in_order() {
    let retrieval = Arc::new(FakeRetrieval::searching(vec![
        "Paris is the capital of France.",
        "It has a population of 2.1 million.",
    ]));
    let llm = Arc::new(FakeLlm::replying("The capital of France is **Paris**."));
    let pipeline = pipeline_with(retrieval.clone(), llm.clone(), no_wait());

    let answer = pipeline.answer("What is the capital of France?").await.unwrap();

    assert_eq!(
        answer,
        Answer::Generated("The capital of France is **Paris**.".to_string())
    );
    assert_eq!(llm.call_count(), 1);

    let prompt = llm.last_system_prompt().expect("system prompt sent");
    let first = prompt.find("Paris is the capital of France.").unwrap();
    let second = prompt.find("It has a population of 2.1 million.").unwrap();
    assert!(first < second);

    let requests = llm.requests.lock().unwrap();
    let user = &requests[0].messages[1];
    assert_eq!(user.content, "What is the capital of France?");
}

#[tokio::test]
async fn test_rotated_generation_key_used_by_next_answer() {
    let key = SharedSecret::new("sk-first", "generation API key").unwrap();
    let retrieval = Arc::new(FakeRetrieval::searching(vec!["Paris is the capital of France."]));
    let llm = Arc::new(FakeLlm::replying("Paris.").with_api_key(key.clone()));
    let pipeline = pipeline_with(retrieval, llm.clone(), no_wait());

    pipeline.answer("What is the capital of France?").await.unwrap();
    key.rotate("sk-second", "generation API key").unwrap();
    pipeline.answer("What is the capital of France?").await.unwrap();

    let tokens = llm.bearer_tokens.lock().unwrap();
    assert_eq!(*tokens, vec!["sk-first".to_string(), "sk-second".to_string()]);
    assert_eq!(llm.call_count(), 2);
}

#[tokio::test]
async fn test_answer_uses_default_scope() {
    let retrieval = Arc::new(FakeRetrieval::searching(vec![]));
    let llm = Arc::new(FakeLlm::replying("unused"));
    let pipeline = pipeline_with(retrieval.clone(), llm, no_wait());

    pipeline.answer("q").await.unwrap();
    pipeline.answer_in_scope("q", "handbook").await.unwrap();

    let scopes = retrieval.scopes.lock().unwrap();
    assert_eq!(*scopes, vec!["tutorial".to_string(), "handbook".to_string()]);
}

#[tokio::test]
async fn test_retrieval_error_stops_before_generation() {
    let retrieval = Arc::new(FakeRetrieval::new(
        SearchBehavior::HttpError(500, "Internal Server Error"),
        SubmitBehavior::Reject(500, "unused"),
    ));
    let llm = Arc::new(FakeLlm::replying("unused"));
    let pipeline = pipeline_with(retrieval, llm.clone(), no_wait());

    let err = pipeline.answer("q").await.unwrap_err();

    assert!(matches!(err, AppError::Retrieval { status: Some(500), .. }));
    assert_eq!(err.stage(), Stage::Retrieval);
    assert_eq!(llm.call_count(), 0);
}

#[tokio::test]
async fn test_malformed_retrieval_stops_before_generation() {
    let retrieval = Arc::new(FakeRetrieval::new(
        SearchBehavior::Malformed,
        SubmitBehavior::Reject(500, "unused"),
    ));
    let llm = Arc::new(FakeLlm::replying("unused"));
    let pipeline = pipeline_with(retrieval, llm.clone(), no_wait());

    let err = pipeline.answer("q").await.unwrap_err();

    assert_eq!(err.stage(), Stage::MalformedResponse);
    assert_eq!(llm.call_count(), 0);
}

#[tokio::test]
async fn test_generation_failure_is_surfaced() {
    let retrieval = Arc::new(FakeRetrieval::searching(vec!["some passage"]));
    let llm = Arc::new(FakeLlm::failing("429 rate limited"));
    let pipeline = pipeline_with(retrieval, llm.clone(), no_wait());

    let err = pipeline.answer("q").await.unwrap_err();

    assert_eq!(err.stage(), Stage::Generation);
    assert!(err.to_string().contains("429 rate limited"));
    assert_eq!(llm.call_count(), 1);
}

#[tokio::test]
async fn test_ingest_derives_display_name() {
    let retrieval = Arc::new(FakeRetrieval::searching(vec![]));
    let llm = Arc::new(FakeLlm::replying("unused"));
    let pipeline = pipeline_with(retrieval.clone(), llm.clone(), no_wait());

    let receipt = pipeline
        .ingest("https://docs.example.com/guide.pdf", None, IndexMode::Fast)
        .await
        .unwrap();

    assert_eq!(receipt.display_name, "guide.pdf");
    assert_eq!(receipt.document_id.as_deref(), Some("doc-1"));

    let submitted = retrieval.submitted.lock().unwrap();
    assert_eq!(submitted.len(), 1);
    assert_eq!(submitted[0].display_name, "guide.pdf");
    assert_eq!(submitted[0].index_mode, IndexMode::Fast);
    assert_eq!(llm.call_count(), 0);
}

#[tokio::test]
async fn test_ingest_root_url_uses_fallback_name() {
    let retrieval = Arc::new(FakeRetrieval::searching(vec![]));
    let pipeline = pipeline_with(
        retrieval.clone(),
        Arc::new(FakeLlm::replying("unused")),
        no_wait(),
    );

    let receipt = pipeline
        .ingest("https://example.com/", None, IndexMode::Accurate)
        .await
        .unwrap();

    assert_eq!(receipt.display_name, FALLBACK_DOCUMENT_NAME);
    assert!(!receipt.display_name.is_empty());
}

#[tokio::test]
async fn test_ingest_rejection_fails_without_settle_wait() {
    let retrieval = Arc::new(FakeRetrieval::new(
        SearchBehavior::Chunks(vec![]),
        SubmitBehavior::Reject(403, "Forbidden"),
    ));
    let pipeline = pipeline_with(
        retrieval.clone(),
        Arc::new(FakeLlm::replying("unused")),
        SettlePolicy::Fixed(Duration::from_secs(10)),
    );

    let start = Instant::now();
    let err = pipeline
        .ingest("https://docs.example.com/guide.pdf", None, IndexMode::Fast)
        .await
        .unwrap_err();

    assert!(start.elapsed() < Duration::from_secs(2));
    assert_eq!(err.http_status(), Some(403));
    assert_eq!(err.stage(), Stage::Ingestion);
    assert_eq!(err.to_string(), "Document upload failed: 403 Forbidden");
    assert_eq!(retrieval.submits(), 1);
}

#[tokio::test]
async fn test_ingest_waits_settle_time_after_success() {
    let retrieval = Arc::new(FakeRetrieval::searching(vec![]));
    let pipeline = pipeline_with(
        retrieval,
        Arc::new(FakeLlm::replying("unused")),
        SettlePolicy::Fixed(Duration::from_millis(60)),
    );

    let start = Instant::now();
    pipeline
        .ingest("https://docs.example.com/guide.pdf", None, IndexMode::Fast)
        .await
        .unwrap();

    assert!(start.elapsed() >= Duration::from_millis(60));
}

#[tokio::test]
async fn test_invalid_url_never_reaches_service() {
    let retrieval = Arc::new(FakeRetrieval::searching(vec![]));
    let pipeline = pipeline_with(
        retrieval.clone(),
        Arc::new(FakeLlm::replying("unused")),
        no_wait(),
    );

    let err = pipeline
        .ingest("guide.pdf", None, IndexMode::Fast)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::InvalidDocument(_)));
    assert_eq!(retrieval.submits(), 0);
}

#[tokio::test]
async fn test_poll_until_searchable() {
    let retrieval = Arc::new(
        FakeRetrieval::searching(vec![]).with_statuses(&["partitioning", "chunked", "indexed"]),
    );
    let pipeline = pipeline_with(
        retrieval.clone(),
        Arc::new(FakeLlm::replying("unused")),
        SettlePolicy::Poll {
            interval: Duration::from_millis(5),
            timeout: Duration::from_secs(5),
        },
    );

    let receipt = pipeline
        .ingest("https://docs.example.com/guide.pdf", None, IndexMode::Fast)
        .await
        .unwrap();

    assert_eq!(receipt.status, IndexingStatus::Indexed("indexed".to_string()));
    assert_eq!(retrieval.status_checks(), 3);
}

#[tokio::test]
async fn test_poll_reports_remote_failure() {
    let retrieval =
        Arc::new(FakeRetrieval::searching(vec![]).with_statuses(&["partitioning", "failed"]));
    let pipeline = pipeline_with(
        retrieval,
        Arc::new(FakeLlm::replying("unused")),
        SettlePolicy::Poll {
            interval: Duration::from_millis(5),
            timeout: Duration::from_secs(5),
        },
    );

    let err = pipeline
        .ingest("https://docs.example.com/guide.pdf", None, IndexMode::Fast)
        .await
        .unwrap_err();

    match err {
        AppError::Indexing {
            document_id,
            status,
        } => {
            assert_eq!(document_id, "doc-1");
            assert_eq!(status, "failed");
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[tokio::test]
async fn test_poll_times_out() {
    let retrieval = Arc::new(FakeRetrieval::searching(vec![]).with_statuses(&["pending"]));
    let pipeline = pipeline_with(
        retrieval.clone(),
        Arc::new(FakeLlm::replying("unused")),
        SettlePolicy::Poll {
            interval: Duration::from_millis(5),
            timeout: Duration::from_millis(40),
        },
    );

    let err = pipeline
        .ingest("https://docs.example.com/guide.pdf", None, IndexMode::Fast)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Indexing { .. }));
    assert!(retrieval.status_checks() >= 1);
}

#[tokio::test]
async fn test_poll_without_document_id_is_malformed() {
    let retrieval = Arc::new(FakeRetrieval::new(
        SearchBehavior::Chunks(vec![]),
        SubmitBehavior::Accept {
            id: None,
            status: "pending",
        },
    ));
    let pipeline = pipeline_with(
        retrieval.clone(),
        Arc::new(FakeLlm::replying("unused")),
        SettlePolicy::Poll {
            interval: Duration::from_millis(5),
            timeout: Duration::from_secs(1),
        },
    );

    let err = pipeline
        .ingest("https://docs.example.com/guide.pdf", None, IndexMode::Fast)
        .await
        .unwrap_err();

    assert_eq!(err.stage(), Stage::MalformedResponse);
    assert_eq!(retrieval.status_checks(), 0);
}
