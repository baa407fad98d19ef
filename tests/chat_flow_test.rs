//! End-to-end tests for the chat endpoint
//!
//! The completion provider is mocked; everything else (routing, SSE
//! relay, bookkeeping, persistence) is the real stack.

use std::path::PathBuf;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::stream::Stream;
use uuid::Uuid;

use medchat::llm::{
    FinishReason, GenerateRequest, LlmError, LlmProvider, StreamEvent, UsageMetadata,
};
use medchat::models::Role;
use medchat::routes::{configure_routes, AppState};
use medchat::store::ChatStore;
use medchat::usage_log::{UsageLog, UsageRecord};

/// Provider that streams a canned reply
struct MockProvider;

#[async_trait]
impl LlmProvider for MockProvider {
    async fn stream_generate(
        &self,
        _request: GenerateRequest,
    ) -> Result<Pin<Box<dyn Stream<Item = Result<StreamEvent, LlmError>> + Send + Sync>>, LlmError> {
        let events = vec![
            Ok(StreamEvent::TextDelta {
                text: "The typical adult dose ".to_string(),
            }),
            Ok(StreamEvent::TextDelta {
                text: "is 500mg every 8 hours.".to_string(),
            }),
            Ok(StreamEvent::MessageEnd {
                finish_reason: FinishReason::Stop,
                usage: UsageMetadata {
                    input_tokens: Some(42),
                    output_tokens: Some(12),
                    total_tokens: Some(54),
                    reasoning_tokens: None,
                    cached_input_tokens: None,
                },
            }),
        ];
        Ok(Box::pin(futures::stream::iter(events)))
    }
}

/// Provider that fails before any token is produced
struct FailingProvider;

#[async_trait]
impl LlmProvider for FailingProvider {
    async fn stream_generate(
        &self,
        _request: GenerateRequest,
    ) -> Result<Pin<Box<dyn Stream<Item = Result<StreamEvent, LlmError>> + Send + Sync>>, LlmError> {
        Err(LlmError::HttpError {
            status: 500,
            body: "upstream exploded".to_string(),
        })
    }
}

fn test_state(provider: Arc<dyn LlmProvider>) -> (AppState, PathBuf) {
    let usage_log_path =
        std::env::temp_dir().join(format!("medchat-test-usage-{}.log", Uuid::new_v4()));
    let state = AppState {
        store: ChatStore::open_in_memory().expect("in-memory store"),
        usage_log: UsageLog::new(&usage_log_path),
        provider,
    };
    (state, usage_log_path)
}

fn chat_body() -> serde_json::Value {
    serde_json::json!({
        "messages": [
            {"role": "user", "parts": [{"type": "text", "text": "What is the dosage for amoxicillin?"}]}
        ],
        "chatId": "c1",
        "role": "doctor",
        "patientId": "p1"
    })
}

#[tokio::test]
async fn test_chat_streams_reply_and_persists_exchange() {
    let (state, usage_log_path) = test_state(Arc::new(MockProvider));
    let store = state.store.clone();
    let routes = configure_routes(state);

    let response = warp::test::request()
        .method("POST")
        .path("/chat")
        .json(&chat_body())
        .reply(&routes)
        .await;

    assert_eq!(response.status(), 200);

    let body = String::from_utf8(response.body().to_vec()).expect("utf-8 body");
    assert!(body.contains("event: text"), "body was: {body}");
    assert!(body.contains("The typical adult dose"));
    assert!(body.contains("event: done"));

    // Bookkeeping runs on detached tasks after the stream completes
    tokio::time::sleep(Duration::from_millis(200)).await;

    let record = store
        .get("c1")
        .expect("store read")
        .expect("conversation persisted");
    assert_eq!(record.role, Role::Doctor);
    assert_eq!(record.patient_id, "p1");
    assert_eq!(record.messages.len(), 2);
    assert_eq!(
        record.messages[1].text(),
        "The typical adult dose is 500mg every 8 hours."
    );
    assert_eq!(
        record.last_message.as_deref(),
        Some("The typical adult dose is 500mg every 8 hours.")
    );

    let log_contents = tokio::fs::read_to_string(&usage_log_path)
        .await
        .expect("usage log written");
    let lines: Vec<&str> = log_contents.lines().collect();
    assert_eq!(lines.len(), 1);

    let usage: UsageRecord = serde_json::from_str(lines[0]).expect("valid usage record");
    assert_eq!(usage.role, Role::Doctor);
    assert_eq!(usage.conversation_id, "c1");
    assert_eq!(usage.patient_id, "p1");
    assert_eq!(
        usage.last_user_text.as_deref(),
        Some("What is the dosage for amoxicillin?")
    );
    assert_eq!(usage.usage.input_tokens, Some(42));
    assert!(usage.cost_usd > 0.0);

    let _ = tokio::fs::remove_file(&usage_log_path).await;
}

#[tokio::test]
async fn test_second_exchange_replaces_thread() {
    let (state, usage_log_path) = test_state(Arc::new(MockProvider));
    let store = state.store.clone();
    let routes = configure_routes(state);

    warp::test::request()
        .method("POST")
        .path("/chat")
        .json(&chat_body())
        .reply(&routes)
        .await;
    tokio::time::sleep(Duration::from_millis(200)).await;

    // Follow-up carries the whole thread plus a new user turn
    let follow_up = serde_json::json!({
        "messages": [
            {"role": "user", "parts": [{"type": "text", "text": "What is the dosage for amoxicillin?"}]},
            {"role": "assistant", "parts": [{"type": "text", "text": "The typical adult dose is 500mg every 8 hours."}]},
            {"role": "user", "parts": [{"type": "text", "text": "And for children?"}]}
        ],
        "chatId": "c1",
        "role": "doctor",
        "patientId": "p1"
    });

    warp::test::request()
        .method("POST")
        .path("/chat")
        .json(&follow_up)
        .reply(&routes)
        .await;
    tokio::time::sleep(Duration::from_millis(200)).await;

    let record = store.get("c1").unwrap().unwrap();
    assert_eq!(record.messages.len(), 4);

    let _ = tokio::fs::remove_file(&usage_log_path).await;
}

#[tokio::test]
async fn test_unknown_role_is_still_served() {
    let (state, usage_log_path) = test_state(Arc::new(MockProvider));
    let routes = configure_routes(state);

    let mut body = chat_body();
    body["role"] = serde_json::json!("pharmacist");

    let response = warp::test::request()
        .method("POST")
        .path("/chat")
        .json(&body)
        .reply(&routes)
        .await;

    // Unrecognized roles get the receptionist treatment, not an error
    assert_eq!(response.status(), 200);

    let _ = tokio::fs::remove_file(&usage_log_path).await;
}

#[tokio::test]
async fn test_malformed_body_is_client_error() {
    let (state, _usage_log_path) = test_state(Arc::new(MockProvider));
    let routes = configure_routes(state);

    let response = warp::test::request()
        .method("POST")
        .path("/chat")
        .header("content-type", "application/json")
        .body("{\"messages\": []")
        .reply(&routes)
        .await;

    assert_eq!(response.status(), 400);
    let body: serde_json::Value = serde_json::from_slice(response.body()).unwrap();
    assert_eq!(body["error"], "Failed to process chat request");
}

#[tokio::test]
async fn test_missing_field_is_client_error() {
    let (state, _usage_log_path) = test_state(Arc::new(MockProvider));
    let routes = configure_routes(state);

    let response = warp::test::request()
        .method("POST")
        .path("/chat")
        .json(&serde_json::json!({"messages": [], "role": "doctor", "patientId": "p1"}))
        .reply(&routes)
        .await;

    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn test_upstream_failure_before_stream_is_bad_gateway() {
    let (state, _usage_log_path) = test_state(Arc::new(FailingProvider));
    let store = state.store.clone();
    let routes = configure_routes(state);

    let response = warp::test::request()
        .method("POST")
        .path("/chat")
        .json(&chat_body())
        .reply(&routes)
        .await;

    assert_eq!(response.status(), 502);
    let body: serde_json::Value = serde_json::from_slice(response.body()).unwrap();
    assert_eq!(body["error"], "Failed to process chat request");
    assert!(body["details"].as_str().unwrap().contains("upstream exploded"));

    // Nothing was persisted for the failed exchange
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(store.get("c1").unwrap().is_none());
}
