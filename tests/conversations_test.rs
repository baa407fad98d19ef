//! Integration tests for the conversation query endpoints

use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::stream::Stream;
use uuid::Uuid;

use medchat::llm::{GenerateRequest, LlmError, LlmProvider, StreamEvent};
use medchat::models::{MessagePart, Role, UiMessage, UiRole};
use medchat::routes::{configure_routes, AppState};
use medchat::store::ChatStore;
use medchat::usage_log::UsageLog;

/// The query endpoints never touch the provider
struct UnusedProvider;

#[async_trait]
impl LlmProvider for UnusedProvider {
    async fn stream_generate(
        &self,
        _request: GenerateRequest,
    ) -> Result<Pin<Box<dyn Stream<Item = Result<StreamEvent, LlmError>> + Send + Sync>>, LlmError> {
        unreachable!("query endpoints must not call the provider")
    }
}

fn test_state() -> AppState {
    let usage_log_path =
        std::env::temp_dir().join(format!("medchat-test-usage-{}.log", Uuid::new_v4()));
    AppState {
        store: ChatStore::open_in_memory().expect("in-memory store"),
        usage_log: UsageLog::new(usage_log_path),
        provider: Arc::new(UnusedProvider),
    }
}

fn message(role: UiRole, text: &str) -> UiMessage {
    UiMessage {
        id: None,
        role,
        parts: vec![MessagePart::Text {
            text: text.to_string(),
        }],
    }
}

#[tokio::test]
async fn test_list_conversations_returns_summaries_in_order() {
    let state = test_state();
    let store = state.store.clone();
    let routes = configure_routes(state);

    store
        .upsert("a", Role::Doctor, "p1", &[message(UiRole::User, "older")])
        .unwrap();
    std::thread::sleep(Duration::from_millis(5));
    store
        .upsert("b", Role::Nurse, "p2", &[message(UiRole::User, "newer")])
        .unwrap();

    let response = warp::test::request()
        .method("GET")
        .path("/conversations")
        .reply(&routes)
        .await;

    assert_eq!(response.status(), 200);
    let body: serde_json::Value = serde_json::from_slice(response.body()).unwrap();
    let summaries = body.as_array().unwrap();
    assert_eq!(summaries.len(), 2);
    assert_eq!(summaries[0]["id"], "b");
    assert_eq!(summaries[1]["id"], "a");
    // Summaries carry metadata, not the thread body
    assert!(summaries[0].get("messages").is_none());
    assert_eq!(summaries[0]["patientId"], "p2");
}

#[tokio::test]
async fn test_list_conversations_empty_store() {
    let state = test_state();
    let routes = configure_routes(state);

    let response = warp::test::request()
        .method("GET")
        .path("/conversations")
        .reply(&routes)
        .await;

    assert_eq!(response.status(), 200);
    let body: serde_json::Value = serde_json::from_slice(response.body()).unwrap();
    assert_eq!(body.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_get_conversation_returns_full_record() {
    let state = test_state();
    let store = state.store.clone();
    let routes = configure_routes(state);

    let thread = vec![
        message(UiRole::User, "When is my appointment?"),
        message(UiRole::Assistant, "Tomorrow at 9am."),
    ];
    store
        .upsert("c1", Role::Receptionist, "p1", &thread)
        .unwrap();

    let response = warp::test::request()
        .method("GET")
        .path("/conversations/c1")
        .reply(&routes)
        .await;

    assert_eq!(response.status(), 200);
    let body: serde_json::Value = serde_json::from_slice(response.body()).unwrap();
    assert_eq!(body["id"], "c1");
    assert_eq!(body["role"], "receptionist");
    assert_eq!(body["messages"].as_array().unwrap().len(), 2);
    assert_eq!(body["messages"][0]["parts"][0]["text"], "When is my appointment?");
    assert_eq!(body["lastMessage"], "Tomorrow at 9am.");
}

#[tokio::test]
async fn test_get_unknown_conversation_is_not_found() {
    let state = test_state();
    let routes = configure_routes(state);

    let response = warp::test::request()
        .method("GET")
        .path("/conversations/missing")
        .reply(&routes)
        .await;

    assert_eq!(response.status(), 404);
    let body: serde_json::Value = serde_json::from_slice(response.body()).unwrap();
    assert_eq!(body["error"], "Conversation not found");
}
