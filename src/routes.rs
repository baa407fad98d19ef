// Route definitions and shared request state

use std::convert::Infallible;
use std::sync::Arc;

use warp::http::StatusCode;
use warp::{Filter, Rejection, Reply};

use crate::handlers;
use crate::llm::LlmProvider;
use crate::models::ErrorBody;
use crate::store::ChatStore;
use crate::usage_log::UsageLog;

/// Per-process resources, opened once at startup and cloned into each
/// request handler
#[derive(Clone)]
pub struct AppState {
    pub store: ChatStore,
    pub usage_log: UsageLog,
    pub provider: Arc<dyn LlmProvider>,
}

pub fn configure_routes(
    state: AppState,
) -> impl Filter<Extract = impl warp::Reply, Error = Infallible> + Clone {
    let with_state = warp::any().map(move || state.clone());

    // POST /chat
    let chat = warp::path("chat")
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::body::json())
        .and(with_state.clone())
        .and_then(handlers::chat_handler);

    // GET /conversations
    let list_conversations = warp::path("conversations")
        .and(warp::path::end())
        .and(warp::get())
        .and(with_state.clone())
        .and_then(handlers::list_conversations_handler);

    // GET /conversations/{id}
    let get_conversation = warp::path("conversations")
        .and(warp::path::param::<String>())
        .and(warp::path::end())
        .and(warp::get())
        .and(with_state)
        .and_then(handlers::get_conversation_handler);

    // Combine routes
    chat.or(list_conversations)
        .or(get_conversation)
        .recover(handle_rejection)
}

/// Convert filter rejections into the structured JSON error envelope
async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    let (status, body) = if err.is_not_found() {
        (StatusCode::NOT_FOUND, ErrorBody::new("Not found"))
    } else if let Some(e) = err.find::<warp::filters::body::BodyDeserializeError>() {
        (
            StatusCode::BAD_REQUEST,
            ErrorBody::with_details("Failed to process chat request", e.to_string()),
        )
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        (
            StatusCode::METHOD_NOT_ALLOWED,
            ErrorBody::new("Method not allowed"),
        )
    } else {
        tracing::error!("unhandled rejection: {err:?}");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorBody::new("Failed to process chat request"),
        )
    };

    Ok(warp::reply::with_status(warp::reply::json(&body), status))
}
