// GET /conversations and GET /conversations/{id} handlers

use std::convert::Infallible;

use warp::http::StatusCode;
use warp::Reply;

use crate::models::ErrorBody;
use crate::routes::AppState;

pub async fn list_conversations_handler(
    state: AppState,
) -> Result<warp::reply::Response, Infallible> {
    tracing::info!("GET /conversations");

    match state.store.list() {
        Ok(summaries) => Ok(warp::reply::with_status(
            warp::reply::json(&summaries),
            StatusCode::OK,
        )
        .into_response()),
        Err(e) => {
            tracing::error!("failed to list conversations: {e}");
            let body = ErrorBody::new("Failed to list conversations");
            Ok(warp::reply::with_status(
                warp::reply::json(&body),
                StatusCode::INTERNAL_SERVER_ERROR,
            )
            .into_response())
        }
    }
}

pub async fn get_conversation_handler(
    id: String,
    state: AppState,
) -> Result<warp::reply::Response, Infallible> {
    tracing::info!(conversation_id = %id, "GET /conversations/{id}");

    match state.store.get(&id) {
        Ok(Some(record)) => Ok(warp::reply::with_status(
            warp::reply::json(&record),
            StatusCode::OK,
        )
        .into_response()),
        Ok(None) => {
            let body = ErrorBody::new("Conversation not found");
            Ok(warp::reply::with_status(
                warp::reply::json(&body),
                StatusCode::NOT_FOUND,
            )
            .into_response())
        }
        Err(e) => {
            tracing::error!(conversation_id = %id, "failed to load conversation: {e}");
            let body = ErrorBody::new("Failed to load conversation");
            Ok(warp::reply::with_status(
                warp::reply::json(&body),
                StatusCode::INTERNAL_SERVER_ERROR,
            )
            .into_response())
        }
    }
}
