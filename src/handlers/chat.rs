// POST /chat handler

use std::convert::Infallible;
use std::pin::Pin;

use async_stream::stream;
use chrono::Utc;
use futures_util::{Stream, StreamExt};
use uuid::Uuid;
use warp::http::StatusCode;
use warp::Reply;

use crate::accounting;
use crate::llm::openai::OpenAiModel;
use crate::llm::{
    FinishReason, GenerateRequest, GenerationConfig, LlmError, Model, StreamEvent, UsageMetadata,
};
use crate::models::{
    last_user_text, to_model_messages, ChatRequest, ErrorBody, MessagePart, UiMessage, UiRole,
};
use crate::prompts;
use crate::routes::AppState;
use crate::sse::{create_done_event, create_error_event, create_text_event};
use crate::usage_log::UsageRecord;

/// Model every chat request is served with
pub const CHAT_MODEL: Model = Model::OpenAi(OpenAiModel::Gpt4o);

/// Accuracy over creativity
const TEMPERATURE: f32 = 0.4;

pub async fn chat_handler(
    request: ChatRequest,
    state: AppState,
) -> Result<warp::reply::Response, Infallible> {
    tracing::info!(
        chat_id = %request.chat_id,
        role = request.role.as_str(),
        "POST /chat"
    );

    let generate = GenerateRequest {
        messages: to_model_messages(&request.messages),
        system: Some(prompts::compose_system(request.role, &request.patient_id)),
        config: GenerationConfig::new().with_temperature(TEMPERATURE),
    };

    // Failures before the first token are surfaced as a structured JSON
    // error; once streaming starts the response status is already sent.
    let llm_stream = match state.provider.stream_generate(generate).await {
        Ok(stream) => stream,
        Err(e) => {
            tracing::error!(chat_id = %request.chat_id, "completion request failed: {e}");
            let body = ErrorBody::with_details("Failed to process chat request", e.to_string());
            return Ok(warp::reply::with_status(
                warp::reply::json(&body),
                StatusCode::BAD_GATEWAY,
            )
            .into_response());
        }
    };

    let events = relay_stream(state, request, llm_stream);
    Ok(warp::sse::reply(warp::sse::keep_alive().stream(events)).into_response())
}

/// Relay the provider stream to the client, accumulating the assistant
/// turn for post-stream bookkeeping
fn relay_stream(
    state: AppState,
    request: ChatRequest,
    mut llm_stream: Pin<Box<dyn Stream<Item = Result<StreamEvent, LlmError>> + Send + Sync>>,
) -> impl Stream<Item = Result<warp::sse::Event, Infallible>> + Send + Sync {
    stream! {
        let assistant_id = Uuid::new_v4().to_string();
        let mut assistant_text = String::new();

        while let Some(event) = llm_stream.next().await {
            match event {
                Ok(StreamEvent::TextDelta { text }) => {
                    assistant_text.push_str(&text);
                    yield create_text_event(&assistant_id, &text);
                }
                Ok(StreamEvent::MessageEnd { finish_reason, usage }) => {
                    finish_exchange(
                        &state,
                        &request,
                        assistant_id,
                        assistant_text,
                        finish_reason.clone(),
                        usage,
                    );
                    yield create_done_event(&finish_reason);
                    return;
                }
                Err(e) => {
                    tracing::error!(
                        chat_id = %request.chat_id,
                        "completion stream failed: {e}"
                    );
                    yield create_error_event("Completion stream failed");
                    return;
                }
            }
        }
    }
}

/// Post-stream bookkeeping: usage logging and thread persistence
///
/// Launched as two independent tasks. A failure in either is traced and
/// dropped; it never cancels the other task or corrupts the response the
/// client already received.
fn finish_exchange(
    state: &AppState,
    request: &ChatRequest,
    assistant_id: String,
    assistant_text: String,
    finish_reason: FinishReason,
    usage: UsageMetadata,
) {
    let cost = accounting::estimate_cost(&CHAT_MODEL, usage.input_tokens, usage.output_tokens);
    let record = UsageRecord {
        timestamp: Utc::now(),
        model: CHAT_MODEL.as_str().to_string(),
        finish_reason,
        role: request.role,
        patient_id: request.patient_id.clone(),
        conversation_id: request.chat_id.clone(),
        last_user_text: last_user_text(&request.messages),
        assistant_text: assistant_text.clone(),
        usage,
        cost_usd: cost,
    };

    let usage_log = state.usage_log.clone();
    tokio::spawn(async move {
        if let Err(e) = usage_log.append(&record).await {
            tracing::error!("failed to write usage record: {e}");
        }
    });

    let mut thread = request.messages.clone();
    thread.push(UiMessage {
        id: Some(assistant_id),
        role: UiRole::Assistant,
        parts: vec![MessagePart::Text {
            text: assistant_text,
        }],
    });

    let store = state.store.clone();
    let chat_id = request.chat_id.clone();
    let role = request.role;
    let patient_id = request.patient_id.clone();
    tokio::spawn(async move {
        let result =
            tokio::task::spawn_blocking(move || store.upsert(&chat_id, role, &patient_id, &thread))
                .await;
        match result {
            Ok(Ok(())) => {}
            Ok(Err(e)) => tracing::error!("failed to persist conversation: {e}"),
            Err(e) => tracing::error!("conversation persistence task failed: {e}"),
        }
    });
}
