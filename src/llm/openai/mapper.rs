//! Mapping between abstraction types and OpenAI-specific types

use crate::llm::core::types::{
    ContentBlock, FinishReason, GenerateRequest, Message, MessageRole, UsageMetadata,
};

use super::types::{ChatCompletionRequest, OpenAiMessage, OpenAiUsage, StreamOptions};

/// Convert our abstraction request to the chat-completions request format
///
/// The system text becomes a leading `system` message, and usage reporting
/// is always opted into so the accountant downstream has counts to work with.
pub fn to_openai_request(request: GenerateRequest, model: &str) -> ChatCompletionRequest {
    let mut messages = Vec::with_capacity(request.messages.len() + 1);

    if let Some(system) = request.system {
        messages.push(OpenAiMessage {
            role: "system".to_string(),
            content: system,
        });
    }

    messages.extend(request.messages.into_iter().map(to_openai_message));

    ChatCompletionRequest {
        model: model.to_string(),
        messages,
        temperature: request.config.temperature,
        top_p: request.config.top_p,
        max_tokens: request.config.max_tokens,
        stream: true,
        stream_options: Some(StreamOptions {
            include_usage: true,
        }),
    }
}

/// Convert our Message to the chat-completions message shape
fn to_openai_message(message: Message) -> OpenAiMessage {
    let role = match message.role {
        MessageRole::User => "user",
        MessageRole::Assistant => "assistant",
        MessageRole::System => "system",
    };

    let content = message
        .content
        .into_iter()
        .map(|block| match block {
            ContentBlock::Text { text } => text,
        })
        .collect::<Vec<_>>()
        .join(" ");

    OpenAiMessage {
        role: role.to_string(),
        content,
    }
}

/// Normalize provider usage into the abstraction's usage metadata
///
/// This is the single place where the provider's field-naming drift is
/// resolved (the serde aliases on `OpenAiUsage` accept either spelling).
/// Missing counts stay missing rather than defaulting to zero, so callers
/// can distinguish "zero tokens" from "not reported".
pub fn normalize_usage(usage: OpenAiUsage) -> UsageMetadata {
    let total_tokens = usage.total_tokens.or_else(|| {
        match (usage.prompt_tokens, usage.completion_tokens) {
            (Some(input), Some(output)) => Some(input + output),
            _ => None,
        }
    });

    UsageMetadata {
        input_tokens: usage.prompt_tokens,
        output_tokens: usage.completion_tokens,
        total_tokens,
        reasoning_tokens: usage
            .completion_tokens_details
            .and_then(|d| d.reasoning_tokens),
        cached_input_tokens: usage.prompt_tokens_details.and_then(|d| d.cached_tokens),
    }
}

/// Map a provider finish-reason string to the abstraction's enum
pub fn finish_reason_from(reason: &str) -> FinishReason {
    match reason {
        "stop" => FinishReason::Stop,
        "length" => FinishReason::Length,
        "content_filter" => FinishReason::ContentFilter,
        other => FinishReason::Other(other.to_string()),
    }
}
