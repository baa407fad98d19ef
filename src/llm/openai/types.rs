//! OpenAI-specific request and response types
//!
//! These types map directly to the chat-completions API schema.

use serde::{Deserialize, Serialize};

/// Request body for a streaming chat completion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatCompletionRequest {
    /// Model identifier
    pub model: String,
    /// Conversation messages, system message first if present
    pub messages: Vec<OpenAiMessage>,
    /// Temperature (0.0-2.0)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    /// Top-p nucleus sampling
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
    /// Maximum number of tokens to generate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    /// Always true for streaming
    pub stream: bool,
    /// Streaming extras; usage reporting must be opted into
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream_options: Option<StreamOptions>,
}

/// A single message in the chat-completions conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiMessage {
    /// Role: "system", "user" or "assistant"
    pub role: String,
    /// Plain text content
    pub content: String,
}

/// Options controlling the shape of the streamed response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamOptions {
    /// Emit a final usage-bearing chunk before the stream terminates
    pub include_usage: bool,
}

/// One SSE chunk of a streaming chat completion
#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionChunk {
    /// Completion ID, stable across chunks of one response
    pub id: String,
    /// Model that produced the chunk
    #[serde(default)]
    pub model: Option<String>,
    /// Incremental choice updates; empty on the final usage-only chunk
    #[serde(default)]
    pub choices: Vec<ChunkChoice>,
    /// Usage totals, present only on the final chunk when
    /// `stream_options.include_usage` was requested
    #[serde(default)]
    pub usage: Option<OpenAiUsage>,
}

/// A single choice delta within a chunk
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChunkChoice {
    /// Choice index (always 0 for single-choice requests)
    #[serde(default)]
    pub index: u32,
    /// Incremental content update
    #[serde(default)]
    pub delta: ChunkDelta,
    /// Set on the last content-bearing chunk of the choice
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Incremental message delta
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChunkDelta {
    /// Role, present on the first chunk only
    #[serde(default)]
    pub role: Option<String>,
    /// Text token(s)
    #[serde(default)]
    pub content: Option<String>,
}

/// Usage totals reported by the provider
///
/// Field names differ across provider API versions: newer deployments
/// report `input_tokens`/`output_tokens` where the classic API reports
/// `prompt_tokens`/`completion_tokens`. The aliases below accept either
/// spelling so the rest of the crate never has to care.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OpenAiUsage {
    /// Prompt tokens consumed
    #[serde(default, alias = "input_tokens")]
    pub prompt_tokens: Option<u64>,
    /// Completion tokens generated
    #[serde(default, alias = "output_tokens")]
    pub completion_tokens: Option<u64>,
    /// Sum of prompt and completion tokens
    #[serde(default)]
    pub total_tokens: Option<u64>,
    /// Prompt token breakdown
    #[serde(default)]
    pub prompt_tokens_details: Option<PromptTokensDetails>,
    /// Completion token breakdown
    #[serde(default)]
    pub completion_tokens_details: Option<CompletionTokensDetails>,
}

/// Breakdown of prompt tokens
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PromptTokensDetails {
    /// Prompt tokens served from the provider cache
    #[serde(default)]
    pub cached_tokens: Option<u64>,
}

/// Breakdown of completion tokens
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompletionTokensDetails {
    /// Tokens spent on hidden reasoning
    #[serde(default)]
    pub reasoning_tokens: Option<u64>,
}
