//! Core types for the LLM abstraction layer

use serde::{Deserialize, Serialize};

use super::config::GenerationConfig;
use crate::llm::openai::OpenAiModel;

/// Request to generate content from an LLM
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRequest {
    /// Conversation history
    pub messages: Vec<Message>,
    /// System prompt/instructions
    pub system: Option<String>,
    /// Generation parameters
    pub config: GenerationConfig,
}

/// A single message in the conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Role of the message sender
    pub role: MessageRole,
    /// Content blocks in the message
    pub content: Vec<ContentBlock>,
}

impl Message {
    /// Create a new user message with text content
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: vec![ContentBlock::Text { text: text.into() }],
        }
    }

    /// Create a new assistant message with text content
    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: vec![ContentBlock::Text { text: text.into() }],
        }
    }

    /// Create a new system message with text content
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: vec![ContentBlock::Text { text: text.into() }],
        }
    }

    /// All text content of the message, blocks joined with a single space
    pub fn text(&self) -> String {
        self.content
            .iter()
            .map(|block| match block {
                ContentBlock::Text { text } => text.as_str(),
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Role of a message sender
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// Human input
    User,
    /// Model output
    Assistant,
    /// Out-of-band instructions
    System,
}

/// Content block within a message
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    /// Plain text content
    Text { text: String },
}

/// Events emitted during streaming generation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamEvent {
    /// Incremental text update
    TextDelta { text: String },
    /// Response complete
    MessageEnd {
        finish_reason: FinishReason,
        usage: UsageMetadata,
    },
}

/// Reason why generation finished
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    /// Natural completion
    Stop,
    /// Hit token limit
    Length,
    /// Blocked by safety filters
    ContentFilter,
    /// Provider-specific reason
    Other(String),
}

/// Token usage information
///
/// Every counter is optional: providers may omit any of them, and older
/// API versions report some under different names. Normalization happens
/// once at the provider adapter boundary, never at call sites.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    /// Prompt tokens consumed
    pub input_tokens: Option<u64>,
    /// Response tokens generated
    pub output_tokens: Option<u64>,
    /// Sum of input and output
    pub total_tokens: Option<u64>,
    /// Tokens spent on hidden reasoning
    pub reasoning_tokens: Option<u64>,
    /// Prompt tokens served from the provider cache
    pub cached_input_tokens: Option<u64>,
}

/// Unified model enum for all supported LLM providers
#[derive(Debug, Clone)]
pub enum Model {
    /// OpenAI model served over the chat-completions API
    OpenAi(OpenAiModel),
}

impl Model {
    /// Get the model identifier as a string
    pub fn as_str(&self) -> &str {
        match self {
            Model::OpenAi(model) => model.as_str(),
        }
    }
}
