//! LLM Abstraction Layer
//!
//! This module provides a unified interface for streaming chat completions
//! from hosted providers. The only provider currently wired up is the
//! OpenAI chat-completions API.

pub mod core;
pub mod openai;

// Re-export commonly used types
pub use core::{
    config::GenerationConfig,
    error::LlmError,
    provider::{create_provider, LlmProvider},
    types::{
        ContentBlock, FinishReason, GenerateRequest, Message, MessageRole, Model, StreamEvent,
        UsageMetadata,
    },
};
