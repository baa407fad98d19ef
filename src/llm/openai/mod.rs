//! OpenAI provider implementation
//!
//! Implements the `LlmProvider` trait against the OpenAI chat-completions
//! API with streaming enabled.

pub mod client;
pub mod mapper;
pub mod sse;
pub mod types;

pub use client::{OpenAiClient, OpenAiModel};
