//! Provider trait for LLM implementations

use async_trait::async_trait;
use futures::stream::Stream;
use std::pin::Pin;

use super::{
    error::LlmError,
    types::{GenerateRequest, Model, StreamEvent},
};
use crate::llm::openai::OpenAiClient;

/// Main interface that all LLM provider implementations must satisfy
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Stream generate content from the LLM
    ///
    /// This method sends a request to the LLM and returns a stream of events
    /// representing the incremental response.
    ///
    /// # Arguments
    /// * `request` - The generation request with messages, system text, and config
    ///
    /// # Returns
    /// A pinned boxed stream of `StreamEvent` results, or an error if the request fails
    async fn stream_generate(
        &self,
        request: GenerateRequest,
    ) -> Result<Pin<Box<dyn Stream<Item = Result<StreamEvent, LlmError>> + Send + Sync>>, LlmError>;
}

/// Create an LLM provider from a model specification
///
/// This factory function creates the appropriate provider client based on
/// the model. Authentication happens out of band: the API key is supplied
/// by the caller, typically loaded from the process environment at startup.
///
/// # Arguments
///
/// * `model` - The model to use
/// * `api_key` - Bearer token for the provider API
/// * `base_url` - Base URL of the provider API (e.g. "https://api.openai.com/v1")
///
/// # Returns
///
/// A boxed trait object implementing `LlmProvider`, or an error if client creation fails
pub fn create_provider(
    model: Model,
    api_key: String,
    base_url: String,
) -> Result<Box<dyn LlmProvider>, LlmError> {
    match model {
        Model::OpenAi(openai_model) => {
            let client = OpenAiClient::new(api_key, base_url, openai_model)?;
            Ok(Box::new(client))
        }
    }
}
