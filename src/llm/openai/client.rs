//! OpenAI client implementation

use async_stream::stream;
use async_trait::async_trait;
use futures::stream::Stream;
use futures::StreamExt;
use reqwest::Client;
use std::pin::Pin;
use std::time::Duration;

use crate::llm::core::{
    error::LlmError,
    provider::LlmProvider,
    types::{FinishReason, GenerateRequest, StreamEvent, UsageMetadata},
};

use super::mapper::{finish_reason_from, normalize_usage, to_openai_request};
use super::sse::parse_sse_stream;

/// Overall per-request duration ceiling, connect through last byte
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// OpenAI model identifiers for the chat-completions API
#[derive(Debug, Clone)]
pub enum OpenAiModel {
    /// GPT-4o
    Gpt4o,
    /// GPT-4o mini
    Gpt4oMini,
}

impl OpenAiModel {
    /// Get the model identifier string for the chat-completions API
    pub fn as_str(&self) -> &str {
        match self {
            OpenAiModel::Gpt4o => "gpt-4o",
            OpenAiModel::Gpt4oMini => "gpt-4o-mini",
        }
    }
}

/// Client for streaming completions from the OpenAI API
pub struct OpenAiClient {
    /// HTTP client for making requests
    http_client: Client,
    /// Bearer token
    api_key: String,
    /// API base URL, e.g. "https://api.openai.com/v1"
    base_url: String,
    /// Model to use
    model: OpenAiModel,
}

impl OpenAiClient {
    /// Create a new OpenAI client
    ///
    /// # Arguments
    ///
    /// * `api_key` - Bearer token for the API
    /// * `base_url` - API base URL (e.g. "https://api.openai.com/v1")
    /// * `model` - Model to use
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is empty or the HTTP client cannot
    /// be constructed.
    pub fn new(api_key: String, base_url: String, model: OpenAiModel) -> Result<Self, LlmError> {
        if api_key.is_empty() {
            return Err(LlmError::InvalidRequest(
                "API key must not be empty".to_string(),
            ));
        }

        let http_client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| LlmError::HttpError {
                status: 0,
                body: format!("Failed to create HTTP client: {}", e),
            })?;

        Ok(Self {
            http_client,
            api_key,
            base_url,
            model,
        })
    }

    /// Build the endpoint URL for streaming completions
    fn build_endpoint_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }

    /// Make a streaming request to the chat-completions API
    async fn make_streaming_request(
        &self,
        request: GenerateRequest,
    ) -> Result<Pin<Box<dyn Stream<Item = Result<StreamEvent, LlmError>> + Send + Sync>>, LlmError> {
        // Convert to the provider's request format
        let openai_request = to_openai_request(request, self.model.as_str());

        // Build request
        let url = self.build_endpoint_url();
        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.api_key)
            .header("Content-Type", "application/json")
            .json(&openai_request)
            .send()
            .await?;

        // Check status
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_else(|_| String::new());
            return Err(LlmError::HttpError {
                status: status.as_u16(),
                body,
            });
        }

        // Parse SSE stream
        let byte_stream = response.bytes_stream();
        let mut chunk_stream = parse_sse_stream(Box::pin(byte_stream));

        // Convert to StreamEvent stream. Content deltas are forwarded as
        // they arrive; finish reason and usage accumulate across chunks
        // (usage arrives on a trailing, choice-free chunk) and are emitted
        // as a single MessageEnd once the provider stream ends.
        let event_stream = stream! {
            let mut finish_reason: Option<FinishReason> = None;
            let mut usage = UsageMetadata::default();

            while let Some(chunk_result) = chunk_stream.next().await {
                let chunk = match chunk_result {
                    Ok(c) => c,
                    Err(e) => {
                        yield Err(e);
                        return;
                    }
                };

                if let Some(chunk_usage) = chunk.usage {
                    usage = normalize_usage(chunk_usage);
                }

                for choice in chunk.choices {
                    if let Some(text) = choice.delta.content {
                        if !text.is_empty() {
                            yield Ok(StreamEvent::TextDelta { text });
                        }
                    }
                    if let Some(reason) = choice.finish_reason {
                        finish_reason = Some(finish_reason_from(&reason));
                    }
                }
            }

            yield Ok(StreamEvent::MessageEnd {
                finish_reason: finish_reason
                    .unwrap_or_else(|| FinishReason::Other("unknown".to_string())),
                usage,
            });
        };

        Ok(Box::pin(event_stream))
    }
}

#[async_trait]
impl LlmProvider for OpenAiClient {
    async fn stream_generate(
        &self,
        request: GenerateRequest,
    ) -> Result<Pin<Box<dyn Stream<Item = Result<StreamEvent, LlmError>> + Send + Sync>>, LlmError> {
        self.make_streaming_request(request).await
    }
}
