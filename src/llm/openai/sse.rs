//! Server-Sent Events (SSE) parser for chat-completion responses

use bytes::Bytes;
use futures::stream::Stream;
use futures::StreamExt;
use std::pin::Pin;

use crate::llm::core::error::LlmError;

use super::types::ChatCompletionChunk;

/// Parse a stream of bytes as chat-completion SSE chunks
///
/// The chat-completions stream uses data-only SSE:
/// ```text
/// data: {"id":"chatcmpl-1","choices":[{"delta":{"content":"Hi"}}]}
///
/// data: [DONE]
/// ```
///
/// This parser:
/// 1. Buffers incoming bytes
/// 2. Scans for event boundaries (double newline)
/// 3. Extracts the JSON payload from the `data:` line
/// 4. Drops the `[DONE]` sentinel (the stream simply ends)
/// 5. Returns a stream of parsed chunks
pub fn parse_sse_stream(
    byte_stream: Pin<Box<dyn Stream<Item = Result<Bytes, reqwest::Error>> + Send + Sync>>,
) -> Pin<Box<dyn Stream<Item = Result<ChatCompletionChunk, LlmError>> + Send + Sync>> {
    // Buffer to accumulate partial events
    let mut buffer = String::new();

    let chunk_stream = byte_stream.flat_map(move |chunk_result| {
        let chunk = match chunk_result {
            Ok(bytes) => bytes,
            Err(e) => {
                return futures::stream::iter(vec![Err(LlmError::StreamError(e.to_string()))]);
            }
        };

        // Convert bytes to string and append to buffer
        let text = match std::str::from_utf8(&chunk) {
            Ok(t) => t,
            Err(e) => {
                return futures::stream::iter(vec![Err(LlmError::StreamError(format!(
                    "Invalid UTF-8 in stream: {}",
                    e
                )))]);
            }
        };

        buffer.push_str(text);

        // Process complete events (delimited by \n\n)
        let mut chunks = Vec::new();
        while let Some(event_end) = buffer.find("\n\n") {
            let event_text = buffer[..event_end].to_string();
            buffer.drain(..=event_end + 1); // Remove event + one of the newlines

            if let Some(parsed) = parse_event(&event_text) {
                chunks.push(parsed);
            }
        }

        // Return all chunks found in this read
        futures::stream::iter(chunks)
    });

    Box::pin(chunk_stream)
}

/// Parse a single SSE event from its text representation
fn parse_event(event_text: &str) -> Option<Result<ChatCompletionChunk, LlmError>> {
    let mut data: Option<String> = None;

    for line in event_text.lines() {
        let line = line.trim();

        if line.is_empty() {
            continue;
        }

        // Comment lines (": ping") are keep-alives
        if line.starts_with(':') {
            continue;
        }

        if let Some(data_val) = line.strip_prefix("data:") {
            data = Some(data_val.trim().to_string());
        }
    }

    let data = data?;

    if data.is_empty() {
        return None;
    }

    // End-of-stream sentinel carries no payload
    if data == "[DONE]" {
        return None;
    }

    match serde_json::from_str::<ChatCompletionChunk>(&data) {
        Ok(chunk) => Some(Ok(chunk)),
        Err(e) => Some(Err(LlmError::SerializationError(format!(
            "Failed to parse chat-completion SSE chunk: {}. Data: {}",
            e, data
        )))),
    }
}
