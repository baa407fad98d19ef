use warp::sse::Event;

use crate::llm::FinishReason;

/// Create a text SSE event with the assistant message ID and a text chunk
pub fn create_text_event(id: &str, chunk: &str) -> Result<Event, std::convert::Infallible> {
    let payload = serde_json::json!({
        "id": id,
        "chunk": chunk
    });

    Ok(Event::default().event("text").data(payload.to_string()))
}

/// Create a done SSE event to signal stream completion
pub fn create_done_event(finish_reason: &FinishReason) -> Result<Event, std::convert::Infallible> {
    let payload = serde_json::json!({
        "finishReason": finish_reason
    });

    Ok(Event::default().event("done").data(payload.to_string()))
}

/// Create an error SSE event for failures after streaming has begun
pub fn create_error_event(message: &str) -> Result<Event, std::convert::Infallible> {
    let payload = serde_json::json!({
        "error": message
    });

    Ok(Event::default().event("error").data(payload.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_text_event() {
        // Test that the function creates an event without panicking
        let result = create_text_event("msg-123", "Hello world");
        assert!(result.is_ok());
    }

    #[test]
    fn test_create_done_event() {
        let result = create_done_event(&FinishReason::Stop);
        assert!(result.is_ok());
    }

    #[test]
    fn test_create_error_event() {
        let result = create_error_event("upstream connection lost");
        assert!(result.is_ok());
    }

    #[test]
    fn test_text_payload_format() {
        let payload = serde_json::json!({
            "id": "msg-123",
            "chunk": "Hello world"
        });

        assert_eq!(payload["id"], "msg-123");
        assert_eq!(payload["chunk"], "Hello world");
    }

    #[test]
    fn test_done_payload_format() {
        let payload = serde_json::json!({
            "finishReason": FinishReason::Stop
        });

        assert_eq!(payload["finishReason"], "stop");
    }

    #[test]
    fn test_error_payload_format() {
        let payload = serde_json::json!({
            "error": "boom"
        });

        assert_eq!(payload["error"], "boom");
    }
}
