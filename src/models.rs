// Data structures for the chat proxy API (requests, messages, conversations)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::llm;

// Clinician Role Enum
//
// Selects the system instruction and response constraints. An unrecognized
// value deserializes to Receptionist, the most restrictive role.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Doctor,
    Nurse,
    #[serde(other)]
    Receptionist,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Doctor => "doctor",
            Role::Nurse => "nurse",
            Role::Receptionist => "receptionist",
        }
    }

    /// Parse a stored role string, falling back to Receptionist
    pub fn parse(s: &str) -> Role {
        match s {
            "doctor" => Role::Doctor,
            "nurse" => Role::Nurse,
            _ => Role::Receptionist,
        }
    }
}

// UI Message Role Enum
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UiRole {
    User,
    Assistant,
    System,
}

// Message Part Variants
//
// Text is the only part type this system interprets. Anything else a
// client sends (step markers, attachments) is carried through persistence
// untouched and ignored when deriving text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MessagePart {
    Text {
        text: String,
    },
    #[serde(untagged)]
    Other(serde_json::Value),
}

// UI Message Struct
//
// The unit of conversation history as the browser client sees it.
// Immutable once part of a persisted record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UiMessage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub role: UiRole,
    pub parts: Vec<MessagePart>,
}

impl UiMessage {
    /// All text parts joined with a single space, trimmed
    pub fn text(&self) -> String {
        self.parts
            .iter()
            .filter_map(|part| match part {
                MessagePart::Text { text } => Some(text.as_str()),
                MessagePart::Other(_) => None,
            })
            .collect::<Vec<_>>()
            .join(" ")
            .trim()
            .to_string()
    }
}

/// Text of the most recent user message, if any
pub fn last_user_text(messages: &[UiMessage]) -> Option<String> {
    messages
        .iter()
        .rev()
        .find(|m| m.role == UiRole::User)
        .map(UiMessage::text)
}

/// Convert a UI message thread to the LLM layer's message shape
///
/// Each text part becomes one content block; non-text parts are dropped.
pub fn to_model_messages(messages: &[UiMessage]) -> Vec<llm::Message> {
    messages
        .iter()
        .map(|message| llm::Message {
            role: match message.role {
                UiRole::User => llm::MessageRole::User,
                UiRole::Assistant => llm::MessageRole::Assistant,
                UiRole::System => llm::MessageRole::System,
            },
            content: message
                .parts
                .iter()
                .filter_map(|part| match part {
                    MessagePart::Text { text } => {
                        Some(llm::ContentBlock::Text { text: text.clone() })
                    }
                    MessagePart::Other(_) => None,
                })
                .collect(),
        })
        .collect()
}

// Chat Request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub messages: Vec<UiMessage>,
    pub chat_id: String,
    pub role: Role,
    pub patient_id: String,
}

// Conversation Record
//
// The durable representation of one chat thread.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationRecord {
    pub id: String,
    pub role: Role,
    pub patient_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_message: Option<String>,
    pub messages: Vec<UiMessage>,
}

// Conversation Summary (list view, no thread body)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationSummary {
    pub id: String,
    pub role: Role,
    pub patient_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_message: Option<String>,
}

// Error Response Body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }

    pub fn with_details(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: Some(details.into()),
        }
    }
}
