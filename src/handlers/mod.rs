// Handlers module

pub mod chat;
pub mod conversations;

pub use chat::chat_handler;
pub use conversations::{get_conversation_handler, list_conversations_handler};
