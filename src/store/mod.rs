//! Conversation store
//!
//! Durable conversation state in an embedded SQLite database. Journaling,
//! durability, and concurrent-reader isolation are the engine's problem:
//! the database is opened in WAL mode and every write is a single
//! statement, so readers never observe a half-written thread.

pub mod conversations;
pub mod error;

pub use conversations::ChatStore;
pub use error::{Result, StoreError};
