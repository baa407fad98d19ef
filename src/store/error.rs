//! Error types for the conversation store

use thiserror::Error;

/// Result type for store operations
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur when using the conversation store
#[derive(Debug, Error)]
pub enum StoreError {
    /// SQL errors, constraint violations, engine failures
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Thread serialization/deserialization failures
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A writer panicked while holding the connection
    #[error("Store lock poisoned")]
    LockPoisoned,
}
