//! Append-only usage log
//!
//! One JSON line per finished exchange. Each record is written with a
//! single `write_all`, so readers never observe a partial record; ordering
//! across concurrent writers is not guaranteed.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;

use crate::llm::{FinishReason, UsageMetadata};
use crate::models::Role;

/// Errors that can occur when writing the usage log
#[derive(Debug, Error)]
pub enum UsageLogError {
    /// Filesystem failures
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding failures
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// A single logged entry describing one finished exchange
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageRecord {
    pub timestamp: DateTime<Utc>,
    pub model: String,
    pub finish_reason: FinishReason,
    pub role: Role,
    pub patient_id: String,
    pub conversation_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_user_text: Option<String>,
    pub assistant_text: String,
    pub usage: UsageMetadata,
    #[serde(rename = "costUSD")]
    pub cost_usd: f64,
}

/// Handle to the usage log file
#[derive(Debug, Clone)]
pub struct UsageLog {
    path: PathBuf,
}

impl UsageLog {
    /// Create a handle for the given log path
    ///
    /// The file is created lazily on first append.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path this log appends to
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one record as a single JSON line
    pub async fn append(&self, record: &UsageRecord) -> Result<(), UsageLogError> {
        let mut line = serde_json::to_string(record)?;
        line.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;

        file.write_all(line.as_bytes()).await?;
        file.flush().await?;

        Ok(())
    }
}
