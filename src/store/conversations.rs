//! Conversation CRUD over SQLite

use std::path::Path;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};

use crate::models::{ConversationRecord, ConversationSummary, Role, UiMessage};

use super::error::{Result, StoreError};

/// Truncation limit for titles derived from the opening message
const TITLE_MAX_CHARS: usize = 80;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS conversations (
    id           TEXT PRIMARY KEY,
    role         TEXT NOT NULL,
    patient_id   TEXT NOT NULL,
    title        TEXT,
    created_at   INTEGER NOT NULL,
    updated_at   INTEGER NOT NULL,
    last_message TEXT,
    messages     TEXT NOT NULL
);
";

/// Handle to the conversation store
///
/// Opened once at process start and cloned into each request handler.
/// SQLite serializes writers itself; the mutex only keeps the single
/// connection from being used from two threads at once.
#[derive(Clone)]
pub struct ChatStore {
    conn: Arc<Mutex<Connection>>,
}

impl ChatStore {
    /// Open (or create) the store at the given path
    ///
    /// Enables WAL journaling for concurrent-read/single-writer durability.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        Self::with_connection(conn)
    }

    /// Open an in-memory store (tests)
    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Insert or replace the thread for a conversation id
    ///
    /// First write for an id creates the record (title derived from the
    /// opening user message, `created_at` stamped). Later writes replace
    /// the message list wholesale, re-derive the last-message preview,
    /// and bump `updated_at`. A single statement either way, so a
    /// concurrent reader never sees a half-written thread.
    pub fn upsert(
        &self,
        id: &str,
        role: Role,
        patient_id: &str,
        messages: &[UiMessage],
    ) -> Result<()> {
        let thread = serde_json::to_string(messages)?;
        let now = Utc::now().timestamp_millis();
        let title = derive_title(messages);
        let last_message = messages.last().map(UiMessage::text);

        let conn = self.conn.lock().map_err(|_| StoreError::LockPoisoned)?;
        conn.execute(
            "INSERT INTO conversations (id, role, patient_id, title, created_at, updated_at, last_message, messages)
             VALUES (?1, ?2, ?3, ?4, ?5, ?5, ?6, ?7)
             ON CONFLICT(id) DO UPDATE SET
                 role = excluded.role,
                 patient_id = excluded.patient_id,
                 updated_at = excluded.updated_at,
                 last_message = excluded.last_message,
                 messages = excluded.messages",
            params![id, role.as_str(), patient_id, title, now, last_message, thread],
        )?;

        Ok(())
    }

    /// Fetch a full conversation record by id
    pub fn get(&self, id: &str) -> Result<Option<ConversationRecord>> {
        let conn = self.conn.lock().map_err(|_| StoreError::LockPoisoned)?;
        let mut stmt = conn.prepare(
            "SELECT id, role, patient_id, title, created_at, updated_at, last_message, messages
             FROM conversations WHERE id = ?1",
        )?;

        let result = stmt.query_row(params![id], |row| {
            Ok(ConversationRow {
                id: row.get(0)?,
                role: row.get(1)?,
                patient_id: row.get(2)?,
                title: row.get(3)?,
                created_at: row.get(4)?,
                updated_at: row.get(5)?,
                last_message: row.get(6)?,
                messages: row.get(7)?,
            })
        });

        match result {
            Ok(row) => Ok(Some(record_from_row(row)?)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// List conversation summaries, most recently updated first
    ///
    /// Ties are broken by id ascending so the order is deterministic.
    pub fn list(&self) -> Result<Vec<ConversationSummary>> {
        let conn = self.conn.lock().map_err(|_| StoreError::LockPoisoned)?;
        let mut stmt = conn.prepare(
            "SELECT id, role, patient_id, title, created_at, updated_at, last_message
             FROM conversations ORDER BY updated_at DESC, id ASC",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(SummaryRow {
                id: row.get(0)?,
                role: row.get(1)?,
                patient_id: row.get(2)?,
                title: row.get(3)?,
                created_at: row.get(4)?,
                updated_at: row.get(5)?,
                last_message: row.get(6)?,
            })
        })?;

        let mut summaries = Vec::new();
        for row in rows {
            summaries.push(summary_from_row(row?));
        }
        Ok(summaries)
    }
}

/// Title for a new conversation: the opening user message, truncated
fn derive_title(messages: &[UiMessage]) -> Option<String> {
    let first_user = messages
        .iter()
        .find(|m| m.role == crate::models::UiRole::User)?;
    let text = first_user.text();
    if text.is_empty() {
        return None;
    }
    Some(text.chars().take(TITLE_MAX_CHARS).collect())
}

// Internal row types for mapping

struct ConversationRow {
    id: String,
    role: String,
    patient_id: String,
    title: Option<String>,
    created_at: i64,
    updated_at: i64,
    last_message: Option<String>,
    messages: String,
}

struct SummaryRow {
    id: String,
    role: String,
    patient_id: String,
    title: Option<String>,
    created_at: i64,
    updated_at: i64,
    last_message: Option<String>,
}

fn record_from_row(row: ConversationRow) -> Result<ConversationRecord> {
    let messages: Vec<UiMessage> = serde_json::from_str(&row.messages)?;
    Ok(ConversationRecord {
        id: row.id,
        role: Role::parse(&row.role),
        patient_id: row.patient_id,
        title: row.title,
        created_at: timestamp_from_millis(row.created_at),
        updated_at: timestamp_from_millis(row.updated_at),
        last_message: row.last_message,
        messages,
    })
}

fn summary_from_row(row: SummaryRow) -> ConversationSummary {
    ConversationSummary {
        id: row.id,
        role: Role::parse(&row.role),
        patient_id: row.patient_id,
        title: row.title,
        created_at: timestamp_from_millis(row.created_at),
        updated_at: timestamp_from_millis(row.updated_at),
        last_message: row.last_message,
    }
}

fn timestamp_from_millis(millis: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(millis).unwrap_or_default()
}
