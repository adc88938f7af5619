//! Storage layer for cctimesheet.
//!
//! Persists ingested messages using `rusqlite`.
//!
//! # Schema
//!
//! A single append-only `messages` table. Rows are never updated; duplicate
//! timestamps and sessions are legal (a session logs many messages).
//!
//! ## Timestamp Format
//!
//! `timestamp` is stored as TEXT exactly as it appeared in the source log
//! (ISO 8601, e.g. `2025-01-15T10:30:00.000Z`). Range queries compare it
//! lexicographically against a naive ISO 8601 cutoff.
//!
//! # Connection Lifetime
//!
//! A [`Database`] owns its `rusqlite::Connection`; the connection is closed when
//! the value is dropped, including on early returns through `?`.

use std::path::Path;

use chrono::NaiveDateTime;
use rusqlite::{Connection, Row, params};
use thiserror::Error;

use cts_core::{Message, format_cutoff};

/// Database errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// An error from the underlying database.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Database connection wrapper.
pub struct Database {
    conn: Connection,
}

/// A persisted message with its surrogate key and insertion time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredMessage {
    pub id: i64,
    pub message: Message,
    /// When the row was inserted (`YYYY-MM-DD HH:MM:SS`, UTC).
    pub created_at: String,
}

/// Message count and latest activity for one raw project identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectSummary {
    pub project_name: String,
    pub message_count: i64,
    pub last_timestamp: String,
}

fn stored_message(row: &Row<'_>) -> rusqlite::Result<StoredMessage> {
    Ok(StoredMessage {
        id: row.get(0)?,
        message: Message {
            timestamp: row.get(1)?,
            session_id: row.get(2)?,
            project_name: row.get(3)?,
            message_type: row.get(4)?,
            uuid: row.get(5)?,
        },
        created_at: row.get(6)?,
    })
}

impl Database {
    /// Opens a database at the given path, creating it if necessary.
    ///
    /// The database schema is automatically initialized on first open.
    pub fn open(path: &Path) -> Result<Self, DbError> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Opens an in-memory database.
    ///
    /// Useful for testing. The database is destroyed when the connection closes.
    pub fn open_in_memory() -> Result<Self, DbError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Initializes the database schema.
    ///
    /// This is idempotent - safe to call on an already-initialized database.
    fn init(&self) -> Result<(), DbError> {
        self.conn.execute_batch(
            "
            -- timestamp: ISO 8601 text as found in the log
            -- project_name: raw project identifier (encoded directory name)
            CREATE TABLE IF NOT EXISTS messages (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                timestamp TEXT NOT NULL,
                session_id TEXT NOT NULL,
                project_name TEXT NOT NULL,
                message_type TEXT,
                uuid TEXT,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );

            CREATE INDEX IF NOT EXISTS idx_session_id ON messages(session_id);
            CREATE INDEX IF NOT EXISTS idx_timestamp ON messages(timestamp);
            CREATE INDEX IF NOT EXISTS idx_project_name ON messages(project_name);
            ",
        )?;
        Ok(())
    }

    /// Appends a batch of messages in one transaction.
    pub fn insert_messages(&mut self, messages: &[Message]) -> Result<usize, DbError> {
        if messages.is_empty() {
            return Ok(0);
        }
        let tx = self.conn.transaction()?;
        let mut inserted = 0;
        {
            let mut stmt = tx.prepare(
                "
                INSERT INTO messages (timestamp, session_id, project_name, message_type, uuid)
                VALUES (?, ?, ?, ?, ?)
                ",
            )?;
            for message in messages {
                inserted += stmt.execute(params![
                    message.timestamp,
                    message.session_id,
                    message.project_name,
                    message.message_type,
                    message.uuid,
                ])?;
            }
        }
        tx.commit()?;
        tracing::debug!(inserted, "inserted messages");
        Ok(inserted)
    }

    /// Lists messages at or after `cutoff`, ordered by timestamp then ID.
    pub fn messages_since(&self, cutoff: NaiveDateTime) -> Result<Vec<StoredMessage>, DbError> {
        let mut stmt = self.conn.prepare(
            "
            SELECT id, timestamp, session_id, project_name, message_type, uuid, created_at
            FROM messages
            WHERE timestamp >= ?
            ORDER BY timestamp ASC, id ASC
            ",
        )?;
        let rows = stmt.query_map([format_cutoff(cutoff)], stored_message)?;
        let mut messages = Vec::new();
        for row in rows {
            messages.push(row?);
        }
        Ok(messages)
    }

    /// Total number of stored messages.
    pub fn count_messages(&self) -> Result<i64, DbError> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM messages", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Per-project message counts, ordered by most recent activity.
    pub fn project_summaries(&self) -> Result<Vec<ProjectSummary>, DbError> {
        let mut stmt = self.conn.prepare(
            "
            SELECT project_name, COUNT(*) AS message_count, MAX(timestamp) AS last_timestamp
            FROM messages
            GROUP BY project_name
            ORDER BY last_timestamp DESC, project_name ASC
            ",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(ProjectSummary {
                project_name: row.get(0)?,
                message_count: row.get(1)?,
                last_timestamp: row.get(2)?,
            })
        })?;
        let mut summaries = Vec::new();
        for row in rows {
            summaries.push(row?);
        }
        Ok(summaries)
    }
}
