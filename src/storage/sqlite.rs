//! SQLite storage implementation.
//!
//! This module provides the note store backend using SQLite.
//! It follows the MutationContext pattern for transaction discipline and audit logging.

use crate::error::{Error, Result};
use crate::model::{Note, SaveNote};
use crate::storage::events::{Event, EventType, get_events, insert_event};
use crate::storage::schema::apply_schema;
use rusqlite::{Connection, OptionalExtension, Transaction};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// SQLite-based storage backend.
#[derive(Debug)]
pub struct SqliteStorage {
    conn: Connection,
}

/// Context for a mutation operation, tracking side effects.
///
/// Passed to mutation closures to record audit events, which are written
/// in the same transaction as the mutation itself.
pub struct MutationContext {
    /// Name of the operation being performed.
    pub op_name: String,
    /// Actor performing the operation.
    pub actor: String,
    /// Events to write at the end of the transaction.
    pub events: Vec<Event>,
}

impl MutationContext {
    /// Create a new mutation context.
    #[must_use]
    pub fn new(op_name: &str, actor: &str) -> Self {
        Self {
            op_name: op_name.to_string(),
            actor: actor.to_string(),
            events: Vec::new(),
        }
    }

    /// Record an event with old/new values for field tracking.
    pub fn record_change(
        &mut self,
        entity_type: &str,
        entity_id: &str,
        event_type: EventType,
        old_value: Option<String>,
        new_value: Option<String>,
    ) {
        self.events.push(
            Event::new(entity_type, entity_id, event_type, &self.actor)
                .with_values(old_value, new_value)
                .with_comment(&self.op_name),
        );
    }
}

impl SqliteStorage {
    /// Open a database at the given path.
    ///
    /// Creates the database and applies schema if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established or schema fails.
    pub fn open(path: &Path) -> Result<Self> {
        Self::open_with_timeout(path, None)
    }

    /// Open a database with an optional busy timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established or schema fails.
    pub fn open_with_timeout(path: &Path, timeout_ms: Option<u64>) -> Result<Self> {
        let conn = Connection::open(path)?;

        if let Some(timeout) = timeout_ms {
            conn.busy_timeout(Duration::from_millis(timeout))?;
        } else {
            // Default 5 second timeout
            conn.busy_timeout(Duration::from_secs(5))?;
        }

        apply_schema(&conn)?;
        debug!(path = %path.display(), "Opened note database");
        Ok(Self { conn })
    }

    /// Open an in-memory database (for testing).
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established.
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        apply_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Execute a mutation with the transaction protocol.
    ///
    /// This method:
    /// 1. Begins an IMMEDIATE transaction (for write locking)
    /// 2. Executes the mutation closure
    /// 3. Writes audit events
    /// 4. Commits (or rolls back on error)
    ///
    /// # Errors
    ///
    /// Returns an error if any step fails. The transaction is rolled back on error.
    pub fn mutate<F, R>(&mut self, op: &str, actor: &str, f: F) -> Result<R>
    where
        F: FnOnce(&Transaction, &mut MutationContext) -> Result<R>,
    {
        let tx = self
            .conn
            .transaction_with_behavior(rusqlite::TransactionBehavior::Immediate)?;

        let mut ctx = MutationContext::new(op, actor);

        let result = f(&tx, &mut ctx)?;

        for event in &ctx.events {
            insert_event(&tx, event)?;
        }

        tx.commit()?;

        Ok(result)
    }

    // ==================
    // Note Operations
    // ==================

    /// Get a note by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_note(&self, id: &str) -> Result<Option<Note>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title, text, body, author, created_at, updated_at
             FROM notes WHERE id = ?1",
        )?;

        let note = stmt
            .query_row([id], |row| {
                Ok(Note {
                    id: row.get(0)?,
                    title: row.get(1)?,
                    text: row.get(2)?,
                    body: row.get(3)?,
                    author: row.get(4)?,
                    created_at: row.get(5)?,
                    updated_at: row.get(6)?,
                })
            })
            .optional()?;

        Ok(note)
    }

    /// Create or update a note.
    ///
    /// Absent fields take their defaults on both paths. An absent or empty
    /// id creates a note with a generated `note_` id.
    ///
    /// # Errors
    ///
    /// Returns an error if the upsert fails.
    pub fn save_note(&mut self, input: &SaveNote, actor: &str) -> Result<Note> {
        let now = chrono::Utc::now().timestamp_millis();
        let id = input.target_id().map_or_else(
            || format!("note_{}", &uuid::Uuid::new_v4().to_string()[..12]),
            str::to_string,
        );
        let body = input.body_or_default();

        self.mutate("save_note", actor, |tx, ctx| {
            let previous: Option<String> = tx
                .query_row("SELECT body FROM notes WHERE id = ?1", [&id], |row| row.get(0))
                .optional()?;

            tx.execute(
                "INSERT INTO notes (id, title, text, body, author, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)
                 ON CONFLICT(id) DO UPDATE SET
                     title = excluded.title,
                     text = excluded.text,
                     body = excluded.body,
                     author = excluded.author,
                     updated_at = excluded.updated_at",
                rusqlite::params![
                    id,
                    input.title_or_default(),
                    input.text_or_default(),
                    body,
                    input.author,
                    now
                ],
            )?;

            let event_type = if previous.is_some() {
                EventType::NoteUpdated
            } else {
                EventType::NoteCreated
            };
            ctx.record_change("note", &id, event_type, previous, Some(body.to_string()));

            Ok(())
        })?;

        debug!(id = %id, "Saved note");
        self.get_note(&id)?.ok_or(Error::NoteNotFound { id })
    }

    /// Audit events for a note, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn note_history(&self, id: &str, limit: Option<u32>) -> Result<Vec<Event>> {
        Ok(get_events(&self.conn, "note", id, limit)?)
    }
}
