//! Audit event storage and retrieval.
//!
//! Every note write records one event holding the previous and new body,
//! which is what `todo history` shows.

use rusqlite::{Connection, Result};
use serde::Serialize;

/// Event types for audit logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    NoteCreated,
    NoteUpdated,
}

impl EventType {
    /// Get the string representation for storage.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NoteCreated => "note_created",
            Self::NoteUpdated => "note_updated",
        }
    }
}

/// An audit event record.
#[derive(Debug, Clone, Serialize)]
pub struct Event {
    pub id: i64,
    pub entity_type: String,
    pub entity_id: String,
    pub event_type: EventType,
    pub actor: String,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
    pub comment: Option<String>,
    pub created_at: i64,
}

impl Event {
    /// Create a new event (id will be assigned by database).
    #[must_use]
    pub fn new(entity_type: &str, entity_id: &str, event_type: EventType, actor: &str) -> Self {
        Self {
            id: 0,
            entity_type: entity_type.to_string(),
            entity_id: entity_id.to_string(),
            event_type,
            actor: actor.to_string(),
            old_value: None,
            new_value: None,
            comment: None,
            created_at: chrono::Utc::now().timestamp_millis(),
        }
    }

    /// Add old/new values for field change tracking.
    #[must_use]
    pub fn with_values(mut self, old: Option<String>, new: Option<String>) -> Self {
        self.old_value = old;
        self.new_value = new;
        self
    }

    /// Add a comment to the event.
    #[must_use]
    pub fn with_comment(mut self, comment: &str) -> Self {
        self.comment = Some(comment.to_string());
        self
    }
}

/// Insert an event into the database.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_event(conn: &Connection, event: &Event) -> Result<i64> {
    conn.execute(
        "INSERT INTO events (entity_type, entity_id, event_type, actor, old_value, new_value, comment, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        rusqlite::params![
            event.entity_type,
            event.entity_id,
            event.event_type.as_str(),
            event.actor,
            event.old_value,
            event.new_value,
            event.comment,
            event.created_at,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Get events for an entity, newest first.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn get_events(
    conn: &Connection,
    entity_type: &str,
    entity_id: &str,
    limit: Option<u32>,
) -> Result<Vec<Event>> {
    let limit = limit.unwrap_or(100);
    let mut stmt = conn.prepare(
        "SELECT id, entity_type, entity_id, event_type, actor, old_value, new_value, comment, created_at
         FROM events
         WHERE entity_type = ?1 AND entity_id = ?2
         ORDER BY created_at DESC, id DESC
         LIMIT ?3",
    )?;

    let rows = stmt.query_map(rusqlite::params![entity_type, entity_id, limit], |row| {
        Ok(Event {
            id: row.get(0)?,
            entity_type: row.get(1)?,
            entity_id: row.get(2)?,
            event_type: parse_event_type(row.get::<_, String>(3)?.as_str()),
            actor: row.get(4)?,
            old_value: row.get(5)?,
            new_value: row.get(6)?,
            comment: row.get(7)?,
            created_at: row.get(8)?,
        })
    })?;

    rows.collect()
}

fn parse_event_type(s: &str) -> EventType {
    match s {
        "note_created" => EventType::NoteCreated,
        _ => EventType::NoteUpdated,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::schema::apply_schema;

    #[test]
    fn test_insert_and_get_events() {
        let conn = Connection::open_in_memory().unwrap();
        apply_schema(&conn).unwrap();

        let created = Event::new("note", "home", EventType::NoteCreated, "ana")
            .with_values(None, Some("milk\to".into()));
        let updated = Event::new("note", "home", EventType::NoteUpdated, "ana")
            .with_values(Some("milk\to".into()), Some("milk\tx".into()))
            .with_comment("checked milk");
        insert_event(&conn, &created).unwrap();
        insert_event(&conn, &updated).unwrap();
        insert_event(&conn, &Event::new("note", "other", EventType::NoteCreated, "ana")).unwrap();

        let events = get_events(&conn, "note", "home", None).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].event_type, EventType::NoteUpdated);
        assert_eq!(events[0].comment.as_deref(), Some("checked milk"));
        assert_eq!(events[1].event_type, EventType::NoteCreated);

        let limited = get_events(&conn, "note", "home", Some(1)).unwrap();
        assert_eq!(limited.len(), 1);
    }
}
