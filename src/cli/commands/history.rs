//! Save history of the note, read from the local audit log.

use crate::checklist::parse_body;
use crate::cli::NoteArgs;
use crate::config::{DEFAULT_NOTE_ID, load_config, resolve_db_path, resolve_note_id, resolve_remote_url};
use crate::error::{Error, Result};
use crate::storage::SqliteStorage;
use crate::storage::events::Event;
use chrono::{DateTime, Local, Utc};
use colored::Colorize;
use serde::Serialize;

#[derive(Serialize)]
struct HistoryOutput<'a> {
    note_id: &'a str,
    events: &'a [Event],
    count: usize,
}

/// Items and checked items in a stored body.
fn tally(body: Option<&str>) -> (usize, usize) {
    body.map_or((0, 0), |body| {
        let items = parse_body(body);
        let checked = items.iter().filter(|item| item.checked).count();
        (items.len(), checked)
    })
}

fn format_timestamp(millis: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(millis).map_or_else(
        || millis.to_string(),
        |ts| ts.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string(),
    )
}

/// Execute `history`.
///
/// # Errors
///
/// Returns `InvalidArgument` when a remote store is configured, or
/// `NotInitialized` if the local database does not exist.
pub fn execute(args: &NoteArgs, limit: u32, json: bool) -> Result<()> {
    let config = load_config()?;
    if resolve_remote_url(args.remote.as_deref(), &config).is_some() {
        return Err(Error::InvalidArgument(
            "history is only recorded by the local database, not a remote store".to_string(),
        ));
    }

    let db_path = resolve_db_path(args.db.as_deref()).ok_or(Error::NotInitialized)?;
    if !db_path.exists() {
        return Err(Error::NotInitialized);
    }

    let note_id = resolve_note_id(args.note.as_deref(), &config)
        .unwrap_or_else(|| DEFAULT_NOTE_ID.to_string());
    let storage = SqliteStorage::open(&db_path)?;
    if storage.get_note(&note_id)?.is_none() {
        return Err(Error::NoteNotFound { id: note_id });
    }
    let events = storage.note_history(&note_id, Some(limit))?;

    if json {
        let output = HistoryOutput {
            note_id: &note_id,
            events: &events,
            count: events.len(),
        };
        println!("{}", serde_json::to_string(&output)?);
        return Ok(());
    }

    if events.is_empty() {
        println!("{}", "No history.".dimmed());
        return Ok(());
    }

    println!("{} {}", "History of".bold(), note_id.cyan());
    for event in &events {
        let (before, before_checked) = tally(event.old_value.as_deref());
        let (after, after_checked) = tally(event.new_value.as_deref());
        println!(
            "  {}  {:<12}  {}  items {before} -> {after}, checked {before_checked} -> {after_checked}",
            format_timestamp(event.created_at).dimmed(),
            event.event_type.as_str(),
            event.actor,
        );
    }
    Ok(())
}
