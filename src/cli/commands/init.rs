//! Initialize the local note database.
//!
//! Creates `~/.todo/data/todo.db` (or the `--db` path), seeds the note to
//! edit with an empty checklist, and writes a starter `config.json` when
//! none exists.

use crate::cli::NoteArgs;
use crate::config::{
    DEFAULT_NOTE_ID, TodoConfig, config_path, default_author, load_config, resolve_db_path,
    resolve_note_id, save_config_to,
};
use crate::error::{Error, Result};
use crate::model::SaveNote;
use crate::storage::SqliteStorage;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Title given to a freshly seeded note.
const SEED_TITLE: &str = "todo";

#[derive(Serialize)]
struct InitOutput {
    database: PathBuf,
    note_id: String,
    created_note: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    config: Option<PathBuf>,
}

/// Execute the init command.
///
/// # Errors
///
/// Returns `AlreadyInitialized` if the database exists and `force` is not set,
/// or an error if the directory, database, or config cannot be written.
pub fn execute(args: &NoteArgs, force: bool, json: bool) -> Result<()> {
    let config = load_config()?;
    let db_path = resolve_db_path(args.db.as_deref())
        .ok_or_else(|| Error::Config("Could not determine database path".to_string()))?;

    if db_path.exists() {
        if !force {
            return Err(Error::AlreadyInitialized { path: db_path });
        }
        remove_database(&db_path)?;
    }

    if let Some(parent) = db_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let note_id = resolve_note_id(args.note.as_deref(), &config)
        .unwrap_or_else(|| DEFAULT_NOTE_ID.to_string());
    let author = args
        .author
        .clone()
        .unwrap_or_else(|| default_author(&config));

    let mut storage = SqliteStorage::open(&db_path)?;
    let created_note = if storage.get_note(&note_id)?.is_some() {
        false
    } else {
        storage.save_note(&seed_note(&note_id, &author), &author)?;
        info!(note_id = %note_id, "Seeded note");
        true
    };

    let config_file = write_starter_config(&note_id)?;

    if json {
        let output = InitOutput {
            database: db_path,
            note_id,
            created_note,
            config: config_file,
        };
        println!("{}", serde_json::to_string(&output)?);
    } else {
        println!("Initialized todo database");
        println!("  Database: {}", db_path.display());
        println!("  Note:     {note_id}");
        if let Some(path) = config_file {
            println!("  Config:   {}", path.display());
        }
        println!();
        println!("Next: run 'todo add <item>' or 'todo shell'.");
    }

    Ok(())
}

fn seed_note(id: &str, author: &str) -> SaveNote {
    SaveNote {
        id: Some(id.to_string()),
        text: Some(format!("{SEED_TITLE}\n\n")),
        title: Some(SEED_TITLE.to_string()),
        body: Some(String::new()),
        author: author.to_string(),
    }
}

/// Remove the database along with its WAL sidecar files.
fn remove_database(db_path: &Path) -> Result<()> {
    fs::remove_file(db_path)?;
    for suffix in ["-wal", "-shm"] {
        let mut sidecar = db_path.as_os_str().to_owned();
        sidecar.push(suffix);
        let sidecar = PathBuf::from(sidecar);
        if sidecar.exists() {
            fs::remove_file(sidecar)?;
        }
    }
    Ok(())
}

/// Write `config.json` naming the seeded note, unless one already exists.
fn write_starter_config(note_id: &str) -> Result<Option<PathBuf>> {
    let path = config_path()?;
    if path.exists() {
        return Ok(None);
    }

    let config = TodoConfig {
        default_note_id: Some(note_id.to_string()),
        ..TodoConfig::default()
    };
    save_config_to(&path, &config)?;
    Ok(Some(path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_note_has_empty_checklist() {
        let seed = seed_note("home", "ana");
        assert_eq!(seed.target_id(), Some("home"));
        assert_eq!(seed.text.as_deref(), Some("todo\n\n"));
        assert_eq!(seed.body_or_default(), "");
    }

    #[test]
    fn test_remove_database_clears_sidecars() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("todo.db");
        fs::write(&db, "").unwrap();
        fs::write(dir.path().join("todo.db-wal"), "").unwrap();

        remove_database(&db).unwrap();
        assert!(!db.exists());
        assert!(!dir.path().join("todo.db-wal").exists());
    }
}
