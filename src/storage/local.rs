//! [`NoteStore`] over the local SQLite database.
//!
//! rusqlite is blocking, so each call runs on tokio's blocking pool with
//! the connection behind a mutex.

use super::NoteStore;
use super::sqlite::SqliteStorage;
use crate::error::{Error, Result};
use crate::model::{Note, SaveNote};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::debug;

/// Local note store.
#[derive(Debug, Clone)]
pub struct LocalNoteStore {
    storage: Arc<Mutex<SqliteStorage>>,
    default_id: String,
    actor: String,
}

impl LocalNoteStore {
    /// Wrap an open database. `get(None)` reads `default_id`.
    pub fn new(storage: SqliteStorage, default_id: impl Into<String>, actor: impl Into<String>) -> Self {
        Self {
            storage: Arc::new(Mutex::new(storage)),
            default_id: default_id.into(),
            actor: actor.into(),
        }
    }

    /// Open the database at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened.
    pub fn open(path: &Path, default_id: impl Into<String>, actor: impl Into<String>) -> Result<Self> {
        Ok(Self::new(SqliteStorage::open(path)?, default_id, actor))
    }

    #[must_use]
    pub fn default_id(&self) -> &str {
        &self.default_id
    }

    async fn with_storage<F, R>(&self, f: F) -> Result<R>
    where
        F: FnOnce(&mut SqliteStorage) -> Result<R> + Send + 'static,
        R: Send + 'static,
    {
        let storage = Arc::clone(&self.storage);
        tokio::task::spawn_blocking(move || {
            let mut guard = storage
                .lock()
                .map_err(|_| Error::Other("note storage lock poisoned".to_string()))?;
            f(&mut guard)
        })
        .await
        .map_err(|e| Error::Other(format!("storage task failed: {e}")))?
    }
}

impl NoteStore for LocalNoteStore {
    async fn get(&self, id: Option<&str>) -> Result<Note> {
        let id = id.unwrap_or(&self.default_id).to_string();
        debug!(id = %id, "Fetching note from local store");
        self.with_storage(move |storage| {
            storage
                .get_note(&id)?
                .ok_or_else(|| Error::NoteNotFound { id })
        })
        .await
    }

    async fn save(&self, input: SaveNote) -> Result<Note> {
        let actor = self.actor.clone();
        self.with_storage(move |storage| storage.save_note(&input, &actor))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> LocalNoteStore {
        LocalNoteStore::new(SqliteStorage::open_memory().unwrap(), "home", "test-actor")
    }

    fn input(id: Option<&str>, body: &str) -> SaveNote {
        SaveNote {
            id: id.map(str::to_string),
            text: None,
            title: Some("todo".to_string()),
            body: Some(body.to_string()),
            author: "ana".to_string(),
        }
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let err = store().get(None).await.unwrap_err();
        assert!(matches!(err, Error::NoteNotFound { ref id } if id == "home"));
    }

    #[tokio::test]
    async fn test_default_id_is_used_when_omitted() {
        let store = store();
        store.save(input(Some("home"), "milk\to")).await.unwrap();
        store.save(input(Some("work"), "deploy\to")).await.unwrap();

        assert_eq!(store.get(None).await.unwrap().body, "milk\to");
        assert_eq!(store.get(Some("work")).await.unwrap().body, "deploy\to");
    }

    #[tokio::test]
    async fn test_open_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("todo.db");
        let store = LocalNoteStore::open(&path, "home", "ana").unwrap();
        store.save(input(Some("home"), "")).await.unwrap();
        drop(store);

        let reopened = LocalNoteStore::open(&path, "home", "ana").unwrap();
        assert_eq!(reopened.get(None).await.unwrap().body, "");
    }
}
