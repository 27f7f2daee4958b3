//! Note storage.
//!
//! The editor talks to a [`NoteStore`]: fetch one note, upsert one note.
//! Two implementations ship:
//!
//! - [`local`] - SQLite database on disk (WAL mode, audit events)
//! - [`http`] - remote `notes` router over HTTP
//!
//! # Submodules
//!
//! - [`events`] - Audit event storage
//! - [`schema`] - Database schema definitions
//! - [`sqlite`] - Main SQLite storage implementation

pub mod events;
pub mod http;
pub mod local;
pub mod schema;
pub mod sqlite;

pub use http::HttpNoteStore;
pub use local::LocalNoteStore;
pub use sqlite::{MutationContext, SqliteStorage};

use crate::error::Result;
use crate::model::{Note, SaveNote};
use std::future::Future;

/// Record store the sync client reads from and writes to.
pub trait NoteStore: Send + Sync {
    /// Fetch a note by id, or the store's configured default when `id` is `None`.
    ///
    /// Fails with `Error::NoteNotFound` when there is no such note.
    fn get(&self, id: Option<&str>) -> impl Future<Output = Result<Note>> + Send;

    /// Upsert a note and return the stored record.
    fn save(&self, input: SaveNote) -> impl Future<Output = Result<Note>> + Send;
}

/// The store selected at startup.
#[derive(Debug)]
pub enum Backend {
    Local(LocalNoteStore),
    Http(HttpNoteStore),
}

impl Backend {
    /// Human-readable name of the note a `get(None)` resolves to.
    #[must_use]
    pub fn default_note_label(&self) -> String {
        match self {
            Self::Local(store) => store.default_id().to_string(),
            Self::Http(store) => store
                .default_id()
                .map_or_else(|| "(server default)".to_string(), str::to_string),
        }
    }
}

impl NoteStore for Backend {
    async fn get(&self, id: Option<&str>) -> Result<Note> {
        match self {
            Self::Local(store) => store.get(id).await,
            Self::Http(store) => store.get(id).await,
        }
    }

    async fn save(&self, input: SaveNote) -> Result<Note> {
        match self {
            Self::Local(store) => store.save(input).await,
            Self::Http(store) => store.save(input).await,
        }
    }
}
