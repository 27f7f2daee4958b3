//! Sync client: the cached note plus optimistic saves.

use super::cache::QueryCache;
use super::transaction::OptimisticTransaction;
use crate::error::Error;
use crate::model::{Note, SaveNote};
use crate::storage::NoteStore;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, warn};

/// Result of one save attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The store accepted the write; holds the canonical record.
    Saved(Note),
    /// The store rejected the write and the cache was restored.
    RolledBack,
}

/// Reads and writes one note through a [`NoteStore`], keeping a cached copy.
///
/// Clones share the store and the cache.
pub struct SyncClient<S> {
    store: Arc<S>,
    cache: Arc<Mutex<QueryCache>>,
    note_id: Option<String>,
}

impl<S> Clone for SyncClient<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            cache: Arc::clone(&self.cache),
            note_id: self.note_id.clone(),
        }
    }
}

impl<S: NoteStore> SyncClient<S> {
    /// Client for `note_id`, or the store's default note when `None`.
    pub fn new(store: S, note_id: Option<String>) -> Self {
        Self {
            store: Arc::new(store),
            cache: Arc::new(Mutex::new(QueryCache::new())),
            note_id,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn cache(&self) -> MutexGuard<'_, QueryCache> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current cached note.
    pub fn cached(&self) -> Option<Note> {
        self.cache().get_data().cloned()
    }

    pub fn cancel_fetches(&self) {
        self.cache().cancel();
    }

    /// Fetch the note and cache it.
    ///
    /// Failures are logged and yield `None`. A missing note clears the
    /// cache; other failures leave it as it was. If the fetch was cancelled
    /// while in flight its result is dropped and the cached value returned.
    pub async fn fetch(&self) -> Option<Note> {
        let ticket = self.cache().begin_fetch();

        match self.store.get(self.note_id.as_deref()).await {
            Ok(note) => {
                let applied = self.cache().complete_fetch(ticket, Some(note.clone()));
                if applied {
                    Some(note)
                } else {
                    debug!(id = %note.id, "Discarding cancelled fetch");
                    self.cached()
                }
            }
            Err(e @ Error::NoteNotFound { .. }) => {
                warn!(error = %e, "Note not found");
                self.cache().complete_fetch(ticket, None);
                None
            }
            Err(e) => {
                warn!(error = %e, "Failed to fetch note");
                None
            }
        }
    }

    /// Save with an optimistic cache update.
    ///
    /// The cache shows the new record while the store call is in flight. On
    /// success the canonical record is refetched; on failure the previous
    /// cached value is restored. Failed saves are not retried.
    pub async fn save(&self, input: SaveNote) -> SaveOutcome {
        let transaction = {
            let mut cache = self.cache();
            let optimistic = input.to_optimistic_note(cache.get_data());
            OptimisticTransaction::begin(&mut cache, optimistic)
        };

        match self.store.save(input).await {
            Ok(saved) => {
                let settled = transaction.commit();
                info!(id = %saved.id, ?settled, "Note saved");
                let canonical = self.fetch().await;
                SaveOutcome::Saved(canonical.unwrap_or(saved))
            }
            Err(e) => {
                let settled = transaction.rollback(&mut self.cache());
                warn!(error = %e, ?settled, "Save failed, restored previous note");
                SaveOutcome::RolledBack
            }
        }
    }
}
