//! Client/server synchronization for the edited note.
//!
//! - **Cache**: the last known note, with cancellable fetches
//! - **Transaction**: snapshot → optimistic write → commit or rollback
//! - **Client**: `fetch` and `save` over a [`NoteStore`](crate::storage::NoteStore)
//! - **Auto-save**: debounced background saves of the latest edit
//!
//! # Save lifecycle
//!
//! 1. Cancel in-flight fetches so a late response cannot clobber the edit
//! 2. Snapshot the cached note and overwrite it with the optimistic record
//! 3. Await the store
//! 4. Success: drop the snapshot and refetch the canonical record.
//!    Failure: log and restore the snapshot. No retry.

mod autosave;
mod cache;
mod client;
mod transaction;

pub use autosave::{AutoSaver, DEFAULT_DEBOUNCE};
pub use cache::{FetchTicket, QueryCache};
pub use client::{SaveOutcome, SyncClient};
pub use transaction::{OptimisticTransaction, Settlement};

#[cfg(test)]
pub(crate) mod testing {
    use crate::error::{Error, Result};
    use crate::model::{Note, SaveNote};
    use crate::storage::NoteStore;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    pub fn note(body: &str) -> Note {
        Note {
            id: "home".to_string(),
            title: "todo".to_string(),
            text: format!("todo\n\n{body}"),
            body: body.to_string(),
            author: "ana".to_string(),
            created_at: 0,
            updated_at: 0,
        }
    }

    /// In-memory store with switchable failures and call counters.
    #[derive(Default)]
    pub struct MemoryStore {
        note: Mutex<Option<Note>>,
        saved: Mutex<Vec<String>>,
        gets: AtomicUsize,
        fail_gets: AtomicBool,
        fail_saves: AtomicBool,
    }

    impl MemoryStore {
        pub fn empty() -> Self {
            Self::default()
        }

        pub fn with_note(note: Note) -> Self {
            Self {
                note: Mutex::new(Some(note)),
                ..Self::default()
            }
        }

        pub fn fail_gets(&self, fail: bool) {
            self.fail_gets.store(fail, Ordering::SeqCst);
        }

        pub fn fail_saves(&self, fail: bool) {
            self.fail_saves.store(fail, Ordering::SeqCst);
        }

        pub fn gets(&self) -> usize {
            self.gets.load(Ordering::SeqCst)
        }

        /// Save attempts, including failed ones.
        pub fn saves(&self) -> usize {
            self.saved.lock().unwrap().len()
        }

        pub fn saved_bodies(&self) -> Vec<String> {
            self.saved.lock().unwrap().clone()
        }
    }

    impl NoteStore for MemoryStore {
        async fn get(&self, _id: Option<&str>) -> Result<Note> {
            self.gets.fetch_add(1, Ordering::SeqCst);
            if self.fail_gets.load(Ordering::SeqCst) {
                return Err(Error::Other("connection refused".to_string()));
            }
            self.note
                .lock()
                .unwrap()
                .clone()
                .ok_or_else(|| Error::NoteNotFound { id: "home".to_string() })
        }

        async fn save(&self, input: SaveNote) -> Result<Note> {
            self.saved
                .lock()
                .unwrap()
                .push(input.body_or_default().to_string());
            if self.fail_saves.load(Ordering::SeqCst) {
                return Err(Error::Other("connection refused".to_string()));
            }
            let saved = input.to_optimistic_note(self.note.lock().unwrap().as_ref());
            *self.note.lock().unwrap() = Some(saved.clone());
            Ok(saved)
        }
    }
}
