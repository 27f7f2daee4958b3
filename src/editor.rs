//! Editing session for one note.
//!
//! Ties the in-memory [`Checklist`] to a [`SyncClient`]. The list is
//! (re)built from the note body whenever a fetched note arrives; local edits
//! only touch the list until they are saved.
//!
//! The editor remembers the last record the store confirmed (`synced`), and
//! "unsaved changes" means the list no longer serializes to that record's
//! body. A rolled-back save leaves `synced` alone, so the edits stay on
//! screen and are still reported as unsaved.

use crate::checklist::{Checklist, SearchIndex, SearchOptions, visible_items};
use crate::model::{Item, Note, SaveNote};
use crate::storage::NoteStore;
use crate::sync::{SaveOutcome, SyncClient};

/// One note being edited.
pub struct NoteEditor<S> {
    client: SyncClient<S>,
    synced: Option<Note>,
    checklist: Checklist,
    query: String,
    search_options: SearchOptions,
}

impl<S: NoteStore> NoteEditor<S> {
    pub fn new(client: SyncClient<S>) -> Self {
        Self {
            client,
            synced: None,
            checklist: Checklist::from_body(""),
            query: String::new(),
            search_options: SearchOptions::default(),
        }
    }

    pub fn client(&self) -> &SyncClient<S> {
        &self.client
    }

    /// Fetch the note and rebuild the list from its body.
    ///
    /// Returns `None` when the note could not be fetched; the list is then
    /// left as it was.
    pub async fn load(&mut self) -> Option<&Note> {
        let note = self.client.fetch().await?;
        self.checklist.reset(&note.body);
        self.synced = Some(note);
        self.synced.as_ref()
    }

    /// Record a store-confirmed note without touching the list.
    pub fn acknowledge(&mut self, note: Note) {
        self.synced = Some(note);
    }

    #[must_use]
    pub fn note(&self) -> Option<&Note> {
        self.synced.as_ref()
    }

    /// Display title, or `""` before the note has loaded.
    #[must_use]
    pub fn title(&self) -> &str {
        self.synced.as_ref().map_or("", Note::display_title)
    }

    #[must_use]
    pub fn checklist(&self) -> &Checklist {
        &self.checklist
    }

    pub fn checklist_mut(&mut self) -> &mut Checklist {
        &mut self.checklist
    }

    #[must_use]
    pub fn unsaved_changes(&self) -> bool {
        self.synced
            .as_ref()
            .is_some_and(|note| self.checklist.unsaved_changes(&note.body))
    }

    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub fn clear_query(&mut self) {
        self.query.clear();
    }

    /// Ranked matches for the current query (empty query: the whole list).
    #[must_use]
    pub fn search_results(&self) -> Vec<Item> {
        SearchIndex::new(self.checklist.items(), self.search_options.clone()).search(&self.query)
    }

    /// Items to display: search results, or the whole list when the query
    /// is empty or matched nothing.
    #[must_use]
    pub fn visible_items(&self) -> Vec<Item> {
        visible_items(self.checklist.items(), self.search_results(), &self.query)
    }

    #[must_use]
    pub fn duplicates(&self) -> Vec<String> {
        self.checklist.duplicates()
    }

    /// Save input for the current list, or `None` when there is nothing to save.
    #[must_use]
    pub fn save_input(&self) -> Option<SaveNote> {
        if !self.unsaved_changes() {
            return None;
        }
        let note = self.synced.as_ref()?;
        Some(SaveNote::from_note(note, self.checklist.to_body()))
    }

    /// Save input for the current list, even when it matches the synced note.
    ///
    /// A queued auto-save must be superseded by every later edit, including
    /// one that reverts the list to what the store already holds.
    #[must_use]
    pub fn latest_input(&self) -> Option<SaveNote> {
        let note = self.synced.as_ref()?;
        Some(SaveNote::from_note(note, self.checklist.to_body()))
    }

    /// Save the list if it has unsaved changes.
    pub async fn save(&mut self) -> Option<SaveOutcome> {
        let input = self.save_input()?;
        Some(self.submit(input).await)
    }

    /// Save the list under a new title, along with any unsaved item edits.
    pub async fn rename(&mut self, title: &str) -> Option<SaveOutcome> {
        let note = self.synced.as_ref()?;
        let input = SaveNote::from_note(note, self.checklist.to_body()).with_title(title);
        Some(self.submit(input).await)
    }

    async fn submit(&mut self, input: SaveNote) -> SaveOutcome {
        let outcome = self.client.save(input).await;
        if let SaveOutcome::Saved(note) = &outcome {
            self.acknowledge(note.clone());
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::testing::{MemoryStore, note};

    async fn loaded(body: &str) -> NoteEditor<MemoryStore> {
        let mut editor = NoteEditor::new(SyncClient::new(MemoryStore::with_note(note(body)), None));
        assert!(editor.load().await.is_some());
        editor
    }

    #[tokio::test]
    async fn test_load_builds_list() {
        let editor = loaded("milk\to\neggs\tx").await;
        assert_eq!(editor.checklist().len(), 2);
        assert_eq!(editor.title(), "todo");
        assert!(!editor.unsaved_changes());
        assert!(editor.save_input().is_none());
    }

    #[tokio::test]
    async fn test_missing_note_leaves_editor_empty() {
        let mut editor = NoteEditor::new(SyncClient::new(MemoryStore::empty(), None));
        assert!(editor.load().await.is_none());
        assert!(editor.note().is_none());
        assert!(!editor.unsaved_changes());
    }

    #[tokio::test]
    async fn test_save_builds_text_from_title_and_body() {
        let mut editor = loaded("milk\to").await;
        let id = editor.checklist().id_at(0).unwrap();
        editor.checklist_mut().toggle_check(id);
        assert!(editor.unsaved_changes());

        let input = editor.save_input().unwrap();
        assert_eq!(input.text.as_deref(), Some("todo\n\nmilk\tx"));
        assert_eq!(input.author, "ana");

        let outcome = editor.save().await;
        assert!(matches!(outcome, Some(SaveOutcome::Saved(_))));
        assert!(!editor.unsaved_changes());
        // ids survive the save
        assert_eq!(editor.checklist().id_at(0), Some(id));
    }

    #[tokio::test]
    async fn test_failed_save_keeps_edits_unsaved() {
        let mut editor = loaded("milk\to").await;
        editor.checklist_mut().add_named("eggs");
        editor.client().store().fail_saves(true);

        assert_eq!(editor.save().await, Some(SaveOutcome::RolledBack));
        assert!(editor.unsaved_changes());
        assert_eq!(editor.checklist().to_body(), "eggs\to\nmilk\to");
        assert_eq!(editor.note().map(|n| n.body.as_str()), Some("milk\to"));
    }

    #[tokio::test]
    async fn test_latest_input_covers_a_revert() {
        let mut editor = loaded("milk\to").await;
        let id = editor.checklist().id_at(0).unwrap();
        editor.checklist_mut().toggle_check(id);
        editor.checklist_mut().toggle_check(id);

        assert!(editor.save_input().is_none());
        let input = editor.latest_input().unwrap();
        assert_eq!(input.body.as_deref(), Some("milk\to"));
    }

    #[tokio::test]
    async fn test_search_falls_back_to_full_list() {
        let mut editor = loaded("milk\to\nbread\to").await;
        editor.set_query("brd");
        assert_eq!(editor.visible_items().len(), 1);

        editor.set_query("zzzzzz");
        assert_eq!(editor.visible_items().len(), 2);

        editor.clear_query();
        assert_eq!(editor.visible_items().len(), 2);
    }

    #[tokio::test]
    async fn test_rename_keeps_body() {
        let mut editor = loaded("milk\to").await;
        let outcome = editor.rename("= Groceries").await;
        assert!(matches!(outcome, Some(SaveOutcome::Saved(ref n)) if n.text == "= Groceries\n\nmilk\to"));
        assert_eq!(editor.title(), "Groceries");
    }
}
