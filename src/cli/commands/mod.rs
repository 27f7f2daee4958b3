//! Command implementations.

pub mod completions;
pub mod history;
pub mod init;
pub mod items;
pub mod note;
pub mod shell;
pub mod version;

mod render;

use crate::checklist::Checklist;
use crate::cli::NoteArgs;
use crate::config::{
    DEFAULT_NOTE_ID, TodoConfig, default_author, resolve_db_path, resolve_note_id,
    resolve_remote_url,
};
use crate::editor::NoteEditor;
use crate::error::{Error, Result};
use crate::model::ItemId;
use crate::storage::{Backend, HttpNoteStore, LocalNoteStore};
use crate::sync::SyncClient;
use crate::validate::find_similar_names;
use tracing::debug;

/// Create the tokio runtime commands block on.
pub(crate) fn runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Runtime::new()
        .map_err(|e| Error::Other(format!("Failed to create async runtime: {e}")))
}

/// Select the note store: remote when an endpoint is configured, else the local database.
pub(crate) fn open_backend(args: &NoteArgs, config: &TodoConfig) -> Result<Backend> {
    let note_id = resolve_note_id(args.note.as_deref(), config);

    if let Some(url) = resolve_remote_url(args.remote.as_deref(), config) {
        debug!(url = %url, "Using remote note store");
        return Ok(Backend::Http(HttpNoteStore::new(url, note_id)));
    }

    let db_path = resolve_db_path(args.db.as_deref()).ok_or(Error::NotInitialized)?;
    if !db_path.exists() {
        return Err(Error::NotInitialized);
    }

    let actor = args
        .author
        .clone()
        .unwrap_or_else(|| default_author(config));
    let store = LocalNoteStore::open(
        &db_path,
        note_id.unwrap_or_else(|| DEFAULT_NOTE_ID.to_string()),
        actor,
    )?;
    Ok(Backend::Local(store))
}

/// Open the configured note for editing.
///
/// # Errors
///
/// Returns `NoteNotFound` if the note could not be loaded.
pub(crate) async fn open_editor(args: &NoteArgs, config: &TodoConfig) -> Result<NoteEditor<Backend>> {
    let backend = open_backend(args, config)?;
    let label = backend.default_note_label();

    let mut editor = NoteEditor::new(SyncClient::new(backend, None));
    if editor.load().await.is_none() {
        return Err(Error::NoteNotFound { id: label });
    }
    Ok(editor)
}

/// Resolve an item reference: a 1-based position, or an exact name.
pub(crate) fn resolve_item(list: &Checklist, reference: &str) -> Result<ItemId> {
    let reference = reference.trim();

    if let Ok(position) = reference.parse::<usize>() {
        return position
            .checked_sub(1)
            .and_then(|index| list.id_at(index))
            .ok_or_else(|| Error::ItemNotFound {
                reference: reference.to_string(),
                len: list.len(),
            });
    }

    let matches: Vec<ItemId> = list
        .items()
        .iter()
        .filter(|item| item.name == reference)
        .map(|item| item.id)
        .collect();

    match matches.as_slice() {
        [id] => Ok(*id),
        [] => {
            let names: Vec<String> = list.items().iter().map(|item| item.name.clone()).collect();
            let similar = find_similar_names(reference, &names, 3);
            if similar.is_empty() {
                Err(Error::ItemNotFound {
                    reference: reference.to_string(),
                    len: list.len(),
                })
            } else {
                Err(Error::ItemNotFoundSimilar {
                    reference: reference.to_string(),
                    similar,
                })
            }
        }
        _ => Err(Error::AmbiguousItem {
            name: reference.to_string(),
            count: matches.len(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_by_position() {
        let list = Checklist::from_body("milk\to\neggs\tx");
        assert_eq!(resolve_item(&list, "2").unwrap(), list.id_at(1).unwrap());
        assert!(matches!(
            resolve_item(&list, "0"),
            Err(Error::ItemNotFound { len: 2, .. })
        ));
        assert!(matches!(
            resolve_item(&list, "3"),
            Err(Error::ItemNotFound { .. })
        ));
    }

    #[test]
    fn test_resolve_by_name() {
        let list = Checklist::from_body("milk\to\neggs\tx");
        assert_eq!(resolve_item(&list, "eggs").unwrap(), list.id_at(1).unwrap());

        let err = resolve_item(&list, "mlk").unwrap_err();
        assert!(matches!(err, Error::ItemNotFoundSimilar { ref similar, .. } if similar == &["milk"]));
    }

    #[test]
    fn test_duplicate_name_is_ambiguous() {
        let list = Checklist::from_body("milk\to\nmilk\tx");
        assert!(matches!(
            resolve_item(&list, "milk"),
            Err(Error::AmbiguousItem { count: 2, .. })
        ));
    }
}
