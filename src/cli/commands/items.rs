//! Item commands: show, add, check, edit, delete, move, dupes, search.
//!
//! Each mutating command loads the note, applies one change to the list and
//! saves it. The list keeps unchecked items above checked ones after every
//! change, so the reported position can differ from the one requested.

use super::render::{ListView, item_line, list_view, print_list};
use super::{open_editor, resolve_item, runtime};
use crate::checklist::{Checklist, is_duplicate};
use crate::cli::NoteArgs;
use crate::config::load_config;
use crate::editor::NoteEditor;
use crate::error::{Error, Result};
use crate::model::ItemId;
use crate::storage::Backend;
use crate::sync::SaveOutcome;
use colored::Colorize;
use serde::Serialize;

#[derive(Serialize)]
struct MutationOutput<'a> {
    action: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    position: Option<usize>,
    saved: bool,
    dry_run: bool,
    #[serde(flatten)]
    list: ListView<'a>,
}

#[derive(Serialize)]
struct SearchOutput<'a> {
    query: &'a str,
    matched: bool,
    #[serde(flatten)]
    list: ListView<'a>,
}

#[derive(Serialize)]
struct DuplicateGroup {
    name: String,
    occurrences: usize,
}

#[derive(Serialize)]
struct DupesOutput {
    duplicates: Vec<DuplicateGroup>,
    count: usize,
}

/// Execute `show`, optionally filtered by a fuzzy query.
///
/// # Errors
///
/// Returns an error if the note cannot be loaded.
pub fn show(args: &NoteArgs, search: Option<&str>, json: bool) -> Result<()> {
    match search {
        Some(query) => self::search(args, query, json),
        None => run_read(args, |editor| {
            let items = editor.checklist().items();
            if json {
                println!("{}", serde_json::to_string(&list_view(editor, items))?);
            } else {
                print_list(editor, items);
            }
            Ok(())
        }),
    }
}

/// Execute `search`. An empty query, or one that matches nothing, shows the whole list.
///
/// # Errors
///
/// Returns an error if the note cannot be loaded.
pub fn search(args: &NoteArgs, query: &str, json: bool) -> Result<()> {
    let query = query.to_string();
    run_read(args, move |editor| {
        editor.set_query(query);
        let matched = editor.query().is_empty() || !editor.search_results().is_empty();
        let visible = editor.visible_items();

        if json {
            let output = SearchOutput {
                query: editor.query(),
                matched,
                list: list_view(editor, &visible),
            };
            println!("{}", serde_json::to_string(&output)?);
        } else {
            if !matched {
                println!(
                    "{}",
                    format!("No matches for '{}', showing all items.", editor.query()).dimmed()
                );
            }
            print_list(editor, &visible);
        }
        Ok(())
    })
}

/// Execute `dupes`.
///
/// # Errors
///
/// Returns an error if the note cannot be loaded.
pub fn dupes(args: &NoteArgs, json: bool) -> Result<()> {
    run_read(args, |editor| {
        let groups: Vec<DuplicateGroup> = editor
            .duplicates()
            .into_iter()
            .map(|name| {
                let occurrences = editor
                    .checklist()
                    .items()
                    .iter()
                    .filter(|item| item.name == name)
                    .count();
                DuplicateGroup { name, occurrences }
            })
            .collect();

        if json {
            let count = groups.len();
            let output = DupesOutput {
                duplicates: groups,
                count,
            };
            println!("{}", serde_json::to_string(&output)?);
        } else if groups.is_empty() {
            println!("{}", "No duplicate items.".dimmed());
        } else {
            for group in &groups {
                println!(
                    "{} {}",
                    group.name.magenta(),
                    format!("x{}", group.occurrences).dimmed()
                );
            }
        }
        Ok(())
    })
}

/// Execute `add`. A missing name adds a blank item.
///
/// # Errors
///
/// Returns an error if the note cannot be loaded or saved.
pub fn add(args: &NoteArgs, name: Option<&str>, json: bool) -> Result<()> {
    let name = name.unwrap_or_default();
    apply(args, "add", json, |list| Ok(list.add_named(name)))
}

/// Execute `check`, toggling the item.
///
/// # Errors
///
/// Returns an error if the item cannot be resolved or the save fails.
pub fn check(args: &NoteArgs, item: &str, json: bool) -> Result<()> {
    apply(args, "check", json, |list| {
        let id = resolve_item(list, item)?;
        list.toggle_check(id);
        Ok(id)
    })
}

/// Execute `edit`.
///
/// # Errors
///
/// Returns `InvalidArgument` for a checked item, or an error if the item
/// cannot be resolved or the save fails.
pub fn edit(args: &NoteArgs, item: &str, name: &str, json: bool) -> Result<()> {
    apply(args, "edit", json, |list| {
        let id = resolve_item(list, item)?;
        if !list.edit_item(id, name) {
            return Err(Error::InvalidArgument(format!(
                "item {item} is checked and cannot be edited"
            )));
        }
        Ok(id)
    })
}

/// Execute `delete`.
///
/// # Errors
///
/// Returns an error if the item cannot be resolved or the save fails.
pub fn delete(args: &NoteArgs, item: &str, json: bool) -> Result<()> {
    apply(args, "delete", json, |list| {
        let id = resolve_item(list, item)?;
        list.delete_item(id);
        Ok(id)
    })
}

/// Execute `move`. `to` is 1-based and clamped to the list end.
///
/// # Errors
///
/// Returns an error if `to` is zero, the item cannot be resolved, or the save fails.
pub fn move_item(args: &NoteArgs, item: &str, to: usize, json: bool) -> Result<()> {
    let index = to
        .checked_sub(1)
        .ok_or_else(|| Error::InvalidArgument("positions start at 1".to_string()))?;

    apply(args, "move", json, |list| {
        let id = resolve_item(list, item)?;
        list.move_item(id, index);
        Ok(id)
    })
}

/// Load the note and hand the editor to a read-only command.
fn run_read<F>(args: &NoteArgs, f: F) -> Result<()>
where
    F: FnOnce(&mut NoteEditor<Backend>) -> Result<()>,
{
    let config = load_config()?;
    let rt = runtime()?;
    rt.block_on(async {
        let mut editor = open_editor(args, &config).await?;
        f(&mut editor)
    })
}

/// Load the note, apply one list change, save, and report.
///
/// `change` returns the affected item. Under `--dry-run` the change is
/// printed but not saved.
fn apply<F>(args: &NoteArgs, action: &str, json: bool, change: F) -> Result<()>
where
    F: FnOnce(&mut Checklist) -> Result<ItemId>,
{
    let config = load_config()?;
    let rt = runtime()?;
    rt.block_on(async {
        let mut editor = open_editor(args, &config).await?;
        let id = change(editor.checklist_mut())?;

        let dry_run = crate::is_dry_run();
        let saved = if dry_run {
            false
        } else {
            match editor.save().await {
                None => false,
                Some(SaveOutcome::Saved(_)) => true,
                Some(SaveOutcome::RolledBack) => {
                    return Err(Error::SaveFailed {
                        id: editor.note().map(|n| n.id.clone()).unwrap_or_default(),
                    });
                }
            }
        };
        let position = editor.checklist().position(id).map(|p| p + 1);

        if crate::is_silent() {
            if let Some(position) = position {
                println!("{position}");
            }
            return Ok(());
        }

        if json {
            let output = MutationOutput {
                action,
                position,
                saved,
                dry_run,
                list: list_view(&editor, editor.checklist().items()),
            };
            println!("{}", serde_json::to_string(&output)?);
            return Ok(());
        }

        if dry_run {
            println!("{}", format!("Would {action}:").yellow());
        } else if !saved {
            println!("{}", "No changes.".dimmed());
        }
        let affected = position.and_then(|p| editor.checklist().items().get(p - 1).map(|item| (p, item)));
        if let Some((p, item)) = affected {
            let duplicate = is_duplicate(&editor.duplicates(), &item.name);
            println!("{} {}", action.cyan().bold(), item_line(p, item, duplicate).trim_start());
        } else {
            println!("{}", action.cyan().bold());
        }
        println!();
        print_list(&editor, editor.checklist().items());
        Ok(())
    })
}
