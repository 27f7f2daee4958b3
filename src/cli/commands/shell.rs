//! Interactive editing session.
//!
//! Reads one command per line from stdin. Without `--auto-save`, edits stay
//! local until `save`; with it, every edit schedules a debounced save and
//! the session flushes pending saves on quit.

use super::render::print_list;
use super::{open_editor, resolve_item, runtime};
use crate::cli::NoteArgs;
use crate::config::{TodoConfig, load_config, resolve_debounce};
use crate::editor::NoteEditor;
use crate::error::{Error, Result};
use crate::model::ItemId;
use crate::storage::{Backend, NoteStore};
use crate::sync::{AutoSaver, SaveOutcome};
use crate::validate::normalize_shell_command;
use colored::Colorize;
use std::io::Write;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

const HELP: &str = "\
Commands:
  list                   show the list (respects the active search)
  add [text]             add an item at the top
  check <item>           check or uncheck an item
  edit <item> <text>     rename an unchecked item
  delete <item>          delete an item (asks for confirmation)
  move <item> <to>       move an item to a 1-based position
  search <query>         filter the list with a fuzzy query
  clear                  clear the search
  dupes                  list duplicated names
  title <text>           rename the note
  save                   save now
  reload                 discard local edits and fetch the note again
  help                   show this help
  quit                   leave the session

<item> is a position from `list` or an exact item name.";

/// One parsed shell line.
#[derive(Debug, Clone, PartialEq, Eq)]
enum ShellCommand {
    List,
    Add(String),
    Check(String),
    Edit { item: String, name: String },
    Delete(String),
    Move { item: String, to: usize },
    Search(String),
    Clear,
    Dupes,
    Title(String),
    Save,
    Reload,
    Help,
    Quit,
}

/// Parse a line. Blank lines yield `Ok(None)`; errors are user-facing messages.
fn parse_line(line: &str) -> std::result::Result<Option<ShellCommand>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (word, rest) = line
        .split_once(char::is_whitespace)
        .map_or((line, ""), |(word, rest)| (word, rest.trim()));

    let canonical = normalize_shell_command(word).map_err(|(input, suggestion)| {
        suggestion.map_or_else(
            || format!("Unknown command '{input}'. Type 'help' for commands."),
            |s| format!("Unknown command '{input}'. Did you mean '{s}'?"),
        )
    })?;

    let required = |what: &str| -> std::result::Result<String, String> {
        if rest.is_empty() {
            Err(format!("Usage: {canonical} <{what}>"))
        } else {
            Ok(rest.to_string())
        }
    };

    let command = match canonical {
        "list" => ShellCommand::List,
        "add" => ShellCommand::Add(rest.to_string()),
        "check" => ShellCommand::Check(required("item")?),
        "edit" => {
            let (item, name) = rest
                .split_once(char::is_whitespace)
                .ok_or_else(|| "Usage: edit <item> <text>".to_string())?;
            ShellCommand::Edit {
                item: item.to_string(),
                name: name.trim().to_string(),
            }
        }
        "delete" => ShellCommand::Delete(required("item")?),
        "move" => {
            let usage = || "Usage: move <item> <to>".to_string();
            let (item, to) = rest.rsplit_once(char::is_whitespace).ok_or_else(usage)?;
            let to = to.parse::<usize>().map_err(|_| usage())?;
            ShellCommand::Move {
                item: item.trim().to_string(),
                to,
            }
        }
        "search" => ShellCommand::Search(rest.to_string()),
        "clear" => ShellCommand::Clear,
        "dupes" => ShellCommand::Dupes,
        "title" => ShellCommand::Title(required("title")?),
        "save" => ShellCommand::Save,
        "reload" => ShellCommand::Reload,
        "help" => ShellCommand::Help,
        "quit" => ShellCommand::Quit,
        other => return Err(format!("Unhandled command '{other}'")),
    };
    Ok(Some(command))
}

/// Execute `shell`.
///
/// # Errors
///
/// Returns an error if the note cannot be loaded or stdin cannot be read.
pub fn execute(args: &NoteArgs, auto_save: bool, debounce_ms: Option<u64>) -> Result<()> {
    let config = load_config()?;
    let quiet = resolve_debounce(debounce_ms, &config);
    let rt = runtime()?;
    rt.block_on(run(args, &config, auto_save, quiet))
}

async fn run(args: &NoteArgs, config: &TodoConfig, auto_save: bool, quiet: Duration) -> Result<()> {
    let mut editor = open_editor(args, config).await?;
    let mut saver = auto_save.then(|| AutoSaver::spawn(editor.client().clone(), quiet));
    let mut pending_delete: Option<ItemId> = None;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    debug!(auto_save, quiet_ms = quiet.as_millis(), "Shell started");
    print_list(&editor, &editor.visible_items());
    println!("{}", "Type 'help' for commands.".dimmed());

    loop {
        if let Some(saver) = saver.as_mut() {
            for outcome in saver.drain_outcomes() {
                report(&mut editor, outcome);
            }
        }

        prompt(&editor, pending_delete.is_some())?;
        let Some(line) = lines.next_line().await? else {
            break;
        };

        if let Some(id) = pending_delete.take() {
            if matches!(line.trim().to_lowercase().as_str(), "y" | "yes") {
                editor.checklist_mut().delete_item(id);
                changed(&editor, saver.as_ref());
                print_list(&editor, &editor.visible_items());
            } else {
                println!("{}", "Kept.".dimmed());
            }
            continue;
        }

        let command = match parse_line(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(message) => {
                eprintln!("{}", message.yellow());
                continue;
            }
        };

        if command == ShellCommand::Quit {
            break;
        }

        match step(&mut editor, saver.as_ref(), command).await {
            Ok(Some(id)) => {
                let name = editor.checklist().get(id).map(|item| item.name.clone());
                println!(
                    "Delete '{}'? [y/N]",
                    name.as_deref().filter(|n| !n.is_empty()).unwrap_or("(blank)")
                );
                pending_delete = Some(id);
            }
            Ok(None) => {}
            Err(e) => print_error(&e),
        }
    }

    if let Some(saver) = saver {
        for outcome in saver.shutdown().await {
            report(&mut editor, outcome);
        }
    }
    if editor.unsaved_changes() {
        eprintln!("{}", "warning: leaving with unsaved changes".yellow());
    }
    Ok(())
}

/// Run one command. Returns the item awaiting delete confirmation, if any.
async fn step(
    editor: &mut NoteEditor<Backend>,
    saver: Option<&AutoSaver>,
    command: ShellCommand,
) -> Result<Option<ItemId>> {
    match command {
        ShellCommand::List => print_list(editor, &editor.visible_items()),
        ShellCommand::Add(name) => {
            editor.checklist_mut().add_named(&name);
            edited(editor, saver);
        }
        ShellCommand::Check(item) => {
            let id = resolve_item(editor.checklist(), &item)?;
            editor.checklist_mut().toggle_check(id);
            edited(editor, saver);
        }
        ShellCommand::Edit { item, name } => {
            let id = resolve_item(editor.checklist(), &item)?;
            if !editor.checklist_mut().edit_item(id, &name) {
                return Err(Error::InvalidArgument(format!(
                    "item {item} is checked and cannot be edited"
                )));
            }
            edited(editor, saver);
        }
        ShellCommand::Delete(item) => {
            return resolve_item(editor.checklist(), &item).map(Some);
        }
        ShellCommand::Move { item, to } => {
            let index = to
                .checked_sub(1)
                .ok_or_else(|| Error::InvalidArgument("positions start at 1".to_string()))?;
            let id = resolve_item(editor.checklist(), &item)?;
            editor.checklist_mut().move_item(id, index);
            edited(editor, saver);
        }
        ShellCommand::Search(query) => {
            editor.set_query(query);
            if !editor.query().is_empty() && editor.search_results().is_empty() {
                println!(
                    "{}",
                    format!("No matches for '{}', showing all items.", editor.query()).dimmed()
                );
            }
            print_list(editor, &editor.visible_items());
        }
        ShellCommand::Clear => {
            editor.clear_query();
            print_list(editor, &editor.visible_items());
        }
        ShellCommand::Dupes => {
            let dupes = editor.duplicates();
            if dupes.is_empty() {
                println!("{}", "No duplicate items.".dimmed());
            }
            for name in dupes {
                println!("{}", name.magenta());
            }
        }
        ShellCommand::Title(title) => match editor.rename(&title).await {
            Some(SaveOutcome::Saved(_)) => println!("{} {}", "Renamed to".cyan(), editor.title()),
            _ => {
                return Err(Error::SaveFailed {
                    id: editor.note().map(|n| n.id.clone()).unwrap_or_default(),
                });
            }
        },
        ShellCommand::Save => match editor.save().await {
            None => println!("{}", "No changes.".dimmed()),
            Some(SaveOutcome::Saved(_)) => println!("{}", "Saved.".green()),
            Some(SaveOutcome::RolledBack) => {
                return Err(Error::SaveFailed {
                    id: editor.note().map(|n| n.id.clone()).unwrap_or_default(),
                });
            }
        },
        ShellCommand::Reload => {
            let discarded = editor.unsaved_changes();
            if editor.load().await.is_none() {
                return Err(Error::NoteNotFound {
                    id: editor.client().store().default_note_label(),
                });
            }
            if discarded {
                println!("{}", "Discarded local edits.".yellow());
            }
            print_list(editor, &editor.visible_items());
        }
        ShellCommand::Help => println!("{HELP}"),
        ShellCommand::Quit => {}
    }
    Ok(None)
}

/// After a list edit: schedule an auto-save and redraw.
fn edited<S: NoteStore>(editor: &NoteEditor<S>, saver: Option<&AutoSaver>) {
    changed(editor, saver);
    print_list(editor, &editor.visible_items());
}

/// Queue the current list with the auto-saver, replacing any pending edit.
fn changed<S: NoteStore>(editor: &NoteEditor<S>, saver: Option<&AutoSaver>) {
    let Some(saver) = saver else {
        return;
    };
    if let Some(input) = editor.latest_input() {
        if !saver.schedule(input) {
            eprintln!("{}", "warning: auto-save stopped; use 'save'".yellow());
        }
    }
}

fn report<S: NoteStore>(editor: &mut NoteEditor<S>, outcome: SaveOutcome) {
    match outcome {
        SaveOutcome::Saved(note) => {
            editor.acknowledge(note);
            println!("{}", "(saved)".dimmed());
        }
        SaveOutcome::RolledBack => {
            eprintln!("{}", "Auto-save failed; edits are kept locally.".yellow());
        }
    }
}

fn prompt(editor: &NoteEditor<Backend>, confirming: bool) -> Result<()> {
    if !confirming {
        let marker = if editor.unsaved_changes() { "*" } else { "" };
        print!("{}{marker}> ", "todo".cyan().bold());
    }
    std::io::stdout().flush()?;
    Ok(())
}

fn print_error(e: &Error) {
    eprintln!("{} {e}", "error:".red().bold());
    if let Some(hint) = e.hint() {
        eprintln!("  {}", hint.dimmed());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::SyncClient;
    use crate::sync::testing::{MemoryStore, note};

    async fn auto_saving(body: &str) -> (NoteEditor<MemoryStore>, AutoSaver) {
        let mut editor = NoteEditor::new(SyncClient::new(MemoryStore::with_note(note(body)), None));
        assert!(editor.load().await.is_some());
        let saver = AutoSaver::spawn(editor.client().clone(), Duration::from_millis(500));
        (editor, saver)
    }

    #[tokio::test(start_paused = true)]
    async fn test_auto_save_of_reverted_edit_stores_latest_state() {
        let (mut editor, saver) = auto_saving("milk\to").await;
        let id = editor.checklist().id_at(0).unwrap();

        editor.checklist_mut().toggle_check(id);
        changed(&editor, Some(&saver));
        tokio::time::sleep(Duration::from_millis(100)).await;
        editor.checklist_mut().toggle_check(id);
        changed(&editor, Some(&saver));
        tokio::time::sleep(Duration::from_secs(1)).await;

        for outcome in saver.shutdown().await {
            report(&mut editor, outcome);
        }
        assert_eq!(editor.client().store().saved_bodies(), vec!["milk\to".to_string()]);
        assert_eq!(editor.note().map(|n| n.body.as_str()), Some("milk\to"));
        assert!(!editor.unsaved_changes());
    }

    #[tokio::test(start_paused = true)]
    async fn test_auto_save_flushes_burst_on_shutdown() {
        let (mut editor, saver) = auto_saving("milk\to").await;

        editor.checklist_mut().add_named("eggs");
        changed(&editor, Some(&saver));
        editor.checklist_mut().add_named("bread");
        changed(&editor, Some(&saver));

        for outcome in saver.shutdown().await {
            report(&mut editor, outcome);
        }
        assert_eq!(
            editor.client().store().saved_bodies(),
            vec!["bread\to\neggs\to\nmilk\to".to_string()]
        );
        assert!(!editor.unsaved_changes());
    }

    #[test]
    fn test_parse_synonyms() {
        assert_eq!(parse_line("ls"), Ok(Some(ShellCommand::List)));
        assert_eq!(parse_line("  done 2 "), Ok(Some(ShellCommand::Check("2".into()))));
        assert_eq!(parse_line("q"), Ok(Some(ShellCommand::Quit)));
        assert_eq!(parse_line(""), Ok(None));
    }

    #[test]
    fn test_parse_arguments() {
        assert_eq!(
            parse_line("edit 3 oat milk"),
            Ok(Some(ShellCommand::Edit {
                item: "3".into(),
                name: "oat milk".into()
            }))
        );
        assert_eq!(
            parse_line("mv whole milk 1"),
            Ok(Some(ShellCommand::Move {
                item: "whole milk".into(),
                to: 1
            }))
        );
        assert_eq!(parse_line("add"), Ok(Some(ShellCommand::Add(String::new()))));
        assert_eq!(parse_line("search"), Ok(Some(ShellCommand::Search(String::new()))));
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_line("check").unwrap_err().contains("Usage"));
        assert!(parse_line("move milk").is_err());
        assert!(parse_line("delte 2").unwrap_err().contains("Did you mean 'delete'"));
        assert!(parse_line("frobnicate").unwrap_err().contains("help"));
    }
}
