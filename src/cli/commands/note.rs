//! Note-level commands.

use super::render::print_list;
use super::{open_editor, runtime};
use crate::cli::NoteArgs;
use crate::config::load_config;
use crate::error::{Error, Result};
use crate::sync::SaveOutcome;
use colored::Colorize;
use serde::Serialize;

#[derive(Serialize)]
struct TitleOutput<'a> {
    id: &'a str,
    title: &'a str,
    text: &'a str,
    dry_run: bool,
}

/// Execute `title`: rename the note, keeping its checklist.
///
/// # Errors
///
/// Returns `InvalidArgument` for an empty title, or `SaveFailed` if the
/// store rejects the save.
pub fn execute(args: &NoteArgs, title: &str, json: bool) -> Result<()> {
    let title = title.trim();
    if title.is_empty() {
        return Err(Error::InvalidArgument("title cannot be empty".to_string()));
    }

    let config = load_config()?;
    let rt = runtime()?;
    rt.block_on(async {
        let mut editor = open_editor(args, &config).await?;

        if crate::is_dry_run() {
            let id = editor.note().map_or("", |n| n.id.as_str());
            if json {
                let text = format!("{title}\n\n{}", editor.checklist().to_body());
                let output = TitleOutput {
                    id,
                    title,
                    text: &text,
                    dry_run: true,
                };
                println!("{}", serde_json::to_string(&output)?);
            } else {
                println!("{} {} -> {}", "Would rename".yellow(), editor.title(), title);
            }
            return Ok(());
        }

        let note = match editor.rename(title).await {
            Some(SaveOutcome::Saved(note)) => note,
            Some(SaveOutcome::RolledBack) | None => {
                return Err(Error::SaveFailed {
                    id: editor.note().map(|n| n.id.clone()).unwrap_or_default(),
                });
            }
        };

        if crate::is_silent() {
            println!("{}", note.id);
        } else if json {
            let output = TitleOutput {
                id: &note.id,
                title: &note.title,
                text: &note.text,
                dry_run: false,
            };
            println!("{}", serde_json::to_string(&output)?);
        } else {
            println!("{} {}", "Renamed".cyan().bold(), note.id.dimmed());
            println!();
            print_list(&editor, editor.checklist().items());
        }
        Ok(())
    })
}
