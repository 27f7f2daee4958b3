//! Shared list rendering for commands and the shell.

use crate::checklist::is_duplicate;
use crate::editor::NoteEditor;
use crate::model::{Item, ItemId};
use crate::storage::NoteStore;
use colored::{ColoredString, Colorize};
use serde::Serialize;

#[derive(Serialize)]
pub(crate) struct ItemView<'a> {
    pub position: usize,
    pub id: ItemId,
    pub name: &'a str,
    pub checked: bool,
    pub duplicate: bool,
}

#[derive(Serialize)]
pub(crate) struct ListView<'a> {
    pub note_id: &'a str,
    pub title: &'a str,
    pub items: Vec<ItemView<'a>>,
    pub count: usize,
    pub unsaved_changes: bool,
    pub duplicates: Vec<String>,
}

/// JSON view of `items`, with positions taken from the full list.
pub(crate) fn list_view<'a, S: NoteStore>(editor: &'a NoteEditor<S>, items: &'a [Item]) -> ListView<'a> {
    let duplicates = editor.duplicates();
    let views = items
        .iter()
        .map(|item| ItemView {
            position: position_of(editor, item),
            id: item.id,
            name: &item.name,
            checked: item.checked,
            duplicate: is_duplicate(&duplicates, &item.name),
        })
        .collect();

    ListView {
        note_id: editor.note().map_or("", |n| n.id.as_str()),
        title: editor.title(),
        items: views,
        count: editor.checklist().len(),
        unsaved_changes: editor.unsaved_changes(),
        duplicates,
    }
}

fn position_of<S: NoteStore>(editor: &NoteEditor<S>, item: &Item) -> usize {
    editor.checklist().position(item.id).map_or(0, |p| p + 1)
}

/// One list row: duplicate marker, position, checkbox, name.
pub(crate) fn item_line(position: usize, item: &Item, duplicate: bool) -> String {
    let marker = if duplicate {
        "▍".magenta().to_string()
    } else {
        " ".to_string()
    };
    let index = format!("{position:>3}.");
    let name: ColoredString = if item.name.is_empty() {
        "(blank)".italic()
    } else {
        item.name.as_str().normal()
    };

    if item.checked {
        format!(
            "{marker}{} {} {}",
            index.dimmed(),
            "[x]".green(),
            name.strikethrough().dimmed()
        )
    } else {
        format!("{marker}{index} [ ] {name}")
    }
}

/// Print the title, `items`, and the unsaved banner.
pub(crate) fn print_list<S: NoteStore>(editor: &NoteEditor<S>, items: &[Item]) {
    let title = editor.title();
    if title.is_empty() {
        println!("{}", "(untitled)".bold());
    } else {
        println!("{}", title.bold());
    }

    if items.is_empty() {
        println!("     {}", "(empty)".dimmed());
    }

    let duplicates = editor.duplicates();
    for item in items {
        println!(
            "{}",
            item_line(position_of(editor, item), item, is_duplicate(&duplicates, &item.name))
        );
    }

    if editor.unsaved_changes() {
        println!();
        println!("{}", "unsaved changes!".yellow().bold());
    }
}
