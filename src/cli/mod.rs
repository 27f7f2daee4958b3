//! CLI definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod commands;

/// todo - edit a checklist kept in a single note
#[derive(Parser, Debug)]
#[command(name = "todo", author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Database path (default: ~/.todo/data/todo.db)
    #[arg(long, global = true, env = "TODO_DB")]
    pub db: Option<PathBuf>,

    /// Note to edit (default: config `default_note_id`, then "home")
    #[arg(long, global = true, env = "TODO_NOTE_ID")]
    pub note: Option<String>,

    /// Remote notes endpoint (e.g. http://localhost:3000/api/trpc) instead of the local database
    #[arg(long, global = true, env = "TODO_REMOTE")]
    pub remote: Option<String>,

    /// Author for notes created by `init`
    #[arg(long, global = true, env = "TODO_AUTHOR")]
    pub author: Option<String>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Output only the affected item position
    #[arg(long, global = true)]
    pub silent: bool,

    /// Apply the change in memory and print the result without saving
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Increase logging verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (no output except errors)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the database and the note to edit
    Init {
        /// Recreate an existing database (discards all notes)
        #[arg(long)]
        force: bool,
    },

    /// Print version information
    Version,

    /// Show the checklist
    Show {
        /// Only show items matching this fuzzy query
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Add an item at the top of the list
    Add {
        /// Item text (blank when omitted)
        name: Option<String>,
    },

    /// Check or uncheck an item
    Check {
        /// Item position (see `show`) or exact name
        item: String,
    },

    /// Rename an unchecked item
    Edit {
        /// Item position (see `show`) or exact name
        item: String,

        /// New text
        name: String,
    },

    /// Delete an item
    Delete {
        /// Item position (see `show`) or exact name
        item: String,
    },

    /// Move an item to another position within its section
    Move {
        /// Item position (see `show`) or exact name
        item: String,

        /// Target position (1-based)
        to: usize,
    },

    /// List names that appear more than once
    Dupes,

    /// Fuzzy-search item names
    Search {
        /// Query; empty shows the whole list
        #[arg(default_value = "")]
        query: String,
    },

    /// Rename the note
    Title {
        /// New title
        title: String,
    },

    /// Show the save history of the note (local database only)
    History {
        /// Maximum events to show
        #[arg(short, long, default_value = "10")]
        limit: u32,
    },

    /// Interactive editing session
    Shell {
        /// Save automatically after a quiet period instead of on `save`
        #[arg(long)]
        auto_save: bool,

        /// Auto-save quiet period in milliseconds (default: 500)
        #[arg(long)]
        debounce_ms: Option<u64>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(clap::ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

/// Flags shared by every command that touches a note.
#[derive(Debug, Clone, Default)]
pub struct NoteArgs {
    pub db: Option<PathBuf>,
    pub note: Option<String>,
    pub remote: Option<String>,
    pub author: Option<String>,
}

impl From<&Cli> for NoteArgs {
    fn from(cli: &Cli) -> Self {
        Self {
            db: cli.db.clone(),
            note: cli.note.clone(),
            remote: cli.remote.clone(),
            author: cli.author.clone(),
        }
    }
}
