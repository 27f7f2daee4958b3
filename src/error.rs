//! Error types for the todo CLI.
//!
//! Provides structured error handling with:
//! - Machine-readable error codes (`ErrorCode`)
//! - Category-based exit codes (2=db, 3=not_found, 4=validation, etc.)
//! - Context-aware recovery hints
//! - Structured JSON output for piped / non-TTY consumers

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for todo operations.
pub type Result<T> = std::result::Result<T, Error>;

// ── Error Code ────────────────────────────────────────────────

/// Machine-readable error codes grouped by category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Database (exit 2)
    NotInitialized,
    AlreadyInitialized,
    DatabaseError,

    // Not Found (exit 3)
    NoteNotFound,
    ItemNotFound,
    AmbiguousItem,

    // Validation (exit 4)
    InvalidArgument,

    // Sync (exit 6)
    SyncError,
    RemoteError,

    // Config (exit 7)
    ConfigError,

    // I/O (exit 8)
    IoError,
    JsonError,

    // Internal (exit 1)
    InternalError,
}

impl ErrorCode {
    /// Machine-readable SCREAMING_SNAKE code string.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        match self {
            Self::NotInitialized => "NOT_INITIALIZED",
            Self::AlreadyInitialized => "ALREADY_INITIALIZED",
            Self::DatabaseError => "DATABASE_ERROR",
            Self::NoteNotFound => "NOTE_NOT_FOUND",
            Self::ItemNotFound => "ITEM_NOT_FOUND",
            Self::AmbiguousItem => "AMBIGUOUS_ITEM",
            Self::InvalidArgument => "INVALID_ARGUMENT",
            Self::SyncError => "SYNC_ERROR",
            Self::RemoteError => "REMOTE_ERROR",
            Self::ConfigError => "CONFIG_ERROR",
            Self::IoError => "IO_ERROR",
            Self::JsonError => "JSON_ERROR",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }

    /// Category-based exit code.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::InternalError => 1,
            Self::NotInitialized | Self::AlreadyInitialized | Self::DatabaseError => 2,
            Self::NoteNotFound | Self::ItemNotFound | Self::AmbiguousItem => 3,
            Self::InvalidArgument => 4,
            Self::SyncError | Self::RemoteError => 6,
            Self::ConfigError => 7,
            Self::IoError | Self::JsonError => 8,
        }
    }

    /// Whether retrying with corrected input can succeed.
    ///
    /// Saves are never retried automatically; a failed save is retryable by
    /// running the same command again.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ItemNotFound
                | Self::AmbiguousItem
                | Self::InvalidArgument
                | Self::SyncError
                | Self::DatabaseError
        )
    }
}

// ── Error Enum ────────────────────────────────────────────────

/// Errors that can occur in todo operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Not initialized: run `todo init` first")]
    NotInitialized,

    #[error("Already initialized at {path}")]
    AlreadyInitialized { path: PathBuf },

    #[error("Note not found: {id}")]
    NoteNotFound { id: String },

    #[error("Item not found: {reference}")]
    ItemNotFound { reference: String, len: usize },

    #[error("Item not found: {reference} (did you mean: {}?)", similar.join(", "))]
    ItemNotFoundSimilar { reference: String, similar: Vec<String> },

    #[error("Ambiguous item: '{name}' appears {count} times")]
    AmbiguousItem { name: String, count: usize },

    #[error("Save failed for note {id}; local changes were kept")]
    SaveFailed { id: String },

    #[error("Remote store error ({status}): {message}")]
    Remote { status: u16, message: String },

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Map this error to its structured `ErrorCode`.
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::NotInitialized => ErrorCode::NotInitialized,
            Self::AlreadyInitialized { .. } => ErrorCode::AlreadyInitialized,
            Self::Database(_) => ErrorCode::DatabaseError,
            Self::NoteNotFound { .. } => ErrorCode::NoteNotFound,
            Self::ItemNotFound { .. } | Self::ItemNotFoundSimilar { .. } => {
                ErrorCode::ItemNotFound
            }
            Self::AmbiguousItem { .. } => ErrorCode::AmbiguousItem,
            Self::InvalidArgument(_) => ErrorCode::InvalidArgument,
            Self::SaveFailed { .. } => ErrorCode::SyncError,
            Self::Remote { .. } | Self::Http(_) => ErrorCode::RemoteError,
            Self::Config(_) => ErrorCode::ConfigError,
            Self::Io(_) => ErrorCode::IoError,
            Self::Json(_) => ErrorCode::JsonError,
            Self::Other(_) => ErrorCode::InternalError,
        }
    }

    /// Category-based exit code, delegating to the `ErrorCode`.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        self.error_code().exit_code()
    }

    /// Context-aware recovery hint.
    ///
    /// Returns `None` if no actionable suggestion exists.
    #[must_use]
    pub fn hint(&self) -> Option<String> {
        match self {
            Self::NotInitialized => {
                Some("Run `todo init` to create the database and the default note".to_string())
            }

            Self::AlreadyInitialized { path } => Some(format!(
                "Database already exists at {}. Use `--force` to reinitialize.",
                path.display()
            )),

            Self::NoteNotFound { id } => Some(format!(
                "No note with ID '{id}'. Run `todo init --note {id}` to create it, \
                 or pass `--note <id>` to edit another note."
            )),

            Self::ItemNotFound { len, .. } => Some(format!(
                "The list has {len} item(s). Use `todo show` to see positions."
            )),
            Self::ItemNotFoundSimilar { similar, .. } => {
                Some(format!("Did you mean: {}?", similar.join(", ")))
            }

            Self::AmbiguousItem { name, .. } => Some(format!(
                "'{name}' is a duplicate. Refer to it by position instead (see `todo show`)."
            )),

            Self::SaveFailed { .. } => Some(
                "Saves are not retried automatically. Run the command again to retry.".to_string(),
            ),

            Self::InvalidArgument(msg) => {
                if msg.contains("checked") {
                    Some("Uncheck the item with `todo check <item>` before editing it".to_string())
                } else if msg.contains("remote") {
                    Some("Drop `--remote` (or TODO_REMOTE) to use the local database".to_string())
                } else {
                    None
                }
            }

            Self::Remote { .. }
            | Self::Http(_)
            | Self::Database(_)
            | Self::Io(_)
            | Self::Json(_)
            | Self::Config(_)
            | Self::Other(_) => None,
        }
    }

    /// Structured JSON representation for machine consumption.
    #[must_use]
    pub fn to_structured_json(&self) -> serde_json::Value {
        let code = self.error_code();
        let mut obj = serde_json::json!({
            "error": {
                "code": code.as_str(),
                "message": self.to_string(),
                "retryable": code.is_retryable(),
                "exit_code": code.exit_code(),
            }
        });

        if let Some(hint) = self.hint() {
            obj["error"]["hint"] = serde_json::Value::String(hint);
        }

        obj
    }
}
