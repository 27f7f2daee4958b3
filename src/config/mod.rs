//! Configuration management.
//!
//! Resolves where the database lives, which note is edited, and whether a
//! remote store is used. File settings live in `~/.todo/config.json`; flags
//! and their environment variables (handled by clap) take precedence.
//!
//! # Layout
//!
//! - **Database**: `~/.todo/data/todo.db`
//! - **Test database**: `~/.todo/test/todo.db` when `TODO_TEST_DB` is set
//! - **Config**: `~/.todo/config.json`

use crate::error::{Error, Result};
use crate::sync::DEFAULT_DEBOUNCE;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Note edited when neither a flag nor the config file names one.
pub const DEFAULT_NOTE_ID: &str = "home";

/// Settings read from `config.json`. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TodoConfig {
    /// Note to edit when `--note` is not given
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_note_id: Option<String>,

    /// Remote `notes` router to use instead of the local database
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_url: Option<String>,

    /// Auto-save quiet window for `todo shell --auto-save`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debounce_ms: Option<u64>,

    /// Author recorded on notes created by `todo init`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
}

/// Get the global todo directory (`~/.todo`).
#[must_use]
pub fn global_todo_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".todo"))
}

/// Check if test mode is enabled.
///
/// Test mode is enabled by setting `TODO_TEST_DB=1` (or any non-empty value).
/// This redirects all database operations to an isolated test database.
#[must_use]
pub fn is_test_mode() -> bool {
    std::env::var("TODO_TEST_DB")
        .map(|v| !v.is_empty() && v != "0" && v.to_lowercase() != "false")
        .unwrap_or(false)
}

/// Get the test database path (`~/.todo/test/todo.db`).
#[must_use]
pub fn test_db_path() -> Option<PathBuf> {
    global_todo_dir().map(|dir| dir.join("test").join("todo.db"))
}

/// Resolve the database path.
///
/// Priority:
/// 1. `explicit_path` (the `--db` flag or `TODO_DB`)
/// 2. `TODO_TEST_DB` → test database
/// 3. `~/.todo/data/todo.db`
#[must_use]
pub fn resolve_db_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return Some(path.to_path_buf());
    }

    if is_test_mode() {
        return test_db_path();
    }

    global_todo_dir().map(|dir| dir.join("data").join("todo.db"))
}

/// Resolve the note to edit: flag, then config file.
///
/// `None` leaves the choice to the store's own default.
#[must_use]
pub fn resolve_note_id(explicit: Option<&str>, config: &TodoConfig) -> Option<String> {
    explicit
        .filter(|id| !id.trim().is_empty())
        .map(str::to_string)
        .or_else(|| config.default_note_id.clone())
}

/// Resolve the remote endpoint: flag, then config file.
#[must_use]
pub fn resolve_remote_url(explicit: Option<&str>, config: &TodoConfig) -> Option<String> {
    explicit
        .filter(|url| !url.trim().is_empty())
        .map(str::to_string)
        .or_else(|| config.remote_url.clone())
}

/// Auto-save quiet window: flag, then config file, then 500 ms.
#[must_use]
pub fn resolve_debounce(explicit_ms: Option<u64>, config: &TodoConfig) -> Duration {
    explicit_ms
        .or(config.debounce_ms)
        .map_or(DEFAULT_DEBOUNCE, Duration::from_millis)
}

/// Get the config file path.
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined.
pub fn config_path() -> Result<PathBuf> {
    global_todo_dir()
        .map(|dir| dir.join("config.json"))
        .ok_or(Error::Config("Could not determine home directory".into()))
}

/// Load `~/.todo/config.json`, or defaults when it does not exist.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_config() -> Result<TodoConfig> {
    load_config_from(&config_path()?)
}

/// Load a config file, or defaults when it does not exist.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_config_from(path: &Path) -> Result<TodoConfig> {
    if !path.exists() {
        return Ok(TodoConfig::default());
    }

    let content = fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Failed to read config file: {e}")))?;

    serde_json::from_str(&content)
        .map_err(|e| Error::Config(format!("Failed to parse config file: {e}")))
}

/// Save a config file, creating its directory.
///
/// # Errors
///
/// Returns an error if the directory or file cannot be written.
pub fn save_config_to(path: &Path, config: &TodoConfig) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| Error::Config(format!("Failed to create config directory: {e}")))?;
    }

    let content = serde_json::to_string_pretty(config)
        .map_err(|e| Error::Config(format!("Failed to serialize config: {e}")))?;

    fs::write(path, content)
        .map_err(|e| Error::Config(format!("Failed to write config file: {e}")))?;

    Ok(())
}

/// Get the default author for new notes.
///
/// Priority: config file `author` → git user.name → `$USER` → `"unknown"`.
/// The `TODO_AUTHOR` variable is handled by the `--author` flag.
#[must_use]
pub fn default_author(config: &TodoConfig) -> String {
    if let Some(author) = config.author.as_ref().filter(|a| !a.is_empty()) {
        return author.clone();
    }

    // Try git user name
    if let Ok(output) = std::process::Command::new("git")
        .args(["config", "user.name"])
        .output()
    {
        if output.status.success() {
            let name = String::from_utf8_lossy(&output.stdout).trim().to_string();
            if !name.is_empty() {
                return name;
            }
        }
    }

    // Try system username
    if let Ok(user) = std::env::var("USER") {
        return user;
    }

    "unknown".to_string()
}
