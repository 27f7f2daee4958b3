//! todo - a checklist editor over a single note
//!
//! A note's body holds one item per line as `name<TAB>x` (checked) or
//! `name<TAB>o` (unchecked). This crate loads such a note, edits the list
//! in memory, and saves it back to a local `SQLite` database or a remote
//! notes service.
//!
//! # Architecture
//!
//! - [`checklist`] - Body codec, list controller, duplicates, fuzzy search
//! - [`editor`] - Editing session tying the list to a synced note
//! - [`sync`] - Query cache, optimistic saves, debounced auto-save
//! - [`storage`] - `SQLite` and HTTP note stores
//! - [`model`] - Items and notes
//! - [`cli`] - Command-line interface using clap
//! - [`config`] - Configuration management
//! - [`error`] - Error types and handling

#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod checklist;
pub mod cli;
pub mod config;
pub mod editor;
pub mod error;
pub mod model;
pub mod storage;
pub mod sync;
pub mod validate;

pub use error::{Error, Result};

/// Global silent mode flag for `--silent` output.
///
/// When set, mutating commands print only the affected item position.
pub static SILENT: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(false);

/// Global dry-run flag for `--dry-run`.
///
/// When set, mutating commands print the resulting list without saving.
pub static DRY_RUN: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(false);

/// Check if silent mode is active.
#[inline]
pub fn is_silent() -> bool {
    SILENT.load(std::sync::atomic::Ordering::Relaxed)
}

/// Check if dry-run mode is active.
#[inline]
pub fn is_dry_run() -> bool {
    DRY_RUN.load(std::sync::atomic::Ordering::Relaxed)
}
