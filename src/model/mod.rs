//! Data models for todo.
//!
//! This module contains the domain models:
//! - Item (one checklist row, with its in-memory `ItemId`)
//! - Note (the stored record) and `SaveNote` (the upsert input)

pub mod item;
pub mod note;

pub use item::{IdAllocator, Item, ItemId};
pub use note::{Note, SaveNote};
