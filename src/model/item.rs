//! Checklist item model.
//!
//! Items only exist in memory. Their `ItemId` is assigned from a per-list
//! counter when the body is parsed or an item is added, and is never
//! written to the note body.

use serde::Serialize;
use std::fmt;

/// Opaque identifier of an item within one list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ItemId(u64);

impl ItemId {
    /// Raw counter value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Hands out increasing `ItemId`s for one list.
#[derive(Debug, Clone, Default)]
pub struct IdAllocator {
    next: u64,
}

impl IdAllocator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&mut self) -> ItemId {
        let id = ItemId(self.next);
        self.next += 1;
        id
    }
}

/// A single checklist row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Item {
    /// In-memory identity, stable across sorts and edits
    pub id: ItemId,

    /// Display text; may be empty for a freshly added row
    pub name: String,

    /// Whether the row is checked off
    pub checked: bool,
}

impl Item {
    pub fn new(id: ItemId, name: impl Into<String>, checked: bool) -> Self {
        Self {
            id,
            name: name.into(),
            checked,
        }
    }

    /// `(name, checked)` without the id, for content comparisons.
    #[must_use]
    pub fn content(&self) -> (&str, bool) {
        (&self.name, self.checked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocator_is_monotonic() {
        let mut ids = IdAllocator::new();
        let a = ids.next_id();
        let b = ids.next_id();
        assert!(a < b);
        assert_eq!(a.get() + 1, b.get());
        assert_eq!(b.to_string(), "#1");
    }

    #[test]
    fn test_content_ignores_id() {
        let mut ids = IdAllocator::new();
        let a = Item::new(ids.next_id(), "milk", false);
        let b = Item::new(ids.next_id(), "milk", false);
        assert_ne!(a, b);
        assert_eq!(a.content(), b.content());
    }
}
