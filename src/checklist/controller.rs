//! In-memory checklist editing.
//!
//! Every mutation builds a full copy of the list and hands it to
//! `update_items`, which applies a stable sort placing unchecked items
//! before checked ones. Mutations target items by [`ItemId`]; an unknown id
//! leaves the list untouched and the call returns `false`.

use super::codec::{parse_body_with, serialize_items};
use super::duplicates::duplicates;
use crate::model::{IdAllocator, Item, ItemId};
use std::collections::HashMap;

/// The editable item list for one note.
#[derive(Debug, Clone)]
pub struct Checklist {
    items: Vec<Item>,
    ids: IdAllocator,
}

impl Checklist {
    /// Build a list from a note body, in stored order.
    #[must_use]
    pub fn from_body(body: &str) -> Self {
        let mut ids = IdAllocator::new();
        let items = parse_body_with(body, &mut ids);
        Self { items, ids }
    }

    /// Replace the list with a freshly parsed body.
    ///
    /// Ids keep counting from the same allocator, so ids handed out before
    /// the reset never refer to the new items.
    pub fn reset(&mut self, body: &str) {
        self.items = parse_body_with(body, &mut self.ids);
    }

    #[must_use]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: ItemId) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Current zero-based index of `id`.
    #[must_use]
    pub fn position(&self, id: ItemId) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }

    #[must_use]
    pub fn id_at(&self, index: usize) -> Option<ItemId> {
        self.items.get(index).map(|item| item.id)
    }

    #[must_use]
    pub fn to_body(&self) -> String {
        serialize_items(&self.items)
    }

    /// Whether the list differs from the stored body.
    #[must_use]
    pub fn unsaved_changes(&self, remote_body: &str) -> bool {
        self.to_body() != remote_body
    }

    #[must_use]
    pub fn duplicates(&self) -> Vec<String> {
        duplicates(&self.items)
    }

    fn update_items(&mut self, mut next: Vec<Item>) {
        next.sort_by_key(|item| item.checked);
        self.items = next;
    }

    /// Prepend a blank unchecked item.
    pub fn add_item(&mut self) -> ItemId {
        let id = self.ids.next_id();
        let mut next = Vec::with_capacity(self.items.len() + 1);
        next.push(Item::new(id, "", false));
        next.extend(self.items.iter().cloned());
        self.update_items(next);
        id
    }

    /// Prepend an item and give it `name`.
    pub fn add_named(&mut self, name: &str) -> ItemId {
        let id = self.add_item();
        self.edit_item(id, name);
        id
    }

    pub fn toggle_check(&mut self, id: ItemId) -> bool {
        let mut next = self.items.clone();
        let Some(item) = next.iter_mut().find(|item| item.id == id) else {
            return false;
        };
        item.checked = !item.checked;
        self.update_items(next);
        true
    }

    /// Rename an item. Checked items cannot be edited until unchecked.
    pub fn edit_item(&mut self, id: ItemId, name: &str) -> bool {
        let mut next = self.items.clone();
        let Some(item) = next.iter_mut().find(|item| item.id == id) else {
            return false;
        };
        if item.checked {
            return false;
        }
        name.clone_into(&mut item.name);
        self.update_items(next);
        true
    }

    pub fn delete_item(&mut self, id: ItemId) -> bool {
        let next: Vec<Item> = self.items.iter().filter(|item| item.id != id).cloned().collect();
        if next.len() == self.items.len() {
            return false;
        }
        self.update_items(next);
        true
    }

    /// Move an item to `to` (clamped to the list end).
    ///
    /// The re-sort still applies, so an item cannot leave its partition.
    pub fn move_item(&mut self, id: ItemId, to: usize) -> bool {
        let Some(from) = self.position(id) else {
            return false;
        };
        let mut next = self.items.clone();
        let item = next.remove(from);
        let to = to.min(next.len());
        next.insert(to, item);
        self.update_items(next);
        true
    }

    /// Apply a full ordering. `order` must name every current item once.
    pub fn reorder(&mut self, order: &[ItemId]) -> bool {
        if order.len() != self.items.len() {
            return false;
        }
        let mut by_id: HashMap<ItemId, &Item> =
            self.items.iter().map(|item| (item.id, item)).collect();
        let mut next = Vec::with_capacity(order.len());
        for id in order {
            let Some(item) = by_id.remove(id) else {
                return false;
            };
            next.push(item.clone());
        }
        self.update_items(next);
        true
    }
}
