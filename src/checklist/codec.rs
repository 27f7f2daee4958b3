//! Text ⇄ item list codec for note bodies.
//!
//! A body is newline-separated records, each `name` TAB state, where the
//! state is `x` (checked) or `o` (unchecked). Names are not escaped, so a
//! name containing a TAB or newline does not survive a round trip.

use crate::model::{IdAllocator, Item};

const CHECKED: &str = "x";
const UNCHECKED: &str = "o";

/// Parse a body with a fresh id counter.
///
/// Never fails: a line without a TAB is an unchecked item, and any state
/// other than `x` reads as unchecked. `""` yields one empty item.
#[must_use]
pub fn parse_body(body: &str) -> Vec<Item> {
    parse_body_with(body, &mut IdAllocator::new())
}

/// Parse a body, drawing ids from `ids`.
pub fn parse_body_with(body: &str, ids: &mut IdAllocator) -> Vec<Item> {
    body.split('\n')
        .map(|line| {
            let mut fields = line.split('\t');
            let name = fields.next().unwrap_or_default();
            let checked = fields.next() == Some(CHECKED);
            Item::new(ids.next_id(), name, checked)
        })
        .collect()
}

/// Serialize items back into body text.
#[must_use]
pub fn serialize_items(items: &[Item]) -> String {
    items
        .iter()
        .map(|item| {
            let state = if item.checked { CHECKED } else { UNCHECKED };
            format!("{}\t{}", item.name, state)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
