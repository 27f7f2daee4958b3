//! Checklist editing core.
//!
//! - [`codec`] - note body ⇄ item list
//! - [`duplicates`] - repeated names
//! - [`search`] - fuzzy search with full-list fallback
//! - [`controller`] - the mutable list and its sort invariant

pub mod codec;
pub mod controller;
pub mod duplicates;
pub mod search;

pub use codec::{parse_body, serialize_items};
pub use controller::Checklist;
pub use duplicates::{duplicates, is_duplicate};
pub use search::{FuzzyMatcher, Matcher, SearchIndex, SearchKey, SearchOptions, visible_items};
