//! Client-side cache of the note record.

use crate::model::Note;

/// Proof that a fetch was started under a given generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket(u64);

/// Cached copy of the configured note plus fetch bookkeeping.
///
/// `cancel` bumps the generation, so a fetch that started earlier can no
/// longer write its result.
#[derive(Debug, Default)]
pub struct QueryCache {
    data: Option<Note>,
    generation: u64,
}

impl QueryCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get_data(&self) -> Option<&Note> {
        self.data.as_ref()
    }

    pub fn set_data(&mut self, data: Option<Note>) {
        self.data = data;
    }

    pub fn begin_fetch(&self) -> FetchTicket {
        FetchTicket(self.generation)
    }

    /// Write a fetch result unless the fetch was cancelled. Returns whether it was applied.
    pub fn complete_fetch(&mut self, ticket: FetchTicket, data: Option<Note>) -> bool {
        if ticket.0 != self.generation {
            return false;
        }
        self.data = data;
        true
    }

    /// Discard every fetch currently in flight.
    pub fn cancel(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::testing::note;

    #[test]
    fn test_cancelled_fetch_is_discarded() {
        let mut cache = QueryCache::new();
        let ticket = cache.begin_fetch();
        cache.cancel();
        assert!(!cache.complete_fetch(ticket, Some(note("milk\to"))));
        assert!(cache.get_data().is_none());

        let ticket = cache.begin_fetch();
        assert!(cache.complete_fetch(ticket, Some(note("milk\to"))));
        assert_eq!(cache.get_data().map(|n| n.body.as_str()), Some("milk\to"));
    }
}
