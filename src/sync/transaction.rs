//! Optimistic write against the query cache.

use super::cache::QueryCache;
use crate::model::Note;

/// How an [`OptimisticTransaction`] settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settlement {
    Committed,
    RolledBack,
}

/// One optimistic overwrite of the cached note.
///
/// `begin` cancels in-flight fetches, snapshots the cached value and writes
/// the optimistic one. The snapshot lives until the transaction is settled:
/// `commit` drops it, `rollback` puts it back exactly as it was.
#[derive(Debug)]
#[must_use = "an optimistic transaction must be committed or rolled back"]
pub struct OptimisticTransaction {
    previous: Option<Note>,
}

impl OptimisticTransaction {
    pub fn begin(cache: &mut QueryCache, optimistic: Note) -> Self {
        cache.cancel();
        let previous = cache.get_data().cloned();
        cache.set_data(Some(optimistic));
        Self { previous }
    }

    pub fn commit(self) -> Settlement {
        Settlement::Committed
    }

    pub fn rollback(self, cache: &mut QueryCache) -> Settlement {
        cache.set_data(self.previous);
        Settlement::RolledBack
    }
}
