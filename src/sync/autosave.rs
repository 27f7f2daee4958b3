//! Debounced auto-save.
//!
//! Edits are sent to a background task. Each edit restarts the quiet
//! window; once no edit has arrived for the whole window, the latest one is
//! saved. A burst of edits therefore costs one save.

use super::client::{SaveOutcome, SyncClient};
use crate::model::SaveNote;
use crate::storage::NoteStore;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Quiet window used when none is configured.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

/// Handle to a running auto-save task.
pub struct AutoSaver {
    edits: mpsc::UnboundedSender<SaveNote>,
    outcomes: mpsc::UnboundedReceiver<SaveOutcome>,
    task: JoinHandle<()>,
}

impl AutoSaver {
    /// Spawn the task on the current tokio runtime.
    pub fn spawn<S>(client: SyncClient<S>, quiet: Duration) -> Self
    where
        S: NoteStore + 'static,
    {
        let (edits, edit_rx) = mpsc::unbounded_channel();
        let (outcome_tx, outcomes) = mpsc::unbounded_channel();
        let task = tokio::spawn(run(client, edit_rx, outcome_tx, quiet));
        Self {
            edits,
            outcomes,
            task,
        }
    }

    /// Queue the latest state for saving and restart the quiet window.
    ///
    /// Returns `false` if the task has stopped.
    pub fn schedule(&self, input: SaveNote) -> bool {
        self.edits.send(input).is_ok()
    }

    /// Outcomes of saves finished since the last call.
    pub fn drain_outcomes(&mut self) -> Vec<SaveOutcome> {
        let mut settled = Vec::new();
        while let Ok(outcome) = self.outcomes.try_recv() {
            settled.push(outcome);
        }
        settled
    }

    /// Stop accepting edits, save whatever is pending, and wait for the task.
    ///
    /// Returns the outcomes not yet drained.
    pub async fn shutdown(mut self) -> Vec<SaveOutcome> {
        drop(self.edits);
        if let Err(e) = self.task.await {
            warn!(error = %e, "Auto-save task ended abnormally");
        }
        let mut settled = Vec::new();
        while let Some(outcome) = self.outcomes.recv().await {
            settled.push(outcome);
        }
        settled
    }
}

async fn run<S: NoteStore>(
    client: SyncClient<S>,
    mut edits: mpsc::UnboundedReceiver<SaveNote>,
    outcomes: mpsc::UnboundedSender<SaveOutcome>,
    quiet: Duration,
) {
    while let Some(mut pending) = edits.recv().await {
        loop {
            match tokio::time::timeout(quiet, edits.recv()).await {
                Ok(Some(next)) => pending = next,
                // Closed: flush what we have
                Ok(None) => break,
                Err(_) => {
                    debug!(quiet_ms = quiet.as_millis(), "Quiet window elapsed");
                    break;
                }
            }
        }

        let outcome = client.save(pending).await;
        if outcomes.send(outcome).is_err() {
            debug!("Auto-save outcome dropped; receiver gone");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SaveNote;
    use crate::sync::testing::{MemoryStore, note};

    fn edit(body: &str) -> SaveNote {
        SaveNote::from_note(&note(""), body)
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_coalesces_into_one_save() {
        let client = SyncClient::new(MemoryStore::with_note(note("")), None);
        let mut saver = AutoSaver::spawn(client.clone(), DEFAULT_DEBOUNCE);

        for body in ["a\to", "ab\to", "abc\to"] {
            assert!(saver.schedule(edit(body)));
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        assert_eq!(client.store().saves(), 0);

        tokio::time::sleep(Duration::from_millis(600)).await;
        assert_eq!(client.store().saves(), 1);
        assert_eq!(client.store().saved_bodies(), vec!["abc\to".to_string()]);

        let outcomes = saver.drain_outcomes();
        assert!(matches!(outcomes.as_slice(), [SaveOutcome::Saved(n)] if n.body == "abc\to"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_separate_bursts_save_separately() {
        let client = SyncClient::new(MemoryStore::with_note(note("")), None);
        let saver = AutoSaver::spawn(client.clone(), Duration::from_millis(200));

        saver.schedule(edit("a\to"));
        tokio::time::sleep(Duration::from_millis(300)).await;
        saver.schedule(edit("b\to"));
        tokio::time::sleep(Duration::from_millis(300)).await;

        assert_eq!(
            client.store().saved_bodies(),
            vec!["a\to".to_string(), "b\to".to_string()]
        );
        assert_eq!(saver.shutdown().await.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_flushes_pending_edit() {
        let client = SyncClient::new(MemoryStore::with_note(note("")), None);
        let saver = AutoSaver::spawn(client.clone(), DEFAULT_DEBOUNCE);

        saver.schedule(edit("late\to"));
        let outcomes = saver.shutdown().await;

        assert_eq!(client.store().saved_bodies(), vec!["late\to".to_string()]);
        assert_eq!(outcomes.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_autosave_reports_rollback() {
        let client = SyncClient::new(MemoryStore::with_note(note("old\to")), None);
        client.fetch().await;
        client.store().fail_saves(true);
        let saver = AutoSaver::spawn(client.clone(), DEFAULT_DEBOUNCE);

        saver.schedule(edit("new\to"));
        let outcomes = saver.shutdown().await;

        assert_eq!(outcomes, vec![SaveOutcome::RolledBack]);
        assert_eq!(client.cached().map(|n| n.body), Some("old\to".to_string()));
    }
}
