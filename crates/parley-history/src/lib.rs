//! History ledger: an ordered, mutable record of question/answer exchanges.
//!
//! Entries are addressed by position only. Removing an entry shifts every
//! later entry down by one, so indices are always dense (`0..len`).

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

/// One recorded exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// The submitted question.
    pub input: String,
    /// The model's complete answer.
    pub response: String,
}

impl HistoryEntry {
    pub fn new(input: impl Into<String>, response: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            response: response.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HistoryError {
    #[error("index {index} out of range for history of length {len}")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Thread-safe history ledger.
///
/// Mutations take the write lock; `list` takes the read lock and clones,
/// so readers never observe a half-applied mutation.
#[derive(Clone, Default)]
pub struct HistoryLedger {
    entries: Arc<RwLock<Vec<HistoryEntry>>>,
}

impl HistoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry at the end. Returns its index.
    pub async fn append(&self, entry: HistoryEntry) -> usize {
        let mut entries = self.entries.write().await;
        entries.push(entry);
        let index = entries.len() - 1;
        tracing::debug!(index, "History entry appended");
        index
    }

    /// Snapshot of every entry in insertion order.
    pub async fn list(&self) -> Vec<HistoryEntry> {
        self.entries.read().await.clone()
    }

    /// Remove the entry at `index`, shifting later entries down by one.
    pub async fn delete_at(&self, index: usize) -> Result<HistoryEntry, HistoryError> {
        let mut entries = self.entries.write().await;
        let len = entries.len();
        if index >= len {
            return Err(HistoryError::IndexOutOfRange { index, len });
        }
        let removed = entries.remove(index);
        tracing::debug!(index, remaining = len - 1, "History entry deleted");
        Ok(removed)
    }

    /// Number of recorded entries.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}
