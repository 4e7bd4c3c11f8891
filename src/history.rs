//! Session history of generated loops.
//!
//! Append-only and unbounded: the display shows the most recent few, the store
//! keeps everything until the process exits. Generation tasks complete in any
//! order, so all writes go through one async mutex and the insertion index
//! (which picks the palette color) is read in the same critical section as the
//! push.

use crate::models::Loop;
use tokio::sync::Mutex;
use uuid::Uuid;

#[derive(Default)]
pub struct HistoryStore {
    loops: Mutex<Vec<Loop>>,
}

impl HistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn append(&self, record: Loop) {
        self.loops.lock().await.push(record);
    }

    /// Build a loop from its future insertion index and append it atomically.
    /// Returns a copy of the stored record.
    pub async fn append_with<F>(&self, build: F) -> Loop
    where
        F: FnOnce(usize) -> Loop,
    {
        let mut loops = self.loops.lock().await;
        let index = loops.len();
        let record = build(index);
        loops.push(record.clone());

        tracing::debug!(
            index = index,
            id = %record.id,
            color = %record.color,
            "Appended loop #{} to history",
            index + 1
        );

        record
    }

    /// The last `n` loops in insertion order
    pub async fn recent(&self, n: usize) -> Vec<Loop> {
        let loops = self.loops.lock().await;
        let start = loops.len().saturating_sub(n);
        loops[start..].to_vec()
    }

    pub async fn get(&self, id: Uuid) -> Option<Loop> {
        self.loops
            .lock()
            .await
            .iter()
            .find(|record| record.id == id)
            .cloned()
    }

    pub async fn len(&self) -> usize {
        self.loops.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.loops.lock().await.is_empty()
    }
}
