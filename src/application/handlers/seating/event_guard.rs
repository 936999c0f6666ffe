//! Per-event serialisation of seating runs.
//!
//! Two runs for the same event must not interleave their read-compute-write
//! cycle; runs for different events proceed in parallel.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::domain::foundation::EventId;

/// Hands out one async lock per event id.
#[derive(Debug, Clone, Default)]
pub struct EventGuard {
    locks: Arc<Mutex<HashMap<EventId, Arc<Mutex<()>>>>>,
}

impl EventGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits until no other run holds `event_id`, then holds it until the
    /// returned guard is dropped.
    pub async fn acquire(&self, event_id: &EventId) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().await;
            // Forget locks nobody holds or waits on.
            locks.retain(|id, lock| id == event_id || Arc::strong_count(lock) > 1);
            locks
                .entry(event_id.clone())
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };
        lock.lock_owned().await
    }

    /// Number of events currently tracked.
    pub async fn tracked(&self) -> usize {
        self.locks.lock().await.len()
    }
}
