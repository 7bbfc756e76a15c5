//! In-memory one-shot callback registry
//!
//! Stands in for the host's single-event scheduler. The registry only
//! promises the single-pending-callback invariant and best-effort firing;
//! the manager re-validates everything at fire time, so a lost or late
//! callback is tolerated (the backstop sweep catches it).

use ephemera_domain::traits::CleanupScheduler;
use ephemera_domain::ResourceId;
use std::collections::HashMap;

/// Pending one-shot deletion callbacks, keyed by resource.
#[derive(Debug, Clone, Default)]
pub struct InMemoryScheduler {
    pending: HashMap<ResourceId, u64>,
}

impl InMemoryScheduler {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of pending callbacks
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Whether no callbacks are pending
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Remove and return every callback due at `now`, ordered by resource
    /// id for deterministic firing.
    pub fn due(&mut self, now: u64) -> Vec<ResourceId> {
        let mut due: Vec<ResourceId> = self
            .pending
            .iter()
            .filter(|(_, run_at)| **run_at <= now)
            .map(|(id, _)| *id)
            .collect();
        due.sort_unstable();
        for id in &due {
            self.pending.remove(id);
        }
        due
    }
}

impl CleanupScheduler for InMemoryScheduler {
    fn schedule_once(&mut self, id: ResourceId, run_at: u64) -> bool {
        if self.pending.contains_key(&id) {
            return false;
        }
        self.pending.insert(id, run_at);
        true
    }

    fn next_scheduled(&self, id: ResourceId) -> Option<u64> {
        self.pending.get(&id).copied()
    }

    fn unschedule(&mut self, id: ResourceId) -> bool {
        self.pending.remove(&id).is_some()
    }
}
