//! Transition-scoped handoff table.
//!
//! A payload is attached to exactly one navigation transition and taken at
//! most once by the view that transition lands on. Nothing here is durable;
//! a reload or a direct link simply finds no entry.

use std::collections::HashMap;

use forsee_core::TransitionId;

#[derive(Debug)]
pub struct HandoffTable<T> {
    entries: HashMap<TransitionId, T>,
}

impl<T> Default for HandoffTable<T> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<T> HandoffTable<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Park `payload` for the next transition and return its key.
    pub fn attach(&mut self, payload: T) -> TransitionId {
        let id = TransitionId::new();
        self.entries.insert(id, payload);
        tracing::debug!(transition = %id, "handoff attached");
        id
    }

    /// Remove and return the payload for `id`. A second take yields `None`.
    pub fn take(&mut self, id: TransitionId) -> Option<T> {
        let payload = self.entries.remove(&id);
        tracing::debug!(transition = %id, found = payload.is_some(), "handoff taken");
        payload
    }

    /// Drop every entry except the one belonging to `keep` (the transition
    /// currently being rendered, if any).
    pub fn retain_only(&mut self, keep: Option<TransitionId>) {
        let before = self.entries.len();
        self.entries.retain(|id, _| Some(*id) == keep);
        let dropped = before - self.entries.len();
        if dropped > 0 {
            tracing::debug!(dropped, "discarded stale handoffs");
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
