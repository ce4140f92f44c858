//! Per-viewer interaction state store
//!
//! Keyed by pod id and owned above any single feed item's display
//! lifecycle, so list virtualization unmounting and remounting an item
//! never loses the viewer's interaction state. Reads happen once per item
//! mount to seed local display state; writes happen synchronously at the
//! moment of vote/comment submission, before any network confirmation.
//!
//! The store is cleared only on explicit session teardown — never by feed
//! reload or virtualization churn.

use podfeed_common::{InteractionState, VoteChoice};
use std::collections::HashMap;
use std::sync::RwLock;
use uuid::Uuid;

/// Keyed, mutation-tolerant store of per-pod interaction state
#[derive(Debug, Default)]
pub struct InteractionStore {
    inner: RwLock<HashMap<Uuid, InteractionState>>,
}

impl InteractionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the state for one pod (item mount path).
    pub fn get(&self, pod_id: Uuid) -> Option<InteractionState> {
        self.read_inner().get(&pod_id).copied()
    }

    /// Whether the viewer has voted on this pod, per local state.
    pub fn has_voted(&self, pod_id: Uuid) -> bool {
        self.get(pod_id).map_or(false, |s| s.has_voted)
    }

    /// Whether the viewer has commented on this pod, per local state.
    pub fn has_commented(&self, pod_id: Uuid) -> bool {
        self.get(pod_id).map_or(false, |s| s.has_commented)
    }

    /// Record an optimistic vote. Idempotent: once voted, a second call
    /// neither changes the choice nor resets anything.
    pub fn mark_voted(&self, pod_id: Uuid, choice: VoteChoice) {
        let mut inner = self.write_inner();
        let state = inner.entry(pod_id).or_default();
        if !state.has_voted {
            state.has_voted = true;
            state.choice = Some(choice);
        }
    }

    /// Record an optimistic comment.
    pub fn mark_commented(&self, pod_id: Uuid) {
        let mut inner = self.write_inner();
        inner.entry(pod_id).or_default().has_commented = true;
    }

    /// Recover the specific vote choice from server state, for a pod the
    /// viewer is known to have voted on but whose choice is not locally
    /// known (e.g. after an app restart). Never overwrites a locally-known
    /// choice.
    pub fn recover_choice(&self, pod_id: Uuid, choice: VoteChoice) {
        let mut inner = self.write_inner();
        let state = inner.entry(pod_id).or_default();
        state.has_voted = true;
        if state.choice.is_none() {
            state.choice = Some(choice);
        }
    }

    /// Explicit session teardown. The only path that empties the store.
    pub fn clear(&self) {
        self.write_inner().clear();
    }

    /// Number of pods with recorded interaction state
    pub fn len(&self) -> usize {
        self.read_inner().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read_inner().is_empty()
    }

    fn read_inner(&self) -> std::sync::RwLockReadGuard<'_, HashMap<Uuid, InteractionState>> {
        // A poisoned lock still holds consistent interaction flags
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write_inner(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<Uuid, InteractionState>> {
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }
}
