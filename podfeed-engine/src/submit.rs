//! Optimistic vote and comment submission
//!
//! Per (pod, viewer) the submission machine runs NotVoted -> Submitting ->
//! Voted, terminal for that pair. The local state transition is synchronous
//! and happens before any network call; the persist call is dispatched as a
//! fire-and-forget task whose failure is logged, never reverted. Under poor
//! connectivity the viewer keeps the appearance of a successful interaction
//! rather than seeing flicker — a deliberate consistency trade-off.
//!
//! Rapid double-taps are defused by the per-pod in-flight guard, not by
//! holding a lock across the network call.

use crate::repository::PodRepository;
use crate::store::InteractionStore;
use podfeed_common::{FeedItem, VoteChoice, VoteMetadata};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use uuid::Uuid;

/// A vote gesture from the UI vocabulary.
///
/// One gesture vocabulary maps to two persisted semantics: sentiment
/// tokens (`fire` / `maybe` / `x`) on single-image pods, and a 1-based
/// image index on multi-image pods. The split is made explicit here and
/// translated exactly once into the persisted `(choice, metadata)` shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteToken {
    /// Enthusiastic yes on a single-image pod
    Fire,
    /// Undecided on a single-image pod
    Maybe,
    /// No on a single-image pod
    X,
    /// Selection of a 1-based image index on a multi-image pod
    Image(u32),
}

impl VoteToken {
    /// Parse a raw UI token (`"fire"`, `"maybe"`, `"x"`, or a 1-based
    /// index string like `"2"`). Unknown tokens are rejected.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "fire" => Some(VoteToken::Fire),
            "maybe" => Some(VoteToken::Maybe),
            "x" => Some(VoteToken::X),
            other => match other.parse::<u32>() {
                Ok(index) if index >= 1 => Some(VoteToken::Image(index)),
                _ => None,
            },
        }
    }

    /// Translate into the persisted vote shape. Image selections ride the
    /// yes channel and carry their index in the metadata.
    pub fn to_persisted(self) -> (VoteChoice, Option<VoteMetadata>) {
        match self {
            VoteToken::Fire => (VoteChoice::Yes, None),
            VoteToken::Maybe => (VoteChoice::Maybe, None),
            VoteToken::X => (VoteChoice::No, None),
            VoteToken::Image(index) => (
                VoteChoice::Yes,
                Some(VoteMetadata {
                    selected_option: Some(index - 1),
                    selected_index: Some(index),
                }),
            ),
        }
    }
}

/// Observable submission phase for one (pod, viewer) pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionPhase {
    NotVoted,
    /// Optimistically voted, persist call still in flight
    Submitting,
    /// Terminal
    Voted,
}

/// Idempotent, optimistic vote/comment submission pipeline
pub struct VoteSubmitter<R: PodRepository + 'static> {
    repo: Arc<R>,
    store: Arc<InteractionStore>,
    in_flight: Arc<Mutex<HashSet<Uuid>>>,
}

impl<R: PodRepository + 'static> VoteSubmitter<R> {
    pub fn new(repo: Arc<R>, store: Arc<InteractionStore>) -> Self {
        Self {
            repo,
            store,
            in_flight: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    /// Current phase of the submission machine for one pod.
    pub fn phase(&self, pod_id: Uuid) -> SubmissionPhase {
        if !self.store.has_voted(pod_id) {
            SubmissionPhase::NotVoted
        } else if self.lock_in_flight().contains(&pod_id) {
            SubmissionPhase::Submitting
        } else {
            SubmissionPhase::Voted
        }
    }

    /// Record a vote for the viewer on this feed item.
    ///
    /// Guards (all client-side, checked before any network call): the pod
    /// must be effectively live, the viewer must not have voted, and no
    /// submission may already be in flight for this pod. On guard pass the
    /// local store is marked voted synchronously — authoritative for the
    /// UI regardless of network outcome — and the persist call is
    /// dispatched asynchronously.
    ///
    /// Returns the dispatched task handle, or None when the call was a
    /// guarded no-op. Callers are free to drop the handle.
    pub fn record_vote(
        &self,
        item: &FeedItem,
        token: VoteToken,
        viewer_id: Uuid,
    ) -> Option<JoinHandle<()>> {
        let pod_id = item.pod_id;

        if !item.is_live {
            debug!(pod_id = %pod_id, "Vote ignored: pod is not live");
            return None;
        }
        if item.has_voted || self.store.has_voted(pod_id) {
            debug!(pod_id = %pod_id, "Vote ignored: already voted");
            return None;
        }
        {
            let mut in_flight = self.lock_in_flight();
            if !in_flight.insert(pod_id) {
                debug!(pod_id = %pod_id, "Vote ignored: submission already in flight");
                return None;
            }
        }

        let (choice, metadata) = token.to_persisted();

        // Optimistic transition, before the network call
        self.store.mark_voted(pod_id, choice);

        let repo = Arc::clone(&self.repo);
        let in_flight = Arc::clone(&self.in_flight);
        Some(tokio::spawn(async move {
            if let Err(e) = repo.submit_vote(pod_id, choice, viewer_id, metadata).await {
                // Never reverted: the viewer keeps the voted state
                warn!(pod_id = %pod_id, viewer_id = %viewer_id, "Vote submission failed: {}", e);
            }
            in_flight
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .remove(&pod_id);
        }))
    }

    /// Record a comment for the viewer on this feed item.
    ///
    /// Comments require a prior vote and at most one exists per viewer per
    /// pod; both are guarded client-side, along with liveness. Same
    /// optimistic-write, log-only-on-failure pattern as votes.
    pub fn record_comment(
        &self,
        item: &FeedItem,
        viewer_id: Uuid,
        text: String,
    ) -> Option<JoinHandle<()>> {
        let pod_id = item.pod_id;

        if !item.is_live {
            debug!(pod_id = %pod_id, "Comment ignored: pod is not live");
            return None;
        }
        if !(item.has_voted || self.store.has_voted(pod_id)) {
            debug!(pod_id = %pod_id, "Comment ignored: comments require a prior vote");
            return None;
        }
        if item.has_commented || self.store.has_commented(pod_id) {
            debug!(pod_id = %pod_id, "Comment ignored: already commented");
            return None;
        }

        // Optimistic transition, before the network call
        self.store.mark_commented(pod_id);

        let repo = Arc::clone(&self.repo);
        Some(tokio::spawn(async move {
            match repo.submit_comment(pod_id, viewer_id, &text).await {
                Ok(true) => {}
                Ok(false) => {
                    warn!(pod_id = %pod_id, viewer_id = %viewer_id, "Comment rejected by store");
                }
                Err(e) => {
                    warn!(pod_id = %pod_id, viewer_id = %viewer_id, "Comment submission failed: {}", e);
                }
            }
        }))
    }

    fn lock_in_flight(&self) -> std::sync::MutexGuard<'_, HashSet<Uuid>> {
        self.in_flight.lock().unwrap_or_else(|e| e.into_inner())
    }
}
