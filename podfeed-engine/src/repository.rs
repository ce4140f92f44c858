//! External persistence collaborator interface
//!
//! The engine performs no I/O of its own; pods, votes and comments live
//! behind this trait. Implementations are expected to enforce the
//! at-most-one-vote-per-(pod, viewer) constraint; the engine guards
//! client-side as well and deduplicates defensively on read.

use async_trait::async_trait;
use podfeed_common::{Audience, PodRow, Result, Vote, VoteChoice, VoteMetadata};
use uuid::Uuid;

/// Persistence operations the engine consumes
#[async_trait]
pub trait PodRepository: Send + Sync {
    /// Raw pod rows for one audience tab, unvalidated.
    async fn fetch_pods(&self, audience: Audience, viewer_id: Uuid) -> Result<Vec<PodRow>>;

    /// Whether the viewer has a persisted vote on this pod.
    async fn has_user_voted(&self, pod_id: Uuid, viewer_id: Uuid) -> Result<bool>;

    /// Whether the viewer has a persisted comment on this pod.
    async fn has_user_commented_on_pod(&self, pod_id: Uuid, viewer_id: Uuid) -> Result<bool>;

    /// All vote records for one pod.
    async fn get_votes_for_pod(&self, pod_id: Uuid) -> Result<Vec<Vote>>;

    /// Persist a vote. A uniqueness conflict is a failure like any other
    /// and is swallowed by the caller.
    async fn submit_vote(
        &self,
        pod_id: Uuid,
        choice: VoteChoice,
        viewer_id: Uuid,
        metadata: Option<VoteMetadata>,
    ) -> Result<()>;

    /// Persist a comment; returns whether the store accepted it.
    async fn submit_comment(&self, pod_id: Uuid, viewer_id: Uuid, text: &str) -> Result<bool>;
}
