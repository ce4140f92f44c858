//! Feed engine facade
//!
//! Ties the pieces together for the presentation layer: load an ordered
//! feed for one audience tab, compute verdicts for ended/voted pods,
//! record votes and comments, and lazily recover a known-voted viewer's
//! specific choice after an app restart.
//!
//! The feed order is recomputed only here, at explicit load boundaries
//! (initial mount, tab switch, pull-to-refresh). A vote or comment never
//! triggers an in-place re-sort.

use crate::aggregate::{aggregate_votes, Verdict};
use crate::assemble::{assemble_feed, InteractionFlags};
use crate::repository::PodRepository;
use crate::sort::sort_feed;
use crate::store::InteractionStore;
use crate::submit::{VoteSubmitter, VoteToken};
use chrono::{DateTime, Duration, Utc};
use podfeed_common::config::EngineConfig;
use podfeed_common::{Audience, FeedItem, Result, VoteChoice};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::warn;
use uuid::Uuid;

/// The Pod Feed Ranking & Voting Engine
pub struct FeedEngine<R: PodRepository + 'static> {
    repo: Arc<R>,
    store: Arc<InteractionStore>,
    submitter: VoteSubmitter<R>,
    staleness_cutoff: Duration,
}

impl<R: PodRepository + 'static> FeedEngine<R> {
    pub fn new(repo: Arc<R>, config: &EngineConfig) -> Self {
        Self::with_store(repo, Arc::new(InteractionStore::new()), config)
    }

    /// Build an engine around an existing interaction store (the store
    /// outlives feed loads and may outlive the engine itself).
    pub fn with_store(repo: Arc<R>, store: Arc<InteractionStore>, config: &EngineConfig) -> Self {
        Self {
            submitter: VoteSubmitter::new(Arc::clone(&repo), Arc::clone(&store)),
            repo,
            store,
            staleness_cutoff: config.staleness_cutoff(),
        }
    }

    /// The shared interaction store (read-on-mount path for item views).
    pub fn store(&self) -> &Arc<InteractionStore> {
        &self.store
    }

    /// Load the ordered feed for one audience tab.
    ///
    /// Any repository failure during the load yields an empty feed — no
    /// partial or stale feed is ever shown — with the error logged, not
    /// surfaced. Interaction flags are fetched per pod from the repository
    /// and OR-merged with the local optimistic store, so a vote whose
    /// server write has not landed still tiers the pod as interacted.
    pub async fn load_feed(
        &self,
        audience: Audience,
        viewer_id: Uuid,
        now: DateTime<Utc>,
    ) -> Vec<FeedItem> {
        let rows = match self.repo.fetch_pods(audience, viewer_id).await {
            Ok(rows) => rows,
            Err(e) => {
                warn!(?audience, "Feed load failed: {}", e);
                return Vec::new();
            }
        };

        let mut flags: HashMap<Uuid, InteractionFlags> = HashMap::new();
        for row in &rows {
            let Some(Ok(pod_id)) = row.id.as_deref().map(Uuid::parse_str) else {
                // Malformed rows fall out during assembly
                continue;
            };

            let fetched = async {
                Ok::<InteractionFlags, podfeed_common::Error>(InteractionFlags {
                    has_voted: self.repo.has_user_voted(pod_id, viewer_id).await?,
                    has_commented: self
                        .repo
                        .has_user_commented_on_pod(pod_id, viewer_id)
                        .await?,
                })
            }
            .await;

            let fetched = match fetched {
                Ok(f) => f,
                Err(e) => {
                    warn!(pod_id = %pod_id, "Interaction flag fetch failed: {}", e);
                    return Vec::new();
                }
            };

            let local = self.store.get(pod_id).unwrap_or_default();
            flags.insert(
                pod_id,
                InteractionFlags {
                    has_voted: fetched.has_voted || local.has_voted,
                    has_commented: fetched.has_commented || local.has_commented,
                },
            );
        }

        let mut feed = assemble_feed(&rows, &flags, viewer_id, now, self.staleness_cutoff);
        sort_feed(&mut feed);
        feed
    }

    /// Aggregate a pod's votes into a verdict (rendered for ended or
    /// already-voted pods only; counts are never cached while live).
    pub async fn pod_verdict(&self, pod_id: Uuid, image_count: usize) -> Result<Verdict> {
        let votes = self.repo.get_votes_for_pod(pod_id).await?;
        Ok(aggregate_votes(&votes, image_count))
    }

    /// Recover the viewer's specific vote choice when it is not locally
    /// known (e.g. after an app restart). Short-circuits on a locally-known
    /// choice, so the server fetch happens at most once per pod.
    pub async fn recover_vote_choice(&self, pod_id: Uuid, viewer_id: Uuid) -> Option<VoteChoice> {
        if let Some(state) = self.store.get(pod_id) {
            if let Some(choice) = state.choice {
                return Some(choice);
            }
        }

        let votes = match self.repo.get_votes_for_pod(pod_id).await {
            Ok(votes) => votes,
            Err(e) => {
                warn!(pod_id = %pod_id, "Vote choice recovery failed: {}", e);
                return None;
            }
        };

        let choice = votes
            .iter()
            .find(|v| v.voter_id == viewer_id)
            .map(|v| v.choice)?;
        self.store.recover_choice(pod_id, choice);
        Some(choice)
    }

    /// Record a vote (optimistic, idempotent). See [`VoteSubmitter`].
    pub fn record_vote(
        &self,
        item: &FeedItem,
        token: VoteToken,
        viewer_id: Uuid,
    ) -> Option<JoinHandle<()>> {
        self.submitter.record_vote(item, token, viewer_id)
    }

    /// Record a comment (optimistic, requires a prior vote).
    pub fn record_comment(
        &self,
        item: &FeedItem,
        viewer_id: Uuid,
        text: String,
    ) -> Option<JoinHandle<()>> {
        self.submitter.record_comment(item, viewer_id, text)
    }

    /// Explicit session teardown: the one path that clears interaction
    /// state. Feed reloads and list virtualization never reach this.
    pub fn end_session(&self) {
        self.store.clear();
    }
}
