//! Shared test fixtures: an in-memory repository double and row builders

// Each integration test binary compiles this module; not every binary
// touches every helper.
#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use podfeed_common::config::EngineConfig;
use podfeed_common::time::parse_timestamp;
use podfeed_common::{Audience, Error, PodRow, Result, Vote, VoteChoice, VoteMetadata};
use podfeed_engine::{FeedEngine, PodRepository};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// In-memory repository double
#[derive(Default)]
pub struct MemoryRepo {
    pub pods: Mutex<Vec<PodRow>>,
    pub votes: Mutex<HashMap<Uuid, Vec<Vote>>>,
    pub voted: Mutex<HashSet<(Uuid, Uuid)>>,
    pub commented: Mutex<HashSet<(Uuid, Uuid)>>,
    pub fail_fetch: bool,
    pub fail_submissions: bool,
    pub vote_fetches: AtomicUsize,
}

impl MemoryRepo {
    pub fn add_pod(&self, row: PodRow) {
        self.pods.lock().unwrap().push(row);
    }

    pub fn set_voted(&self, pod_id: Uuid, viewer_id: Uuid) {
        self.voted.lock().unwrap().insert((pod_id, viewer_id));
    }

    pub fn set_commented(&self, pod_id: Uuid, viewer_id: Uuid) {
        self.commented.lock().unwrap().insert((pod_id, viewer_id));
    }

    pub fn add_vote(&self, vote: Vote) {
        self.votes
            .lock()
            .unwrap()
            .entry(vote.pod_id)
            .or_default()
            .push(vote);
    }
}

#[async_trait]
impl PodRepository for MemoryRepo {
    async fn fetch_pods(&self, _audience: Audience, _viewer_id: Uuid) -> Result<Vec<PodRow>> {
        if self.fail_fetch {
            return Err(Error::Repository("connection refused".to_string()));
        }
        Ok(self.pods.lock().unwrap().clone())
    }

    async fn has_user_voted(&self, pod_id: Uuid, viewer_id: Uuid) -> Result<bool> {
        Ok(self.voted.lock().unwrap().contains(&(pod_id, viewer_id)))
    }

    async fn has_user_commented_on_pod(&self, pod_id: Uuid, viewer_id: Uuid) -> Result<bool> {
        Ok(self.commented.lock().unwrap().contains(&(pod_id, viewer_id)))
    }

    async fn get_votes_for_pod(&self, pod_id: Uuid) -> Result<Vec<Vote>> {
        self.vote_fetches.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .votes
            .lock()
            .unwrap()
            .get(&pod_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn submit_vote(
        &self,
        pod_id: Uuid,
        choice: VoteChoice,
        viewer_id: Uuid,
        metadata: Option<VoteMetadata>,
    ) -> Result<()> {
        if self.fail_submissions {
            return Err(Error::Repository("write timed out".to_string()));
        }
        self.set_voted(pod_id, viewer_id);
        self.add_vote(Vote {
            pod_id,
            voter_id: viewer_id,
            choice,
            metadata,
            created_at: Utc::now(),
        });
        Ok(())
    }

    async fn submit_comment(&self, pod_id: Uuid, viewer_id: Uuid, _text: &str) -> Result<bool> {
        if self.fail_submissions {
            return Err(Error::Repository("write timed out".to_string()));
        }
        self.set_commented(pod_id, viewer_id);
        Ok(true)
    }
}

pub fn fixed_now() -> DateTime<Utc> {
    parse_timestamp("2025-06-01T12:00:00Z").unwrap()
}

pub fn pod_row(id: Uuid, created_at: DateTime<Utc>, ends_at: DateTime<Utc>, live: bool) -> PodRow {
    PodRow {
        id: Some(id.to_string()),
        owner_id: Some(Uuid::new_v4().to_string()),
        audience: Some("friends".to_string()),
        image_url: Some("img://one".to_string()),
        title: Some("Which one?".to_string()),
        created_at: Some(created_at.to_rfc3339()),
        ends_at: Some(ends_at.to_rfc3339()),
        status: Some(if live { "live" } else { "expired" }.to_string()),
    }
}

pub fn engine(repo: MemoryRepo) -> (FeedEngine<MemoryRepo>, Arc<MemoryRepo>) {
    let repo = Arc::new(repo);
    (
        FeedEngine::new(Arc::clone(&repo), &EngineConfig::default()),
        repo,
    )
}
