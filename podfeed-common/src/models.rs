//! Domain models shared by the PodFeed crates

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Audience scope a pod is visible to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Audience {
    Friends,
    StyleTwins,
    Global,
}

impl Audience {
    /// Parse the stored audience string; unrecognized values fall back to Global.
    pub fn from_str_lossy(s: &str) -> Self {
        match s {
            "friends" => Audience::Friends,
            "style_twins" => Audience::StyleTwins,
            _ => Audience::Global,
        }
    }
}

/// Stored pod status. Transitions live -> expired only, never reverses.
///
/// The stored status may lag behind `ends_at`; effective liveness
/// (`status == Live && ends_at > now`) drives all tiering and voting
/// eligibility, never this raw value alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PodStatus {
    Live,
    Expired,
}

/// A time-boxed image poll
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pod {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub audience: Audience,
    /// Ordered image references (1..N)
    pub images: Vec<String>,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub ends_at: Option<DateTime<Utc>>,
    pub status: PodStatus,
}

/// A raw pod row as returned by the external repository, before validation.
///
/// Every field is optional: malformed rows are a filtering rule, not an
/// error, so deserialization must never fail on a partial row. `image_url`
/// is either a single reference string or a JSON-encoded array of reference
/// strings; the assembler parses it defensively.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PodRow {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub owner_id: Option<String>,
    #[serde(default)]
    pub audience: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub ends_at: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// Persisted vote choice
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoteChoice {
    Yes,
    Maybe,
    No,
}

/// Optional vote metadata for multi-image pods.
///
/// `selected_index` carries the 1-based image index; `selected_option`
/// carries the 0-based option offset. Aggregation prefers `selected_index`
/// and falls back to `selected_option + 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteMetadata {
    #[serde(default)]
    pub selected_option: Option<u32>,
    #[serde(default)]
    pub selected_index: Option<u32>,
}

/// A single vote record. At most one exists per (pod_id, voter_id) pair;
/// the store enforces this, readers still deduplicate defensively.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vote {
    pub pod_id: Uuid,
    pub voter_id: Uuid,
    pub choice: VoteChoice,
    #[serde(default)]
    pub metadata: Option<VoteMetadata>,
    pub created_at: DateTime<Utc>,
}

/// A comment on a pod (at most one per (pod_id, author_id))
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub pod_id: Uuid,
    pub author_id: Uuid,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// Aggregated vote tallies for one pod. Recomputed from the vote set on
/// demand; never cached across votes while the pod is live.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteCounts {
    pub yes: u64,
    pub maybe: u64,
    pub no: u64,
    pub total: u64,
    /// Per-image tallies keyed by 1-based image index (multi-image pods only)
    #[serde(default)]
    pub per_image: Option<BTreeMap<usize, u64>>,
}

/// Pod shape, derived from the number of resolved images
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PodKind {
    Single,
    Multi,
}

/// A display-ready feed entry, rebuilt wholesale on every load.
///
/// Never partially mutated in place by voting; interaction state lives in
/// the side store keyed by `pod_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedItem {
    pub pod_id: Uuid,
    pub kind: PodKind,
    pub images: Vec<String>,
    pub question: String,
    pub time_left: String,
    pub is_live: bool,
    pub owner_id: Uuid,
    pub is_owner: bool,
    pub has_voted: bool,
    pub has_commented: bool,
    pub created_at: DateTime<Utc>,
}

/// Per-viewer, per-pod interaction state held in the side store.
///
/// Written on interaction, read on item (re)mount, cleared only on explicit
/// session teardown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionState {
    pub has_voted: bool,
    pub has_commented: bool,
    /// The specific choice, when locally known. A viewer can be known to
    /// have voted without the choice being known (e.g. after app restart).
    pub choice: Option<VoteChoice>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audience_parse_lossy() {
        assert_eq!(Audience::from_str_lossy("friends"), Audience::Friends);
        assert_eq!(Audience::from_str_lossy("style_twins"), Audience::StyleTwins);
        assert_eq!(Audience::from_str_lossy("global"), Audience::Global);
        // Unknown scopes widen to global rather than failing
        assert_eq!(Audience::from_str_lossy("everyone"), Audience::Global);
    }

    #[test]
    fn test_pod_row_tolerates_partial_json() {
        // A row missing most fields must still deserialize
        let row: PodRow = serde_json::from_str(r#"{"id": "abc"}"#).unwrap();
        assert_eq!(row.id.as_deref(), Some("abc"));
        assert!(row.image_url.is_none());
        assert!(row.ends_at.is_none());
    }

    #[test]
    fn test_vote_metadata_defaults() {
        let m: VoteMetadata = serde_json::from_str("{}").unwrap();
        assert!(m.selected_option.is_none());
        assert!(m.selected_index.is_none());
    }
}
