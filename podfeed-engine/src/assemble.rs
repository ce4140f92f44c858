//! Feed assembly
//!
//! Filters raw pod rows into valid feed items. Malformed rows (missing id,
//! missing owner, no resolvable image) are a filtering rule, not an error:
//! they are dropped silently with a debug log. Ended pods past the
//! staleness cutoff are dropped the same way.
//!
//! Interaction flags (`has_voted` / `has_commented`) come from the
//! repository side-channel, never invented here; the caller merges in any
//! local optimistic state before assembly.

use chrono::{DateTime, Duration, Utc};
use podfeed_common::time::parse_timestamp;
use podfeed_common::{FeedItem, PodKind, PodRow, PodStatus};
use std::collections::HashMap;
use tracing::debug;
use uuid::Uuid;

/// Per-pod interaction flags fetched from the repository (possibly merged
/// with local optimistic state by the caller)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InteractionFlags {
    pub has_voted: bool,
    pub has_commented: bool,
}

/// Resolve the stored `image_url` field into an ordered list of image refs.
///
/// The field is either a single reference string or a JSON-encoded array of
/// reference strings. A leading `[` triggers an array-parse attempt; any
/// parse failure or non-array result falls back to treating the raw string
/// as a single image.
pub fn parse_image_refs(raw: &str) -> Vec<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }

    if trimmed.starts_with('[') {
        if let Ok(serde_json::Value::Array(items)) = serde_json::from_str(trimmed) {
            return items
                .into_iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .filter(|s| !s.is_empty())
                .collect();
        }
    }

    vec![raw.to_string()]
}

/// Assemble raw pod rows into display-ready feed items (unsorted).
///
/// `staleness_cutoff` is how long an ended pod remains visible past its
/// deadline; a pod with `ends_at` exactly at the boundary is kept.
pub fn assemble_feed(
    rows: &[PodRow],
    flags: &HashMap<Uuid, InteractionFlags>,
    viewer_id: Uuid,
    now: DateTime<Utc>,
    staleness_cutoff: Duration,
) -> Vec<FeedItem> {
    rows.iter()
        .filter_map(|row| assemble_row(row, flags, viewer_id, now, staleness_cutoff))
        .collect()
}

fn assemble_row(
    row: &PodRow,
    flags: &HashMap<Uuid, InteractionFlags>,
    viewer_id: Uuid,
    now: DateTime<Utc>,
    staleness_cutoff: Duration,
) -> Option<FeedItem> {
    let pod_id = match row.id.as_deref().map(Uuid::parse_str) {
        Some(Ok(id)) => id,
        _ => {
            debug!("Dropping pod row with missing or malformed id");
            return None;
        }
    };

    let owner_id = match row.owner_id.as_deref().map(Uuid::parse_str) {
        Some(Ok(id)) => id,
        _ => {
            debug!(pod_id = %pod_id, "Dropping pod row with missing or malformed owner");
            return None;
        }
    };

    let images = row
        .image_url
        .as_deref()
        .map(parse_image_refs)
        .unwrap_or_default();
    if images.is_empty() {
        debug!(pod_id = %pod_id, "Dropping pod row with no resolvable image");
        return None;
    }

    let status = match row.status.as_deref() {
        Some("live") => PodStatus::Live,
        _ => PodStatus::Expired,
    };

    // An unparsable deadline string means the pod is treated as already
    // ended, which is distinct from carrying no deadline at all.
    let (ends_at, deadline_broken) = match row.ends_at.as_deref() {
        None => (None, false),
        Some(s) => match parse_timestamp(s) {
            Some(dt) => (Some(dt), false),
            None => {
                debug!(pod_id = %pod_id, raw = s, "Unparsable ends_at, treating pod as ended");
                (None, true)
            }
        },
    };

    let liveness = if deadline_broken {
        crate::lifecycle::Liveness {
            is_live: false,
            time_left: "ended".to_string(),
        }
    } else {
        crate::lifecycle::classify_lifecycle(status, ends_at, now)
    };

    // Staleness cutoff: ended pods leave the feed once their deadline is
    // strictly older than the window. The exact boundary is kept. Ended
    // pods with an unknown deadline cannot be aged out and are kept.
    if !liveness.is_live {
        if let Some(ends_at) = ends_at {
            if ends_at < now - staleness_cutoff {
                debug!(pod_id = %pod_id, "Dropping stale ended pod");
                return None;
            }
        }
    }

    let created_at = row
        .created_at
        .as_deref()
        .and_then(parse_timestamp)
        .unwrap_or(DateTime::UNIX_EPOCH);

    let item_flags = flags.get(&pod_id).copied().unwrap_or_default();

    let kind = if images.len() > 1 {
        PodKind::Multi
    } else {
        PodKind::Single
    };

    Some(FeedItem {
        pod_id,
        kind,
        images,
        question: row.title.clone().unwrap_or_default(),
        time_left: liveness.time_left,
        is_live: liveness.is_live,
        owner_id,
        is_owner: owner_id == viewer_id,
        has_voted: item_flags.has_voted,
        has_commented: item_flags.has_commented,
        created_at,
    })
}
