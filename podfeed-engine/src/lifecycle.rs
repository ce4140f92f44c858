//! Pod lifecycle classification
//!
//! Derives effective liveness and the time-left label from a pod's stored
//! status and deadline. The stored status may lag behind `ends_at` (the
//! background job that flips live -> expired runs on its own schedule), so
//! every liveness decision in the engine goes through here rather than
//! reading the raw status.

use chrono::{DateTime, Utc};
use podfeed_common::time::time_left_label;
use podfeed_common::PodStatus;

/// Derived lifecycle facts for one pod at one instant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Liveness {
    pub is_live: bool,
    pub time_left: String,
}

/// A pod is effectively live iff its stored status is live AND its deadline
/// has not passed. A pod with no deadline stays live until expired by status.
pub fn is_effectively_live(
    status: PodStatus,
    ends_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> bool {
    status == PodStatus::Live && ends_at.map_or(true, |e| e > now)
}

/// Classify liveness and time-left in one pass.
pub fn classify_lifecycle(
    status: PodStatus,
    ends_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> Liveness {
    Liveness {
        is_live: is_effectively_live(status, ends_at, now),
        time_left: time_left_label(ends_at, now),
    }
}
