//! Timestamp utilities and time-left formatting
//!
//! Provides the single time-left label format used across the feed:
//! `"{hours}h {minutes}m left"` when at least one whole hour remains,
//! `"{minutes}m left"` below that, `"ended"` at or past the deadline,
//! and `"no limit"` when a pod carries no deadline at all.

use chrono::{DateTime, Utc};

/// Get current UTC timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Parse a stored RFC 3339 timestamp string.
///
/// Returns None on any parse failure; callers choose the fallback (an
/// unparsable `ends_at` is treated as already ended).
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Format the remaining time on a pod as a display label.
///
/// Hours and minutes are floored whole units of the remaining duration.
pub fn time_left_label(ends_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    let Some(ends_at) = ends_at else {
        return "no limit".to_string();
    };

    if ends_at <= now {
        return "ended".to_string();
    }

    let total_minutes = (ends_at - now).num_minutes();
    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;

    if hours > 0 {
        format!("{}h {}m left", hours, minutes)
    } else {
        format!("{}m left", minutes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn fixed_now() -> DateTime<Utc> {
        parse_timestamp("2025-06-01T12:00:00Z").unwrap()
    }

    #[test]
    fn test_now_returns_valid_timestamp() {
        let timestamp = now();
        // Should be a reasonable timestamp (after year 2000)
        assert!(timestamp.timestamp() > 946_684_800); // 2000-01-01 00:00:00 UTC
    }

    #[test]
    fn test_parse_timestamp_rfc3339() {
        let dt = parse_timestamp("2025-06-01T12:00:00Z").unwrap();
        assert_eq!(dt.timestamp(), 1_748_779_200);

        // Offset forms normalize to UTC
        let offset = parse_timestamp("2025-06-01T14:00:00+02:00").unwrap();
        assert_eq!(offset, dt);
    }

    #[test]
    fn test_parse_timestamp_rejects_garbage() {
        assert!(parse_timestamp("not a timestamp").is_none());
        assert!(parse_timestamp("").is_none());
        assert!(parse_timestamp("2025-13-45T99:00:00Z").is_none());
    }

    #[test]
    fn test_time_left_no_limit() {
        assert_eq!(time_left_label(None, fixed_now()), "no limit");
    }

    #[test]
    fn test_time_left_ended() {
        let now = fixed_now();
        assert_eq!(time_left_label(Some(now - Duration::minutes(1)), now), "ended");
        // Exactly at the deadline counts as ended
        assert_eq!(time_left_label(Some(now), now), "ended");
    }

    #[test]
    fn test_time_left_minutes_only() {
        let now = fixed_now();
        assert_eq!(time_left_label(Some(now + Duration::minutes(45)), now), "45m left");
        assert_eq!(time_left_label(Some(now + Duration::minutes(59)), now), "59m left");
    }

    #[test]
    fn test_time_left_hours_and_minutes() {
        let now = fixed_now();
        assert_eq!(
            time_left_label(Some(now + Duration::minutes(60)), now),
            "1h 0m left"
        );
        assert_eq!(
            time_left_label(Some(now + Duration::minutes(150)), now),
            "2h 30m left"
        );
        assert_eq!(
            time_left_label(Some(now + Duration::hours(23) + Duration::minutes(59)), now),
            "23h 59m left"
        );
    }

    #[test]
    fn test_time_left_floors_partial_minutes() {
        let now = fixed_now();
        // 89.9 minutes remaining -> 1h 29m, not rounded up
        assert_eq!(
            time_left_label(Some(now + Duration::seconds(89 * 60 + 54)), now),
            "1h 29m left"
        );
        // Under a minute floors to 0m (still live)
        assert_eq!(time_left_label(Some(now + Duration::seconds(30)), now), "0m left");
    }
}
