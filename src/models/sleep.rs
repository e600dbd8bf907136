use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::MAX_SLEEP_HOURS;

/// Self-reported sleep quality label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SleepQuality {
    Poor,
    Fair,
    Good,
    Excellent,
}

/// One sleep entry belonging to a single user
///
/// Either timestamp may be missing; such entries are excluded from the
/// sleep-hours average rather than counted as zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SleepLog {
    /// Log ID (UUID v4)
    pub id: String,
    pub user_id: String,
    /// Calendar day the night is attributed to
    pub date: NaiveDate,
    pub sleep_start: Option<DateTime<Utc>>,
    pub wake_time: Option<DateTime<Utc>>,
    pub quality: Option<SleepQuality>,
    /// When the entry was recorded (Unix timestamp)
    pub created_at: i64,
}

impl SleepLog {
    /// Hours slept, if both timestamps are present and ordered
    ///
    /// Entries with `wake_time <= sleep_start` yield None and stay out of
    /// averages. Durations beyond 24h are clamped.
    pub fn duration_hours(&self) -> Option<f64> {
        let start = self.sleep_start?;
        let wake = self.wake_time?;
        if wake <= start {
            return None;
        }
        let hours = (wake - start).num_seconds() as f64 / 3600.0;
        Some(hours.min(MAX_SLEEP_HOURS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(start: Option<&str>, wake: Option<&str>) -> SleepLog {
        SleepLog {
            id: "log-1".to_string(),
            user_id: "user-1".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            sleep_start: start.map(|s| s.parse().unwrap()),
            wake_time: wake.map(|s| s.parse().unwrap()),
            quality: Some(SleepQuality::Good),
            created_at: 1704153600,
        }
    }

    #[test]
    fn test_duration_hours_normal_night() {
        let log = entry(Some("2024-01-01T23:00:00Z"), Some("2024-01-02T07:00:00Z"));
        assert_eq!(log.duration_hours(), Some(8.0));
    }

    #[test]
    fn test_duration_hours_missing_timestamp() {
        assert_eq!(entry(Some("2024-01-01T23:00:00Z"), None).duration_hours(), None);
        assert_eq!(entry(None, Some("2024-01-02T07:00:00Z")).duration_hours(), None);
        assert_eq!(entry(None, None).duration_hours(), None);
    }

    #[test]
    fn test_duration_hours_reversed_timestamps() {
        // wake before sleep is bad input, not a negative duration
        let log = entry(Some("2024-01-02T07:00:00Z"), Some("2024-01-01T23:00:00Z"));
        assert_eq!(log.duration_hours(), None);

        let equal = entry(Some("2024-01-01T23:00:00Z"), Some("2024-01-01T23:00:00Z"));
        assert_eq!(equal.duration_hours(), None);
    }

    #[test]
    fn test_duration_hours_clamped() {
        let log = entry(Some("2024-01-01T00:00:00Z"), Some("2024-01-03T06:00:00Z"));
        assert_eq!(log.duration_hours(), Some(MAX_SLEEP_HOURS));
    }

    #[test]
    fn test_quality_serializes_lowercase() {
        let json = serde_json::to_string(&SleepQuality::Excellent).unwrap();
        assert_eq!(json, "\"excellent\"");
        let parsed: SleepQuality = serde_json::from_str("\"poor\"").unwrap();
        assert_eq!(parsed, SleepQuality::Poor);
    }
}
