//! Report aggregation over a user's food, exercise, and sleep logs.
//!
//! Pure functions over in-memory slices: the HTTP layer loads the log
//! streams and decides the window; nothing here touches the database.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::Serialize;

use crate::models::{ExerciseLog, FoodLog, SleepLog};

/// Time span a report was computed over
#[derive(Debug, Clone, Serialize)]
pub struct Period {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Filtered view of the three log streams for a trailing window
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowReport {
    pub food_logs: Vec<FoodLog>,
    pub exercise_logs: Vec<ExerciseLog>,
    pub sleep_logs: Vec<SleepLog>,
    pub period: Period,
}

/// Scalar summary statistics over the three log streams
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub total_calories_consumed: f64,
    pub total_calories_burned: f64,
    pub total_exercise_minutes: f64,
    pub average_sleep_hours: f64,
    /// Consumed minus burned; may be negative
    pub net_calories: f64,
}

/// One chart point: per-day sums for a single calendar day
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyBucket {
    pub date: NaiveDate,
    pub calories_consumed: f64,
    pub calories_burned: f64,
    pub exercise_minutes: f64,
    pub sleep_hours: f64,
}

impl DailyBucket {
    fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            calories_consumed: 0.0,
            calories_burned: 0.0,
            exercise_minutes: 0.0,
            sleep_hours: 0.0,
        }
    }
}

/// Restrict the three log streams to a trailing window
///
/// Inclusion is day-granular: an entry is kept when its calendar day is on
/// or after the window's first day. No upper bound is applied, so
/// future-dated entries stay visible.
pub fn build_window_report(
    food: &[FoodLog],
    exercise: &[ExerciseLog],
    sleep: &[SleepLog],
    now: DateTime<Utc>,
    window_days: u32,
) -> WindowReport {
    let days = i64::from(window_days.max(1));
    let start = now - Duration::days(days);
    let cutoff = start.date_naive();

    WindowReport {
        food_logs: food.iter().filter(|l| l.date >= cutoff).cloned().collect(),
        exercise_logs: exercise.iter().filter(|l| l.date >= cutoff).cloned().collect(),
        sleep_logs: sleep.iter().filter(|l| l.date >= cutoff).cloned().collect(),
        period: Period { start, end: now },
    }
}

/// Compute summary statistics over the given log streams
///
/// Performs no filtering; the caller decides what window to pass. Missing
/// numeric fields count as zero. Sleep entries without a usable duration
/// are excluded from both the sum and the divisor, so the average of zero
/// eligible entries is 0, never NaN.
pub fn build_statistics(
    food: &[FoodLog],
    exercise: &[ExerciseLog],
    sleep: &[SleepLog],
) -> Statistics {
    let total_calories_consumed: f64 = food.iter().map(|l| l.calories.unwrap_or(0.0)).sum();
    let total_calories_burned: f64 = exercise
        .iter()
        .map(|l| l.calories_burned.unwrap_or(0.0))
        .sum();
    let total_exercise_minutes: f64 = exercise
        .iter()
        .map(|l| l.duration_minutes.unwrap_or(0.0))
        .sum();

    let durations: Vec<f64> = sleep.iter().filter_map(SleepLog::duration_hours).collect();
    let average_sleep_hours = if durations.is_empty() {
        0.0
    } else {
        durations.iter().sum::<f64>() / durations.len() as f64
    };

    Statistics {
        total_calories_consumed,
        total_calories_burned,
        total_exercise_minutes,
        average_sleep_hours,
        net_calories: total_calories_consumed - total_calories_burned,
    }
}

/// Group the three log streams into one point per calendar day
///
/// Buckets cover exactly the trailing window ending at `now`'s day, oldest
/// first, zero-filled for days with no entries. Same-day entries collapse
/// into one point; entries outside the window are ignored.
pub fn build_daily_buckets(
    food: &[FoodLog],
    exercise: &[ExerciseLog],
    sleep: &[SleepLog],
    now: DateTime<Utc>,
    window_days: u32,
) -> Vec<DailyBucket> {
    let days = i64::from(window_days.max(1));
    let today = now.date_naive();

    let mut buckets: Vec<DailyBucket> = (0..days)
        .rev()
        .map(|offset| DailyBucket::empty(today - Duration::days(offset)))
        .collect();

    let first_day = buckets[0].date;
    let bucket_for = |buckets: &mut Vec<DailyBucket>, date: NaiveDate| -> Option<usize> {
        if date < first_day || date > today {
            return None;
        }
        let idx = (date - first_day).num_days() as usize;
        debug_assert!(buckets[idx].date == date);
        Some(idx)
    };

    for log in food {
        if let Some(idx) = bucket_for(&mut buckets, log.date) {
            buckets[idx].calories_consumed += log.calories.unwrap_or(0.0);
        }
    }
    for log in exercise {
        if let Some(idx) = bucket_for(&mut buckets, log.date) {
            buckets[idx].calories_burned += log.calories_burned.unwrap_or(0.0);
            buckets[idx].exercise_minutes += log.duration_minutes.unwrap_or(0.0);
        }
    }
    for log in sleep {
        if let Some(idx) = bucket_for(&mut buckets, log.date) {
            if let Some(hours) = log.duration_hours() {
                buckets[idx].sleep_hours += hours;
            }
        }
    }

    buckets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SleepQuality;

    fn food(name: &str, calories: Option<f64>, date: &str) -> FoodLog {
        FoodLog {
            id: format!("food-{}", name),
            user_id: "user-1".to_string(),
            name: name.to_string(),
            calories,
            date: date.parse().unwrap(),
            created_at: 0,
        }
    }

    fn exercise(
        activity: &str,
        minutes: Option<f64>,
        burned: Option<f64>,
        date: &str,
    ) -> ExerciseLog {
        ExerciseLog {
            id: format!("exercise-{}", activity),
            user_id: "user-1".to_string(),
            activity: activity.to_string(),
            duration_minutes: minutes,
            calories_burned: burned,
            date: date.parse().unwrap(),
            created_at: 0,
        }
    }

    fn sleep(id: &str, date: &str, start: Option<&str>, wake: Option<&str>) -> SleepLog {
        SleepLog {
            id: id.to_string(),
            user_id: "user-1".to_string(),
            date: date.parse().unwrap(),
            sleep_start: start.map(|s| s.parse().unwrap()),
            wake_time: wake.map(|s| s.parse().unwrap()),
            quality: Some(SleepQuality::Good),
            created_at: 0,
        }
    }

    fn now() -> DateTime<Utc> {
        "2024-01-08T12:00:00Z".parse().unwrap()
    }

    #[test]
    fn test_statistics_all_empty() {
        let stats = build_statistics(&[], &[], &[]);
        assert_eq!(stats.total_calories_consumed, 0.0);
        assert_eq!(stats.total_calories_burned, 0.0);
        assert_eq!(stats.total_exercise_minutes, 0.0);
        assert_eq!(stats.average_sleep_hours, 0.0);
        assert_eq!(stats.net_calories, 0.0);
    }

    #[test]
    fn test_statistics_concrete_scenario() {
        let food_logs = vec![
            food("breakfast", Some(500.0), "2024-01-05"),
            food("dinner", Some(700.0), "2024-01-05"),
        ];
        let exercise_logs = vec![exercise("run", Some(30.0), Some(300.0), "2024-01-05")];
        let sleep_logs = vec![sleep(
            "night",
            "2024-01-02",
            Some("2024-01-01T23:00:00Z"),
            Some("2024-01-02T07:00:00Z"),
        )];

        let stats = build_statistics(&food_logs, &exercise_logs, &sleep_logs);
        assert_eq!(stats.total_calories_consumed, 1200.0);
        assert_eq!(stats.total_calories_burned, 300.0);
        assert_eq!(stats.total_exercise_minutes, 30.0);
        assert_eq!(stats.average_sleep_hours, 8.0);
        assert_eq!(stats.net_calories, 900.0);
    }

    #[test]
    fn test_statistics_missing_values_count_as_zero() {
        let food_logs = vec![
            food("known", Some(400.0), "2024-01-05"),
            food("unknown", None, "2024-01-05"),
        ];
        let exercise_logs = vec![
            exercise("yoga", Some(45.0), None, "2024-01-05"),
            exercise("walk", None, Some(120.0), "2024-01-06"),
        ];

        let stats = build_statistics(&food_logs, &exercise_logs, &[]);
        assert_eq!(stats.total_calories_consumed, 400.0);
        assert_eq!(stats.total_calories_burned, 120.0);
        assert_eq!(stats.total_exercise_minutes, 45.0);
        assert_eq!(stats.net_calories, 280.0);
    }

    #[test]
    fn test_average_excludes_entries_without_duration() {
        // One valid 6-hour night plus one with a null wake time: the null
        // entry must not appear in the divisor.
        let sleep_logs = vec![
            sleep(
                "full",
                "2024-01-02",
                Some("2024-01-02T01:00:00Z"),
                Some("2024-01-02T07:00:00Z"),
            ),
            sleep("partial", "2024-01-03", Some("2024-01-03T01:00:00Z"), None),
        ];

        let stats = build_statistics(&[], &[], &sleep_logs);
        assert_eq!(stats.average_sleep_hours, 6.0);
    }

    #[test]
    fn test_average_never_negative_for_reversed_timestamps() {
        let sleep_logs = vec![
            sleep(
                "reversed",
                "2024-01-02",
                Some("2024-01-02T07:00:00Z"),
                Some("2024-01-02T01:00:00Z"),
            ),
            sleep(
                "valid",
                "2024-01-03",
                Some("2024-01-03T00:00:00Z"),
                Some("2024-01-03T04:00:00Z"),
            ),
        ];

        let stats = build_statistics(&[], &[], &sleep_logs);
        assert!(stats.average_sleep_hours >= 0.0);
        assert_eq!(stats.average_sleep_hours, 4.0);
    }

    #[test]
    fn test_net_calories_identity() {
        let food_logs = vec![food("a", Some(250.0), "2024-01-05")];
        let exercise_logs = vec![exercise("b", Some(60.0), Some(900.0), "2024-01-05")];

        let stats = build_statistics(&food_logs, &exercise_logs, &[]);
        assert_eq!(
            stats.net_calories,
            stats.total_calories_consumed - stats.total_calories_burned
        );
        // A calorie deficit is a negative balance, not an error
        assert_eq!(stats.net_calories, -650.0);
    }

    #[test]
    fn test_window_keeps_boundary_day() {
        // now = 2024-01-08, window = 7 days: 2024-01-01 is the first day in
        // the window and must be kept.
        let food_logs = vec![
            food("boundary", Some(100.0), "2024-01-01"),
            food("stale", Some(100.0), "2023-12-31"),
        ];

        let report = build_window_report(&food_logs, &[], &[], now(), 7);
        let names: Vec<&str> = report.food_logs.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["boundary"]);
        assert_eq!(report.period.end, now());
        assert_eq!(report.period.start, now() - Duration::days(7));
    }

    #[test]
    fn test_window_keeps_future_entries() {
        let food_logs = vec![food("tomorrow", Some(100.0), "2024-01-09")];

        let report = build_window_report(&food_logs, &[], &[], now(), 7);
        assert_eq!(report.food_logs.len(), 1);
    }

    #[test]
    fn test_window_filter_is_idempotent() {
        let food_logs = vec![
            food("in", Some(100.0), "2024-01-05"),
            food("out", Some(100.0), "2023-12-20"),
        ];
        let exercise_logs = vec![
            exercise("in", Some(10.0), Some(50.0), "2024-01-07"),
            exercise("out", Some(10.0), Some(50.0), "2023-11-01"),
        ];
        let sleep_logs = vec![sleep(
            "in",
            "2024-01-06",
            Some("2024-01-06T00:00:00Z"),
            Some("2024-01-06T08:00:00Z"),
        )];

        let once = build_window_report(&food_logs, &exercise_logs, &sleep_logs, now(), 7);
        let twice = build_window_report(
            &once.food_logs,
            &once.exercise_logs,
            &once.sleep_logs,
            now(),
            7,
        );

        let ids = |logs: &[FoodLog]| logs.iter().map(|l| l.id.clone()).collect::<Vec<_>>();
        assert_eq!(ids(&once.food_logs), ids(&twice.food_logs));
        assert_eq!(once.exercise_logs.len(), twice.exercise_logs.len());
        assert_eq!(once.sleep_logs.len(), twice.sleep_logs.len());
    }

    #[test]
    fn test_window_report_empty_inputs() {
        let report = build_window_report(&[], &[], &[], now(), 7);
        assert!(report.food_logs.is_empty());
        assert!(report.exercise_logs.is_empty());
        assert!(report.sleep_logs.is_empty());
    }

    #[test]
    fn test_daily_buckets_zero_filled() {
        let buckets = build_daily_buckets(&[], &[], &[], now(), 7);

        assert_eq!(buckets.len(), 7);
        assert_eq!(buckets[0].date, "2024-01-02".parse().unwrap());
        assert_eq!(buckets[6].date, "2024-01-08".parse().unwrap());
        assert!(buckets.iter().all(|b| b.calories_consumed == 0.0
            && b.calories_burned == 0.0
            && b.exercise_minutes == 0.0
            && b.sleep_hours == 0.0));
    }

    #[test]
    fn test_daily_buckets_collapse_same_day() {
        let food_logs = vec![
            food("lunch", Some(600.0), "2024-01-05"),
            food("dinner", Some(400.0), "2024-01-05"),
        ];
        let exercise_logs = vec![exercise("run", Some(30.0), Some(250.0), "2024-01-05")];
        let sleep_logs = vec![sleep(
            "night",
            "2024-01-05",
            Some("2024-01-04T23:30:00Z"),
            Some("2024-01-05T06:30:00Z"),
        )];

        let buckets = build_daily_buckets(&food_logs, &exercise_logs, &sleep_logs, now(), 7);
        let day: Vec<&DailyBucket> = buckets
            .iter()
            .filter(|b| b.date == "2024-01-05".parse::<NaiveDate>().unwrap())
            .collect();

        assert_eq!(day.len(), 1);
        assert_eq!(day[0].calories_consumed, 1000.0);
        assert_eq!(day[0].calories_burned, 250.0);
        assert_eq!(day[0].exercise_minutes, 30.0);
        assert_eq!(day[0].sleep_hours, 7.0);
    }

    #[test]
    fn test_daily_buckets_ignore_out_of_window_entries() {
        let food_logs = vec![
            food("old", Some(100.0), "2023-12-01"),
            food("future", Some(100.0), "2024-02-01"),
        ];

        let buckets = build_daily_buckets(&food_logs, &[], &[], now(), 7);
        assert!(buckets.iter().all(|b| b.calories_consumed == 0.0));
    }

    #[test]
    fn test_zero_window_treated_as_one_day() {
        let food_logs = vec![food("today", Some(100.0), "2024-01-08")];

        let report = build_window_report(&food_logs, &[], &[], now(), 0);
        assert_eq!(report.food_logs.len(), 1);

        let buckets = build_daily_buckets(&food_logs, &[], &[], now(), 0);
        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[0].calories_consumed, 100.0);
    }
}
