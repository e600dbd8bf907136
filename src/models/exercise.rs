use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::constants::{ERR_INVALID_NAME, ERR_NEGATIVE_VALUE, MAX_NAME_LEN};
use crate::error::{AppError, Result};

/// One exercise entry belonging to a single user
///
/// Duration and burned calories are independent fields; neither is derived
/// from the other. Missing values count as zero in report sums.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseLog {
    /// Log ID (UUID v4)
    pub id: String,
    pub user_id: String,
    /// Activity name as entered by the user
    pub activity: String,
    pub duration_minutes: Option<f64>,
    pub calories_burned: Option<f64>,
    /// Calendar day the activity took place
    pub date: NaiveDate,
    /// When the entry was recorded (Unix timestamp)
    pub created_at: i64,
}

impl ExerciseLog {
    /// Validate user-supplied fields before storage
    pub fn validate(
        activity: &str,
        duration_minutes: Option<f64>,
        calories_burned: Option<f64>,
    ) -> Result<()> {
        let trimmed = activity.trim();
        if trimmed.is_empty() || trimmed.len() > MAX_NAME_LEN {
            return Err(AppError::InvalidInput(ERR_INVALID_NAME.to_string()));
        }
        for value in [duration_minutes, calories_burned].into_iter().flatten() {
            if !value.is_finite() || value < 0.0 {
                return Err(AppError::InvalidInput(ERR_NEGATIVE_VALUE.to_string()));
            }
        }
        Ok(())
    }
}
