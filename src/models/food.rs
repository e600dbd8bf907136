use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::constants::{ERR_INVALID_NAME, ERR_NEGATIVE_VALUE, MAX_NAME_LEN};
use crate::error::{AppError, Result};

/// One food entry belonging to a single user
///
/// `calories` is optional on the wire; missing values count as zero in
/// report sums.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodLog {
    /// Log ID (UUID v4)
    pub id: String,
    pub user_id: String,
    /// Food name as entered by the user
    pub name: String,
    pub calories: Option<f64>,
    /// Calendar day the food was consumed
    pub date: NaiveDate,
    /// When the entry was recorded (Unix timestamp)
    pub created_at: i64,
}

impl FoodLog {
    /// Validate user-supplied fields before storage
    pub fn validate(name: &str, calories: Option<f64>) -> Result<()> {
        let trimmed = name.trim();
        if trimmed.is_empty() || trimmed.len() > MAX_NAME_LEN {
            return Err(AppError::InvalidInput(ERR_INVALID_NAME.to_string()));
        }
        if let Some(kcal) = calories {
            if !kcal.is_finite() || kcal < 0.0 {
                return Err(AppError::InvalidInput(ERR_NEGATIVE_VALUE.to_string()));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_accepts_missing_calories() {
        assert!(FoodLog::validate("Nasi goreng", None).is_ok());
        assert!(FoodLog::validate("Oats", Some(389.0)).is_ok());
        assert!(FoodLog::validate("Water", Some(0.0)).is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_input() {
        assert!(FoodLog::validate("", Some(100.0)).is_err());
        assert!(FoodLog::validate("  ", Some(100.0)).is_err());
        assert!(FoodLog::validate("Candy", Some(-5.0)).is_err());
        assert!(FoodLog::validate("Candy", Some(f64::NAN)).is_err());
    }
}
