pub mod admin;
pub mod exercise;
pub mod export;
pub mod food;
pub mod health;
pub mod profile;
pub mod reports;
pub mod sleep;
pub mod users;

pub use admin::admin_stats;
pub use exercise::{create_exercise_log, delete_exercise_log, list_exercise_logs};
pub use export::export_logs;
pub use food::{create_food_log, delete_food_log, estimate_calories, list_food_logs};
pub use health::health_check;
pub use profile::{get_profile, update_profile};
pub use reports::{daily_buckets, report_data, statistics};
pub use sleep::{create_sleep_log, delete_sleep_log, list_sleep_logs};
pub use users::{delete_user, login_user, register_user};

use serde::Serialize;

/// Standard `{ success, data }` response envelope
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub data: T,
}

impl<T> Envelope<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Response for log deletions
#[derive(Debug, Serialize)]
pub struct DeleteLogResponse {
    pub success: bool,
    pub message: String,
}
