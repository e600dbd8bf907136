//! LifeMon Server Library
//!
//! This module exports the core types and functions for testing and reuse.

pub mod config;
pub mod constants;
pub mod db;
pub mod error;
pub mod models;
pub mod openfoodfacts;
pub mod report;
pub mod routes;
pub mod security;

pub use config::Config;
pub use db::{open_database, Db};
pub use error::{AppError, Result};

use axum::{
    routing::{delete, get, post},
    Router,
};

use openfoodfacts::OpenFoodFactsClient;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub db: Db,
    pub config: Config,
    pub off: OpenFoodFactsClient,
}

impl AppState {
    /// Create a new AppState with the given database and configuration
    pub fn new(db: Db, config: Config) -> Self {
        Self {
            db,
            config,
            off: OpenFoodFactsClient::new(),
        }
    }
}

/// Build the application router
///
/// CORS and request tracing are layered on by the binary; tests drive this
/// router directly.
pub fn router(state: AppState) -> Router {
    use routes::*;

    Router::new()
        .route("/health", get(health_check))
        .route("/api/users/register", post(register_user))
        .route("/api/users/login", post(login_user))
        .route("/api/users/profile", get(get_profile).put(update_profile))
        .route("/api/users", delete(delete_user))
        .route("/api/food-logs", post(create_food_log).get(list_food_logs))
        .route("/api/food-logs/calories", post(estimate_calories))
        .route("/api/food-logs/:id", delete(delete_food_log))
        .route(
            "/api/exercise-logs",
            post(create_exercise_log).get(list_exercise_logs),
        )
        .route("/api/exercise-logs/:id", delete(delete_exercise_log))
        .route(
            "/api/sleep-logs",
            post(create_sleep_log).get(list_sleep_logs),
        )
        .route("/api/sleep-logs/:id", delete(delete_sleep_log))
        .route("/api/reports/data", get(report_data))
        .route("/api/reports/statistics", get(statistics))
        .route("/api/reports/daily", get(daily_buckets))
        .route("/api/export", get(export_logs))
        .route("/admin/stats", get(admin_stats))
        .with_state(state)
}
