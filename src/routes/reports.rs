use axum::{
    extract::{Query, State},
    Json,
};
use chrono::Utc;
use serde::Deserialize;

use crate::constants::{DEFAULT_WINDOW_DAYS, ERR_INVALID_WINDOW, MAX_WINDOW_DAYS};
use crate::db;
use crate::error::{AppError, Result};
use crate::report::{self, DailyBucket, Statistics, WindowReport};
use crate::routes::Envelope;
use crate::security::AuthUser;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct WindowQuery {
    /// Trailing window length in days; defaults to 7
    pub days: Option<u32>,
}

fn window_days(query: &WindowQuery) -> Result<u32> {
    let days = query.days.unwrap_or(DEFAULT_WINDOW_DAYS);
    if days == 0 || days > MAX_WINDOW_DAYS {
        return Err(AppError::InvalidInput(ERR_INVALID_WINDOW.to_string()));
    }
    Ok(days)
}

/// Combined report: the three log streams filtered to a trailing window
pub async fn report_data(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<WindowQuery>,
) -> Result<Json<Envelope<WindowReport>>> {
    let days = window_days(&query)?;

    let db = state.db.clone();
    let (food, exercise, sleep) =
        tokio::task::spawn_blocking(move || db::load_all_logs(&db, &auth.user_id)).await??;

    let report = report::build_window_report(&food, &exercise, &sleep, Utc::now(), days);
    Ok(Json(Envelope::new(report)))
}

/// Summary statistics over all of the user's logs
pub async fn statistics(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Envelope<Statistics>>> {
    let db = state.db.clone();
    let (food, exercise, sleep) =
        tokio::task::spawn_blocking(move || db::load_all_logs(&db, &auth.user_id)).await??;

    let stats = report::build_statistics(&food, &exercise, &sleep);
    Ok(Json(Envelope::new(stats)))
}

/// Per-day chart series for a trailing window, zero-filled
pub async fn daily_buckets(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<WindowQuery>,
) -> Result<Json<Envelope<Vec<DailyBucket>>>> {
    let days = window_days(&query)?;

    let db = state.db.clone();
    let (food, exercise, sleep) =
        tokio::task::spawn_blocking(move || db::load_all_logs(&db, &auth.user_id)).await??;

    let buckets = report::build_daily_buckets(&food, &exercise, &sleep, Utc::now(), days);
    Ok(Json(Envelope::new(buckets)))
}
