use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, NaiveDate, Utc};
use redb::ReadableTable;
use serde::Deserialize;
use uuid::Uuid;

use crate::db::{self, tables, BINCODE_CONFIG};
use crate::error::{AppError, Result};
use crate::models::{SleepLog, SleepQuality};
use crate::routes::DeleteLogResponse;
use crate::security::AuthUser;
use crate::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSleepLogRequest {
    /// Calendar day the night is attributed to; defaults to today
    pub date: Option<NaiveDate>,
    pub sleep_start: Option<DateTime<Utc>>,
    pub wake_time: Option<DateTime<Utc>>,
    pub quality: Option<SleepQuality>,
}

/// Record a sleep entry for the authenticated user
///
/// Reversed or missing timestamps are stored as submitted; the report
/// engine excludes such entries from sleep averages instead of rejecting
/// them here.
pub async fn create_sleep_log(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateSleepLogRequest>,
) -> Result<(StatusCode, Json<SleepLog>)> {
    let now = Utc::now();
    let log = SleepLog {
        id: Uuid::new_v4().to_string(),
        user_id: auth.user_id,
        date: payload.date.unwrap_or_else(|| now.date_naive()),
        sleep_start: payload.sleep_start,
        wake_time: payload.wake_time,
        quality: payload.quality,
        created_at: now.timestamp(),
    };

    let db = state.db.clone();
    let stored = tokio::task::spawn_blocking(move || -> Result<SleepLog> {
        let write_txn = db.begin_write()?;
        {
            db::require_user(&write_txn, &log.user_id)?;
            db::check_write_rate(&write_txn, &log.user_id, log.created_at)?;

            let mut table = write_txn.open_table(tables::SLEEP_LOGS)?;
            let bytes = bincode::serde::encode_to_vec(&log, BINCODE_CONFIG)?;
            table.insert(log.id.as_str(), bytes.as_slice())?;
            drop(table);

            db::push_log_id(&write_txn, tables::USER_SLEEP_LOGS, &log.user_id, &log.id)?;
        }
        write_txn.commit()?;
        Ok(log)
    })
    .await??;

    tracing::info!("Sleep log stored");
    Ok((StatusCode::CREATED, Json(stored)))
}

/// List the user's sleep entries, newest first
pub async fn list_sleep_logs(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<SleepLog>>> {
    let db = state.db.clone();
    let logs =
        tokio::task::spawn_blocking(move || db::load_sleep_logs(&db, &auth.user_id)).await??;
    Ok(Json(logs))
}

/// Delete one sleep entry owned by the authenticated user
pub async fn delete_sleep_log(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<DeleteLogResponse>> {
    let db = state.db.clone();

    tokio::task::spawn_blocking(move || -> Result<()> {
        let write_txn = db.begin_write()?;
        {
            let mut table = write_txn.open_table(tables::SLEEP_LOGS)?;
            let log = table
                .get(id.as_str())?
                .map(|b| {
                    bincode::serde::decode_from_slice::<SleepLog, _>(b.value(), BINCODE_CONFIG)
                })
                .transpose()?
                .map(|(log, _)| log)
                .ok_or(AppError::LogNotFound)?;

            if log.user_id != auth.user_id {
                tracing::warn!("Delete attempt on another user's sleep log");
                return Err(AppError::LogNotFound);
            }
            table.remove(id.as_str())?;
            drop(table);

            db::remove_log_id(&write_txn, tables::USER_SLEEP_LOGS, &auth.user_id, &id)?;
        }
        write_txn.commit()?;
        Ok(())
    })
    .await??;

    Ok(Json(DeleteLogResponse {
        success: true,
        message: "Sleep log removed".to_string(),
    }))
}
