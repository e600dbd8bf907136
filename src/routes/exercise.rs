use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{NaiveDate, Utc};
use redb::ReadableTable;
use serde::Deserialize;
use uuid::Uuid;

use crate::db::{self, tables, BINCODE_CONFIG};
use crate::error::{AppError, Result};
use crate::models::ExerciseLog;
use crate::routes::DeleteLogResponse;
use crate::security::AuthUser;
use crate::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateExerciseLogRequest {
    pub activity: String,
    pub duration_minutes: Option<f64>,
    pub calories_burned: Option<f64>,
    /// Calendar day; defaults to today when omitted
    pub date: Option<NaiveDate>,
}

/// Record an exercise entry for the authenticated user
pub async fn create_exercise_log(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateExerciseLogRequest>,
) -> Result<(StatusCode, Json<ExerciseLog>)> {
    ExerciseLog::validate(
        &payload.activity,
        payload.duration_minutes,
        payload.calories_burned,
    )?;

    let now = Utc::now();
    let log = ExerciseLog {
        id: Uuid::new_v4().to_string(),
        user_id: auth.user_id,
        activity: payload.activity.trim().to_string(),
        duration_minutes: payload.duration_minutes,
        calories_burned: payload.calories_burned,
        date: payload.date.unwrap_or_else(|| now.date_naive()),
        created_at: now.timestamp(),
    };

    let db = state.db.clone();
    let stored = tokio::task::spawn_blocking(move || -> Result<ExerciseLog> {
        let write_txn = db.begin_write()?;
        {
            db::require_user(&write_txn, &log.user_id)?;
            db::check_write_rate(&write_txn, &log.user_id, log.created_at)?;

            let mut table = write_txn.open_table(tables::EXERCISE_LOGS)?;
            let bytes = bincode::serde::encode_to_vec(&log, BINCODE_CONFIG)?;
            table.insert(log.id.as_str(), bytes.as_slice())?;
            drop(table);

            db::push_log_id(&write_txn, tables::USER_EXERCISE_LOGS, &log.user_id, &log.id)?;
        }
        write_txn.commit()?;
        Ok(log)
    })
    .await??;

    tracing::info!("Exercise log stored");
    Ok((StatusCode::CREATED, Json(stored)))
}

/// List the user's exercise entries, newest first
pub async fn list_exercise_logs(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<ExerciseLog>>> {
    let db = state.db.clone();
    let logs =
        tokio::task::spawn_blocking(move || db::load_exercise_logs(&db, &auth.user_id)).await??;
    Ok(Json(logs))
}

/// Delete one exercise entry owned by the authenticated user
pub async fn delete_exercise_log(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<DeleteLogResponse>> {
    let db = state.db.clone();

    tokio::task::spawn_blocking(move || -> Result<()> {
        let write_txn = db.begin_write()?;
        {
            let mut table = write_txn.open_table(tables::EXERCISE_LOGS)?;
            let log = table
                .get(id.as_str())?
                .map(|b| {
                    bincode::serde::decode_from_slice::<ExerciseLog, _>(b.value(), BINCODE_CONFIG)
                })
                .transpose()?
                .map(|(log, _)| log)
                .ok_or(AppError::LogNotFound)?;

            if log.user_id != auth.user_id {
                tracing::warn!("Delete attempt on another user's exercise log");
                return Err(AppError::LogNotFound);
            }
            table.remove(id.as_str())?;
            drop(table);

            db::remove_log_id(&write_txn, tables::USER_EXERCISE_LOGS, &auth.user_id, &id)?;
        }
        write_txn.commit()?;
        Ok(())
    })
    .await??;

    Ok(Json(DeleteLogResponse {
        success: true,
        message: "Exercise log removed".to_string(),
    }))
}
