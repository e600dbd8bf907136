use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{NaiveDate, Utc};
use redb::ReadableTable;
use serde::Deserialize;
use uuid::Uuid;

use crate::constants::ERR_INVALID_NAME;
use crate::db::{self, tables, BINCODE_CONFIG};
use crate::error::{AppError, Result};
use crate::models::FoodLog;
use crate::openfoodfacts::CalorieEstimate;
use crate::routes::{DeleteLogResponse, Envelope};
use crate::security::AuthUser;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateFoodLogRequest {
    pub name: String,
    pub calories: Option<f64>,
    /// Calendar day; defaults to today when omitted
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct CalorieQueryRequest {
    pub name: String,
}

/// Record a food entry for the authenticated user
pub async fn create_food_log(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateFoodLogRequest>,
) -> Result<(StatusCode, Json<FoodLog>)> {
    FoodLog::validate(&payload.name, payload.calories)?;

    let now = Utc::now();
    let log = FoodLog {
        id: Uuid::new_v4().to_string(),
        user_id: auth.user_id,
        name: payload.name.trim().to_string(),
        calories: payload.calories,
        date: payload.date.unwrap_or_else(|| now.date_naive()),
        created_at: now.timestamp(),
    };

    let db = state.db.clone();
    let stored = tokio::task::spawn_blocking(move || -> Result<FoodLog> {
        let write_txn = db.begin_write()?;
        {
            db::require_user(&write_txn, &log.user_id)?;
            db::check_write_rate(&write_txn, &log.user_id, log.created_at)?;

            let mut table = write_txn.open_table(tables::FOOD_LOGS)?;
            let bytes = bincode::serde::encode_to_vec(&log, BINCODE_CONFIG)?;
            table.insert(log.id.as_str(), bytes.as_slice())?;
            drop(table);

            db::push_log_id(&write_txn, tables::USER_FOOD_LOGS, &log.user_id, &log.id)?;
        }
        write_txn.commit()?;
        Ok(log)
    })
    .await??;

    tracing::info!("Food log stored");
    Ok((StatusCode::CREATED, Json(stored)))
}

/// List the user's food entries, newest first
pub async fn list_food_logs(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<FoodLog>>> {
    let db = state.db.clone();
    let logs =
        tokio::task::spawn_blocking(move || db::load_food_logs(&db, &auth.user_id)).await??;
    Ok(Json(logs))
}

/// Delete one food entry owned by the authenticated user
///
/// Entries belonging to other users read as absent.
pub async fn delete_food_log(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<DeleteLogResponse>> {
    let db = state.db.clone();

    tokio::task::spawn_blocking(move || -> Result<()> {
        let write_txn = db.begin_write()?;
        {
            let mut table = write_txn.open_table(tables::FOOD_LOGS)?;
            let log = table
                .get(id.as_str())?
                .map(|b| bincode::serde::decode_from_slice::<FoodLog, _>(b.value(), BINCODE_CONFIG))
                .transpose()?
                .map(|(log, _)| log)
                .ok_or(AppError::LogNotFound)?;

            if log.user_id != auth.user_id {
                tracing::warn!("Delete attempt on another user's food log");
                return Err(AppError::LogNotFound);
            }
            table.remove(id.as_str())?;
            drop(table);

            db::remove_log_id(&write_txn, tables::USER_FOOD_LOGS, &auth.user_id, &id)?;
        }
        write_txn.commit()?;
        Ok(())
    })
    .await??;

    Ok(Json(DeleteLogResponse {
        success: true,
        message: "Food log removed".to_string(),
    }))
}

/// Estimate calories for a food name via OpenFoodFacts
pub async fn estimate_calories(
    State(state): State<AppState>,
    _auth: AuthUser,
    Json(payload): Json<CalorieQueryRequest>,
) -> Result<Json<Envelope<CalorieEstimate>>> {
    let query = payload.name.trim();
    if query.is_empty() {
        return Err(AppError::InvalidInput(ERR_INVALID_NAME.to_string()));
    }

    let estimate = state
        .off
        .estimate_calories(query)
        .await
        .map_err(|e| AppError::LookupFailed(e.to_string()))?
        .ok_or(AppError::NoCalorieData)?;

    Ok(Json(Envelope::new(estimate)))
}
