use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};

use crate::constants::ERR_INVALID_EXPORT_KIND;
use crate::db;
use crate::error::{AppError, Result};
use crate::security::AuthUser;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    /// Which log stream to export: food, exercise, or sleep
    pub kind: String,
}

/// Render records as CSV with a header row derived from the field names
fn to_csv<T: Serialize>(rows: &[T]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    for row in rows {
        wtr.serialize(row)?;
    }
    let bytes = wtr
        .into_inner()
        .map_err(|e| AppError::Internal(anyhow::anyhow!("{}", e)))?;
    String::from_utf8(bytes).map_err(|e| AppError::Internal(anyhow::anyhow!("{}", e)))
}

/// Download one of the user's log streams as a CSV file
pub async fn export_logs(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ExportQuery>,
) -> Result<impl IntoResponse> {
    let db = state.db.clone();
    let user_id = auth.user_id;

    let body = match query.kind.as_str() {
        "food" => {
            let logs =
                tokio::task::spawn_blocking(move || db::load_food_logs(&db, &user_id)).await??;
            to_csv(&logs)?
        }
        "exercise" => {
            let logs =
                tokio::task::spawn_blocking(move || db::load_exercise_logs(&db, &user_id))
                    .await??;
            to_csv(&logs)?
        }
        "sleep" => {
            let logs =
                tokio::task::spawn_blocking(move || db::load_sleep_logs(&db, &user_id)).await??;
            to_csv(&logs)?
        }
        _ => return Err(AppError::InvalidInput(ERR_INVALID_EXPORT_KIND.to_string())),
    };

    tracing::info!("Exported {} logs as CSV", query.kind);

    let headers = [
        (
            header::CONTENT_TYPE,
            "text/csv; charset=utf-8".to_string(),
        ),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}-logs.csv\"", query.kind),
        ),
    ];
    Ok((headers, body))
}
