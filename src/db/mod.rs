pub mod tables;

use redb::{Database, Error as RedbError, ReadTransaction, ReadableTable, TableDefinition, WriteTransaction};
use serde::de::DeserializeOwned;
use std::path::Path;
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::models::{ExerciseLog, FoodLog, RateLimitRecord, SleepLog};

/// Database handle type (Arc-wrapped for sharing across handlers)
pub type Db = Arc<Database>;

/// Bincode configuration shared by every table codec
pub const BINCODE_CONFIG: bincode::config::Configuration = bincode::config::standard();

/// Open or create the redb database at the given path
///
/// Creates all required tables on first run.
#[allow(clippy::result_large_err)]
pub fn open_database(path: impl AsRef<Path>) -> std::result::Result<Db, RedbError> {
    tracing::info!("Opening database at: {:?}", path.as_ref());

    // Create parent directory if it doesn't exist
    if let Some(parent) = path.as_ref().parent() {
        if !parent.exists() {
            std::fs::create_dir_all(parent).map_err(|e| {
                tracing::error!("Failed to create database directory: {}", e);
                RedbError::Io(e)
            })?;
        }
    }

    let db = Database::create(path)?;

    // Initialize tables on first run
    let write_txn = db.begin_write()?;
    {
        // Create tables if they don't exist by opening them
        let _ = write_txn.open_table(tables::USERS)?;
        let _ = write_txn.open_table(tables::USERS_BY_EMAIL)?;
        let _ = write_txn.open_table(tables::FOOD_LOGS)?;
        let _ = write_txn.open_table(tables::EXERCISE_LOGS)?;
        let _ = write_txn.open_table(tables::SLEEP_LOGS)?;
        let _ = write_txn.open_table(tables::USER_FOOD_LOGS)?;
        let _ = write_txn.open_table(tables::USER_EXERCISE_LOGS)?;
        let _ = write_txn.open_table(tables::USER_SLEEP_LOGS)?;
        let _ = write_txn.open_table(tables::PROFILES)?;
        let _ = write_txn.open_table(tables::RATE_LIMITS)?;
    }
    write_txn.commit()?;

    tracing::info!("Database initialized successfully");

    Ok(Arc::new(db))
}

/// Decode a per-user id index value, treating corruption as an empty list
pub(crate) fn decode_ids(bytes: &[u8]) -> Vec<String> {
    bincode::serde::decode_from_slice::<Vec<String>, _>(bytes, BINCODE_CONFIG)
        .map(|(ids, _)| ids)
        .unwrap_or_default()
}

/// Fetch every log of one kind for a user via its id index
fn read_logs<T: DeserializeOwned>(
    txn: &ReadTransaction,
    index: TableDefinition<&str, &[u8]>,
    table: TableDefinition<&str, &[u8]>,
    user_id: &str,
) -> Result<Vec<T>> {
    let index = txn.open_table(index)?;
    let ids = match index.get(user_id)? {
        Some(bytes) => decode_ids(bytes.value()),
        None => Vec::new(),
    };

    let table = txn.open_table(table)?;
    let mut logs = Vec::with_capacity(ids.len());
    for id in &ids {
        if let Some(bytes) = table.get(id.as_str())? {
            let (log, _) = bincode::serde::decode_from_slice(bytes.value(), BINCODE_CONFIG)?;
            logs.push(log);
        }
    }
    Ok(logs)
}

fn food_logs_in(txn: &ReadTransaction, user_id: &str) -> Result<Vec<FoodLog>> {
    let mut logs: Vec<FoodLog> =
        read_logs(txn, tables::USER_FOOD_LOGS, tables::FOOD_LOGS, user_id)?;
    logs.sort_by(|a, b| b.date.cmp(&a.date).then(b.created_at.cmp(&a.created_at)));
    Ok(logs)
}

fn exercise_logs_in(txn: &ReadTransaction, user_id: &str) -> Result<Vec<ExerciseLog>> {
    let mut logs: Vec<ExerciseLog> =
        read_logs(txn, tables::USER_EXERCISE_LOGS, tables::EXERCISE_LOGS, user_id)?;
    logs.sort_by(|a, b| b.date.cmp(&a.date).then(b.created_at.cmp(&a.created_at)));
    Ok(logs)
}

fn sleep_logs_in(txn: &ReadTransaction, user_id: &str) -> Result<Vec<SleepLog>> {
    let mut logs: Vec<SleepLog> =
        read_logs(txn, tables::USER_SLEEP_LOGS, tables::SLEEP_LOGS, user_id)?;
    logs.sort_by(|a, b| b.date.cmp(&a.date).then(b.created_at.cmp(&a.created_at)));
    Ok(logs)
}

/// Load a user's food logs, newest first
pub fn load_food_logs(db: &Database, user_id: &str) -> Result<Vec<FoodLog>> {
    let txn = db.begin_read()?;
    food_logs_in(&txn, user_id)
}

/// Load a user's exercise logs, newest first
pub fn load_exercise_logs(db: &Database, user_id: &str) -> Result<Vec<ExerciseLog>> {
    let txn = db.begin_read()?;
    exercise_logs_in(&txn, user_id)
}

/// Load a user's sleep logs, newest first
pub fn load_sleep_logs(db: &Database, user_id: &str) -> Result<Vec<SleepLog>> {
    let txn = db.begin_read()?;
    sleep_logs_in(&txn, user_id)
}

/// Load all three log streams for a user in a single read transaction
///
/// The report endpoints consume these as read-only inputs.
pub fn load_all_logs(
    db: &Database,
    user_id: &str,
) -> Result<(Vec<FoodLog>, Vec<ExerciseLog>, Vec<SleepLog>)> {
    let txn = db.begin_read()?;
    Ok((
        food_logs_in(&txn, user_id)?,
        exercise_logs_in(&txn, user_id)?,
        sleep_logs_in(&txn, user_id)?,
    ))
}

/// Verify a user record exists inside a write transaction
pub fn require_user(txn: &WriteTransaction, user_id: &str) -> Result<()> {
    let users = txn.open_table(tables::USERS)?;
    if users.get(user_id)?.is_none() {
        tracing::warn!("Request for non-existent user");
        return Err(AppError::UserNotFound);
    }
    Ok(())
}

/// Check and bump the per-user write rate counters
///
/// Returns Err(RateLimitExceeded) when the hourly or daily cap is hit.
pub fn check_write_rate(txn: &WriteTransaction, user_id: &str, now: i64) -> Result<()> {
    let mut rate_limits = txn.open_table(tables::RATE_LIMITS)?;
    let mut record = match rate_limits.get(user_id)? {
        Some(bytes) => {
            bincode::serde::decode_from_slice::<RateLimitRecord, _>(bytes.value(), BINCODE_CONFIG)?
                .0
        }
        None => RateLimitRecord::new(now),
    };

    record.check_and_increment(now)?;

    let bytes = bincode::serde::encode_to_vec(&record, BINCODE_CONFIG)?;
    rate_limits.insert(user_id, bytes.as_slice())?;
    Ok(())
}

/// Append a log id to a per-user index table
pub fn push_log_id(
    txn: &WriteTransaction,
    index: TableDefinition<&str, &[u8]>,
    user_id: &str,
    log_id: &str,
) -> Result<()> {
    let mut table = txn.open_table(index)?;
    let mut ids = match table.get(user_id)? {
        Some(bytes) => decode_ids(bytes.value()),
        None => Vec::new(),
    };

    if !ids.iter().any(|id| id == log_id) {
        ids.push(log_id.to_string());
        let bytes = bincode::serde::encode_to_vec(&ids, BINCODE_CONFIG)?;
        table.insert(user_id, bytes.as_slice())?;
    }
    Ok(())
}

/// Drop a log id from a per-user index table
pub fn remove_log_id(
    txn: &WriteTransaction,
    index: TableDefinition<&str, &[u8]>,
    user_id: &str,
    log_id: &str,
) -> Result<()> {
    let mut table = txn.open_table(index)?;
    let mut ids = match table.get(user_id)? {
        Some(bytes) => decode_ids(bytes.value()),
        None => Vec::new(),
    };

    ids.retain(|id| id != log_id);
    let bytes = bincode::serde::encode_to_vec(&ids, BINCODE_CONFIG)?;
    table.insert(user_id, bytes.as_slice())?;
    Ok(())
}
