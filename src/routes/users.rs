use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use redb::ReadableTable;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::{ERR_INVALID_EMAIL, ERR_INVALID_NAME, ERR_INVALID_PASSWORD};
use crate::db::{self, tables, BINCODE_CONFIG};
use crate::error::{AppError, Result};
use crate::models::{User, UserRecord};
use crate::security::{generate_salt, hash_password, sign_token, verify_password, AuthUser};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub success: bool,
    pub user: User,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Deserialize)]
pub struct DeleteUserRequest {
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct DeleteUserResponse {
    pub success: bool,
    pub message: String,
}

/// Register a new user
///
/// Stores a salted, peppered password digest, never the password itself.
/// The pepper comes from the environment, so a database breach alone is not
/// enough for an offline dictionary attack.
///
/// Returns 409 Conflict if the email is already registered.
pub async fn register_user(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>)> {
    if !User::validate_name(&payload.name) {
        return Err(AppError::InvalidInput(ERR_INVALID_NAME.to_string()));
    }
    let email = payload.email.trim().to_lowercase();
    if !User::validate_email(&email) {
        return Err(AppError::InvalidInput(ERR_INVALID_EMAIL.to_string()));
    }
    if !User::validate_password(&payload.password) {
        return Err(AppError::InvalidInput(ERR_INVALID_PASSWORD.to_string()));
    }

    let user_id = Uuid::new_v4().to_string();
    let salt = generate_salt();
    let record = UserRecord {
        name: payload.name.trim().to_string(),
        email: email.clone(),
        password_hash: hash_password(&payload.password, &state.config.password_pepper, &salt),
        salt,
        created_at: Utc::now().timestamp(),
    };

    let db = state.db.clone();
    let user = tokio::task::spawn_blocking(move || -> Result<User> {
        let write_txn = db.begin_write()?;
        {
            let mut emails = write_txn.open_table(tables::USERS_BY_EMAIL)?;

            // Reject duplicate registrations by email
            if emails.get(email.as_str())?.is_some() {
                tracing::info!("Registration attempt with existing email");
                return Err(AppError::EmailTaken);
            }
            emails.insert(email.as_str(), user_id.as_str())?;
            drop(emails);

            let mut users = write_txn.open_table(tables::USERS)?;
            let bytes = bincode::serde::encode_to_vec(&record, BINCODE_CONFIG)?;
            users.insert(user_id.as_str(), bytes.as_slice())?;
        }
        write_txn.commit()?;

        tracing::info!("New user registered");
        Ok(User::from_record(&user_id, &record))
    })
    .await??;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            success: true,
            user,
        }),
    ))
}

/// Log a user in and issue a bearer token
///
/// The response body mirrors the registration view of the user; the token
/// expires after the configured TTL. Unknown emails and wrong passwords
/// yield the same error so accounts cannot be enumerated.
pub async fn login_user(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    let email = payload.email.trim().to_lowercase();

    let db = state.db.clone();
    let found = tokio::task::spawn_blocking(move || -> Result<(String, UserRecord)> {
        let read_txn = db.begin_read()?;

        let emails = read_txn.open_table(tables::USERS_BY_EMAIL)?;
        let user_id = emails
            .get(email.as_str())?
            .map(|g| g.value().to_string())
            .ok_or(AppError::InvalidCredentials)?;

        let users = read_txn.open_table(tables::USERS)?;
        let record = users
            .get(user_id.as_str())?
            .map(|b| bincode::serde::decode_from_slice::<UserRecord, _>(b.value(), BINCODE_CONFIG))
            .transpose()?
            .map(|(record, _)| record)
            .ok_or(AppError::InvalidCredentials)?;

        Ok((user_id, record))
    })
    .await??;

    let (user_id, record) = found;
    if !verify_password(
        &payload.password,
        &state.config.password_pepper,
        &record.salt,
        &record.password_hash,
    ) {
        tracing::warn!("Failed login attempt");
        return Err(AppError::InvalidCredentials);
    }

    let expires_at = Utc::now().timestamp() + state.config.token_ttl_secs;
    let token = sign_token(&user_id, expires_at, &state.config.auth_secret_key);

    tracing::info!("User logged in");

    Ok(Json(LoginResponse {
        token,
        user: User::from_record(&user_id, &record),
    }))
}

/// Delete user and all associated data
///
/// This endpoint permanently deletes:
/// - User record and email index entry
/// - All food, exercise, and sleep logs
/// - Profile extras
/// - Rate limit records
///
/// Requires the account password in the request body to prove ownership
/// beyond the bearer token.
///
/// # Note
/// This action is irreversible.
pub async fn delete_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<DeleteUserRequest>,
) -> Result<Json<DeleteUserResponse>> {
    let db = state.db.clone();
    let pepper = state.config.password_pepper.clone();
    let user_id = auth.user_id;
    let password = payload.password;

    tokio::task::spawn_blocking(move || -> Result<()> {
        let write_txn = db.begin_write()?;
        {
            // 1. Load the user and verify the password (proves account ownership)
            let mut users = write_txn.open_table(tables::USERS)?;
            let record = users
                .get(user_id.as_str())?
                .map(|b| {
                    bincode::serde::decode_from_slice::<UserRecord, _>(b.value(), BINCODE_CONFIG)
                })
                .transpose()?
                .map(|(record, _)| record)
                .ok_or(AppError::UserNotFound)?;

            if !verify_password(&password, &pepper, &record.salt, &record.password_hash) {
                tracing::warn!("Account deletion attempt with wrong password");
                return Err(AppError::InvalidCredentials);
            }

            // 2. Delete all logs of each kind via the per-user indexes
            let log_tables = [
                (tables::USER_FOOD_LOGS, tables::FOOD_LOGS),
                (tables::USER_EXERCISE_LOGS, tables::EXERCISE_LOGS),
                (tables::USER_SLEEP_LOGS, tables::SLEEP_LOGS),
            ];
            for (index_def, table_def) in log_tables {
                let mut index = write_txn.open_table(index_def)?;
                let ids = match index.get(user_id.as_str())? {
                    Some(bytes) => db::decode_ids(bytes.value()),
                    None => Vec::new(),
                };

                let mut table = write_txn.open_table(table_def)?;
                for id in &ids {
                    table.remove(id.as_str())?;
                }
                drop(table);

                index.remove(user_id.as_str())?;
            }

            // 3. Delete profile extras
            let mut profiles = write_txn.open_table(tables::PROFILES)?;
            profiles.remove(user_id.as_str())?;
            drop(profiles);

            // 4. Delete rate limits
            let mut rate_limits = write_txn.open_table(tables::RATE_LIMITS)?;
            rate_limits.remove(user_id.as_str())?;
            drop(rate_limits);

            // 5. Delete the email index entry and the user record
            let mut emails = write_txn.open_table(tables::USERS_BY_EMAIL)?;
            emails.remove(record.email.as_str())?;
            drop(emails);

            users.remove(user_id.as_str())?;
        }
        write_txn.commit()?;

        tracing::info!("User and all associated data deleted");
        Ok(())
    })
    .await??;

    Ok(Json(DeleteUserResponse {
        success: true,
        message: "User and all associated data permanently deleted".to_string(),
    }))
}
