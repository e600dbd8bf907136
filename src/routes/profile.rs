use axum::{extract::State, Json};
use chrono::Utc;
use redb::ReadableTable;
use serde::{Deserialize, Serialize};

use crate::constants::{ERR_INVALID_EMAIL, ERR_INVALID_NAME};
use crate::db::{tables, BINCODE_CONFIG};
use crate::error::{AppError, Result};
use crate::models::{Profile, ProfileRecord, User, UserRecord};
use crate::routes::Envelope;
use crate::security::AuthUser;
use crate::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UpdateProfileResponse {
    pub success: bool,
    pub message: String,
    pub data: Profile,
}

/// Fetch the joined user + profile view for the authenticated user
pub async fn get_profile(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Envelope<Profile>>> {
    let db = state.db.clone();
    let user_id = auth.user_id;

    let profile = tokio::task::spawn_blocking(move || -> Result<Profile> {
        let read_txn = db.begin_read()?;

        let users = read_txn.open_table(tables::USERS)?;
        let record = users
            .get(user_id.as_str())?
            .map(|b| bincode::serde::decode_from_slice::<UserRecord, _>(b.value(), BINCODE_CONFIG))
            .transpose()?
            .map(|(record, _)| record)
            .ok_or(AppError::ProfileNotFound)?;

        let profiles = read_txn.open_table(tables::PROFILES)?;
        let extras = profiles
            .get(user_id.as_str())?
            .map(|b| {
                bincode::serde::decode_from_slice::<ProfileRecord, _>(b.value(), BINCODE_CONFIG)
            })
            .transpose()?
            .map(|(extras, _)| extras);

        Ok(Profile::join(&user_id, &record, extras.as_ref()))
    })
    .await??;

    Ok(Json(Envelope::new(profile)))
}

/// Update the core user fields and upsert the profile extras
///
/// Name and email are required; the remaining fields replace the stored
/// extras wholesale. Changing the email keeps the email index consistent
/// and rejects addresses already registered to another account.
pub async fn update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Json<UpdateProfileResponse>> {
    if !User::validate_name(&payload.name) {
        return Err(AppError::InvalidInput(ERR_INVALID_NAME.to_string()));
    }
    let new_email = payload.email.trim().to_lowercase();
    if !User::validate_email(&new_email) {
        return Err(AppError::InvalidInput(ERR_INVALID_EMAIL.to_string()));
    }

    let db = state.db.clone();
    let user_id = auth.user_id;

    let profile = tokio::task::spawn_blocking(move || -> Result<Profile> {
        let now = Utc::now().timestamp();

        let write_txn = db.begin_write()?;
        let profile = {
            let mut users = write_txn.open_table(tables::USERS)?;
            let mut record = users
                .get(user_id.as_str())?
                .map(|b| {
                    bincode::serde::decode_from_slice::<UserRecord, _>(b.value(), BINCODE_CONFIG)
                })
                .transpose()?
                .map(|(record, _)| record)
                .ok_or(AppError::ProfileNotFound)?;

            // Keep the email index consistent on address changes
            if new_email != record.email {
                let mut emails = write_txn.open_table(tables::USERS_BY_EMAIL)?;
                if emails.get(new_email.as_str())?.is_some() {
                    return Err(AppError::EmailTaken);
                }
                emails.remove(record.email.as_str())?;
                emails.insert(new_email.as_str(), user_id.as_str())?;
            }

            record.name = payload.name.trim().to_string();
            record.email = new_email;
            let bytes = bincode::serde::encode_to_vec(&record, BINCODE_CONFIG)?;
            users.insert(user_id.as_str(), bytes.as_slice())?;

            let extras = ProfileRecord {
                phone: payload.phone,
                address: payload.address,
                bio: payload.bio,
                avatar_url: payload.avatar_url,
                updated_at: now,
            };
            let mut profiles = write_txn.open_table(tables::PROFILES)?;
            let bytes = bincode::serde::encode_to_vec(&extras, BINCODE_CONFIG)?;
            profiles.insert(user_id.as_str(), bytes.as_slice())?;

            Profile::join(&user_id, &record, Some(&extras))
        };
        write_txn.commit()?;

        tracing::info!("Profile updated");
        Ok(profile)
    })
    .await??;

    Ok(Json(UpdateProfileResponse {
        success: true,
        message: "Profile updated".to_string(),
        data: profile,
    }))
}
