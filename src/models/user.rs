use serde::{Deserialize, Serialize};

use crate::constants::{MAX_EMAIL_LEN, MAX_NAME_LEN, MAX_PASSWORD_LEN, MIN_PASSWORD_LEN};

/// User record stored in redb
/// Uses Unix timestamps for compact storage with bincode
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    /// Display name
    pub name: String,
    /// Lowercased email address
    pub email: String,
    /// Salted, peppered SHA-256 digest of the password (hex)
    pub password_hash: String,
    /// Per-user random salt
    pub salt: String,
    /// When the user was created (Unix timestamp)
    pub created_at: i64,
}

/// User model for API responses (credential material stripped)
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// User ID (UUID v4)
    pub id: String,
    pub name: String,
    pub email: String,
    /// When the user was created (Unix timestamp)
    pub created_at: i64,
}

impl User {
    /// Build the public view of a stored record
    pub fn from_record(id: &str, record: &UserRecord) -> Self {
        Self {
            id: id.to_string(),
            name: record.name.clone(),
            email: record.email.clone(),
            created_at: record.created_at,
        }
    }

    /// Validate an email address: one '@' with non-empty local and domain parts
    pub fn validate_email(email: &str) -> bool {
        if email.is_empty() || email.len() > MAX_EMAIL_LEN {
            return false;
        }
        match email.split_once('@') {
            Some((local, domain)) => {
                !local.is_empty() && domain.contains('.') && !domain.starts_with('.')
            }
            None => false,
        }
    }

    /// Validate a display name: non-empty after trimming, bounded length
    pub fn validate_name(name: &str) -> bool {
        let trimmed = name.trim();
        !trimmed.is_empty() && trimmed.len() <= MAX_NAME_LEN
    }

    /// Validate password length bounds
    pub fn validate_password(password: &str) -> bool {
        (MIN_PASSWORD_LEN..=MAX_PASSWORD_LEN).contains(&password.len())
    }
}
