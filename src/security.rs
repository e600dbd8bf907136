use axum::{extract::FromRequestParts, http::header, http::request::Parts};
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

use crate::error::{AppError, Result};
use crate::AppState;

type HmacSha256 = Hmac<Sha256>;

// =============================================================================
// Password Digests (Pepper + Salt)
// =============================================================================

/// Generate a random per-user salt
pub fn generate_salt() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// Digest a password with the server-side pepper and a per-user salt
///
/// The pepper lives in an environment variable, not in the database, so a
/// database breach alone is not enough to mount an offline dictionary attack.
///
/// # Algorithm
/// `digest = SHA256(password + pepper + salt)`
pub fn hash_password(password: &str, pepper: &str, salt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    hasher.update(pepper.as_bytes());
    hasher.update(salt.as_bytes());
    hex::encode(hasher.finalize())
}

/// Verify a password against a stored digest
pub fn verify_password(password: &str, pepper: &str, salt: &str, expected: &str) -> bool {
    let computed = hash_password(password, pepper, salt);

    // Compare digests of the digests so the comparison length never depends
    // on the stored value.
    let a = Sha256::digest(computed.as_bytes());
    let b = Sha256::digest(expected.as_bytes());
    a == b
}

// =============================================================================
// Bearer Tokens (HMAC-SHA256, expiring)
// =============================================================================

/// Verify HMAC-SHA256 signature
///
/// # Arguments
/// * `data` - The data that was signed
/// * `signature` - The hex-encoded HMAC signature
/// * `secret` - The signing key (from environment)
pub fn verify_hmac(data: &str, signature: &str, secret: &str) -> bool {
    // Create HMAC instance with secret key
    let mut mac = match HmacSha256::new_from_slice(secret.as_bytes()) {
        Ok(m) => m,
        Err(_) => {
            tracing::error!("Failed to create HMAC instance");
            return false;
        }
    };

    // Update with data
    mac.update(data.as_bytes());

    // Decode hex signature
    let sig_bytes = match hex::decode(signature) {
        Ok(bytes) => bytes,
        Err(_) => {
            tracing::warn!("Invalid hex signature format");
            return false;
        }
    };

    // Verify signature
    mac.verify_slice(&sig_bytes).is_ok()
}

/// Sign a bearer token for a user
///
/// Token layout: `{user_id}.{expires_at}.{hex(HMAC-SHA256(user_id.expires_at))}`.
/// User ids are UUIDs and never contain '.', so the layout parses
/// unambiguously.
pub fn sign_token(user_id: &str, expires_at: i64, secret: &str) -> String {
    let payload = format!("{}.{}", user_id, expires_at);
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .expect("HMAC accepts keys of any length");
    mac.update(payload.as_bytes());
    let signature = hex::encode(mac.finalize().into_bytes());
    format!("{}.{}", payload, signature)
}

/// Verify a bearer token and extract the user id
///
/// Returns None for malformed, tampered, or expired tokens.
pub fn verify_token(token: &str, secret: &str, now: i64) -> Option<String> {
    let mut parts = token.split('.');
    let user_id = parts.next()?;
    let expires_at: i64 = parts.next()?.parse().ok()?;
    let signature = parts.next()?;
    if parts.next().is_some() {
        return None;
    }

    let payload = format!("{}.{}", user_id, expires_at);
    if !verify_hmac(&payload, signature, secret) {
        tracing::warn!("Invalid token signature");
        return None;
    }

    if expires_at <= now {
        tracing::debug!("Expired token presented");
        return None;
    }

    Some(user_id.to_string())
}

// =============================================================================
// Request Extraction
// =============================================================================

/// Authenticated user identity, extracted from the Authorization header
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: String,
}

#[axum::async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self> {
        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .ok_or(AppError::MissingToken)?;

        let now = chrono::Utc::now().timestamp();
        let user_id = verify_token(token, &state.config.auth_secret_key, now)
            .ok_or(AppError::InvalidToken)?;

        Ok(AuthUser { user_id })
    }
}
