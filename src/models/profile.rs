use serde::{Deserialize, Serialize};

use super::user::UserRecord;

/// Extra profile fields stored separately from the core user record
///
/// Upserted as a whole on profile update; absent until the first update.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileRecord {
    pub phone: Option<String>,
    pub address: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    /// When the profile extras were last updated (Unix timestamp)
    pub updated_at: i64,
}

/// Joined user + profile view for API responses
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    /// When the user was created (Unix timestamp)
    pub created_at: i64,
}

impl Profile {
    /// Join the core user record with its optional profile extras
    pub fn join(id: &str, user: &UserRecord, extras: Option<&ProfileRecord>) -> Self {
        Self {
            id: id.to_string(),
            name: user.name.clone(),
            email: user.email.clone(),
            phone: extras.and_then(|p| p.phone.clone()),
            address: extras.and_then(|p| p.address.clone()),
            bio: extras.and_then(|p| p.bio.clone()),
            avatar_url: extras.and_then(|p| p.avatar_url.clone()),
            created_at: user.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_record() -> UserRecord {
        UserRecord {
            name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
            password_hash: "hash".to_string(),
            salt: "salt".to_string(),
            created_at: 1733788800,
        }
    }

    #[test]
    fn test_join_without_extras() {
        let profile = Profile::join("user-1", &user_record(), None);
        assert_eq!(profile.name, "Alice");
        assert!(profile.phone.is_none());
        assert!(profile.bio.is_none());
    }

    #[test]
    fn test_join_with_extras() {
        let extras = ProfileRecord {
            phone: Some("+62 812 0000".to_string()),
            address: None,
            bio: Some("Night owl".to_string()),
            avatar_url: None,
            updated_at: 1733788900,
        };
        let profile = Profile::join("user-1", &user_record(), Some(&extras));
        assert_eq!(profile.phone.as_deref(), Some("+62 812 0000"));
        assert_eq!(profile.bio.as_deref(), Some("Night owl"));
        assert!(profile.address.is_none());
    }
}
