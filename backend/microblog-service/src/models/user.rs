use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Full user row. `password_hash` never leaves the service; API responses
/// use [`UserProfile`] or [`UserSummary`] projections instead.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub about_me: Option<String>,
    pub last_seen: Option<DateTime<Utc>>,
    pub last_message_read_time: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Gravatar URL for the user's avatar, derived from the md5 digest of
    /// the lowercased email address.
    pub fn avatar_url(&self, size: u32) -> String {
        let digest = format!("{:x}", md5::compute(self.email.to_lowercase().as_bytes()));
        format!("https://www.gravatar.com/avatar/{digest}?d=retro&s={size}")
    }
}

/// Profile view of a user, including live follower/following counts
#[derive(Debug, Serialize, ToSchema)]
pub struct UserProfile {
    pub id: Uuid,
    pub username: String,
    pub about_me: Option<String>,
    pub avatar_url: String,
    pub last_seen: Option<DateTime<Utc>>,
    pub follower_count: i64,
    pub following_count: i64,
    pub post_count: i64,
    /// Whether the requesting user follows this user; absent on own profile
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_following: Option<bool>,
}

/// Compact user representation used in follower/following listings
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserSummary {
    pub id: Uuid,
    pub username: String,
    pub about_me: Option<String>,
    pub avatar_url: String,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            about_me: user.about_me.clone(),
            avatar_url: user.avatar_url(128),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_user(email: &str) -> User {
        User {
            id: Uuid::new_v4(),
            username: "john".to_string(),
            email: email.to_string(),
            password_hash: String::new(),
            about_me: None,
            last_seen: None,
            last_message_read_time: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_avatar_url_uses_lowercased_email_digest() {
        // md5("john@example.com") = d4c74594d841139328695756648b6bd6
        let user = test_user("John@Example.com");
        assert_eq!(
            user.avatar_url(128),
            "https://www.gravatar.com/avatar/d4c74594d841139328695756648b6bd6?d=retro&s=128"
        );
    }

    #[test]
    fn test_avatar_url_size_parameter() {
        let user = test_user("john@example.com");
        assert!(user.avatar_url(36).ends_with("s=36"));
    }
}
