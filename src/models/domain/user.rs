use async_graphql::Enum;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::domain::{profile::UserProfile, progress::UserProgress};

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    /// Argon2 PHC string; carries its own salt and parameters.
    pub password_hash: String,
    #[serde(default)]
    pub role: UserRole,
    pub profile: UserProfile,
    pub progress: UserProgress,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, Enum, Copy)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[default]
    User,
    Admin,
}

impl User {
    /// A new account carries its profile and map progress from the start, so
    /// inserting the user document creates all three at once.
    pub fn new(
        username: &str,
        email: &str,
        password_hash: &str,
        profile: UserProfile,
        progress: UserProgress,
    ) -> Self {
        User {
            id: Uuid::new_v4().to_string(),
            username: username.to_string(),
            email: email.to_lowercase(),
            password_hash: password_hash.to_string(),
            role: UserRole::User,
            profile,
            progress,
            created_at: Some(Utc::now()),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

#[cfg(test)]
impl User {
    pub fn test_user(username: &str) -> Self {
        User::new(
            username,
            &format!("{}@example.com", username),
            "hash",
            UserProfile::default(),
            UserProgress::starting_at(None),
        )
    }
}
