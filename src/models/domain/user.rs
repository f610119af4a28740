use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct User {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[default]
    Student,
    Faculty,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Student => "student",
            UserRole::Faculty => "faculty",
        }
    }
}

impl User {
    pub fn new(
        first_name: &str,
        last_name: &str,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> Self {
        User {
            id: Uuid::new_v4().to_string(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            username: username.to_string(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            created_at: Some(Utc::now()),
        }
    }

    pub fn full_name(&self) -> String {
        let full = format!("{} {}", self.first_name, self.last_name);
        let trimmed = full.trim();
        if trimmed.is_empty() {
            self.username.clone()
        } else {
            trimmed.to_string()
        }
    }
}

#[cfg(test)]
impl User {
    pub fn test_user_simple(username: &str) -> Self {
        User::new(
            "Test",
            "User",
            username,
            &format!("{}@example.com", username),
            "not-a-real-hash",
        )
    }
}
