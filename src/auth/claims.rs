use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::models::domain::user::{User, UserRole};

/// Payload of an access token. It carries everything `Caller` needs, so an
/// authenticated request never touches the user store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub username: String,
    pub role: UserRole,
    #[serde(default)]
    pub is_admin: bool,
    pub exp: usize,
    pub iat: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Refresh,
}

/// Payload of a refresh token. `jti` makes every issued token unique.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshClaims {
    pub sub: String,
    #[serde(rename = "typ")]
    pub kind: TokenKind,
    pub jti: String,
    pub exp: usize,
    pub iat: usize,
}

/// (issued-at, expiry) as unix seconds for a token valid for `hours`.
fn validity(hours: i64) -> (usize, usize) {
    let now = Utc::now();
    let expires = now + Duration::hours(hours);
    (now.timestamp() as usize, expires.timestamp() as usize)
}

impl Claims {
    pub fn for_user(user: &User, role: UserRole, is_admin: bool, hours: i64) -> Self {
        let (iat, exp) = validity(hours);
        Self {
            sub: user.id.clone(),
            username: user.username.clone(),
            role,
            is_admin,
            exp,
            iat,
        }
    }
}

impl RefreshClaims {
    pub fn for_user(user_id: &str, hours: i64) -> Self {
        let (iat, exp) = validity(hours);
        Self {
            sub: user_id.to_string(),
            kind: TokenKind::Refresh,
            jti: uuid::Uuid::new_v4().to_string(),
            exp,
            iat,
        }
    }
}
