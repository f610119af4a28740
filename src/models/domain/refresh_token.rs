use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Server-side record of an issued refresh token. The raw token never leaves
/// the response body; only its SHA-256 is kept.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct RefreshToken {
    pub user_id: String,
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub revoked: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenState {
    Active,
    Expired,
    /// Already rotated or logged out.
    Revoked,
}

impl RefreshToken {
    pub fn issue(user_id: &str, raw_token: &str, lifetime_hours: i64) -> Self {
        let created_at = Utc::now();
        Self {
            user_id: user_id.to_string(),
            token_hash: hash_token(raw_token),
            expires_at: created_at + Duration::hours(lifetime_hours),
            created_at,
            revoked: false,
        }
    }

    /// Revocation wins over expiry so a replayed token is always recognised.
    pub fn state_at(&self, now: DateTime<Utc>) -> TokenState {
        if self.revoked {
            TokenState::Revoked
        } else if self.expires_at <= now {
            TokenState::Expired
        } else {
            TokenState::Active
        }
    }
}

/// Lowercase hex SHA-256, the lookup key for stored tokens.
pub fn hash_token(raw_token: &str) -> String {
    hex_digest(&Sha256::digest(raw_token.as_bytes()))
}

fn hex_digest(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}
