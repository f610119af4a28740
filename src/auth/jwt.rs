use jsonwebtoken::{
    decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation,
};
use secrecy::{ExposeSecret, SecretString};
use serde::{de::DeserializeOwned, Serialize};

use crate::{
    auth::claims::{Claims, RefreshClaims},
    errors::{AppError, AppResult},
    models::domain::user::{User, UserRole},
};

/// Signs and verifies the portal's HS256 tokens. Access and refresh tokens
/// share the key and differ in payload shape and lifetime.
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    access_hours: i64,
    refresh_hours: i64,
}

impl JwtService {
    pub fn new(secret: &SecretString, access_hours: i64, refresh_hours: i64) -> Self {
        let secret = secret.expose_secret().as_bytes();
        let mut validation = Validation::default();
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            access_hours,
            refresh_hours,
        }
    }

    pub fn refresh_hours(&self) -> i64 {
        self.refresh_hours
    }

    pub fn issue_access(&self, user: &User, role: UserRole, is_admin: bool) -> AppResult<String> {
        self.sign(&Claims::for_user(user, role, is_admin, self.access_hours))
    }

    pub fn issue_refresh(&self, user_id: &str) -> AppResult<String> {
        self.sign(&RefreshClaims::for_user(user_id, self.refresh_hours))
    }

    pub fn verify_access(&self, token: &str) -> AppResult<Claims> {
        self.verify(token, "Access token")
    }

    /// Access tokens lack the `typ` field and are rejected here.
    pub fn verify_refresh(&self, token: &str) -> AppResult<RefreshClaims> {
        self.verify(token, "Refresh token")
    }

    fn sign<T: Serialize>(&self, claims: &T) -> AppResult<String> {
        encode(&Header::default(), claims, &self.encoding_key)
            .map_err(|e| AppError::InternalError(format!("Failed to sign token: {}", e)))
    }

    fn verify<T: DeserializeOwned>(&self, token: &str, what: &str) -> AppResult<T> {
        decode::<T>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                let reason = match e.kind() {
                    ErrorKind::ExpiredSignature => "has expired".to_string(),
                    ErrorKind::InvalidSignature => "signature is invalid".to_string(),
                    _ => format!("is invalid: {}", e),
                };
                AppError::AuthenticationRequired(format!("{} {}", what, reason))
            })
    }
}
