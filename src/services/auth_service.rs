use std::sync::Arc;

use chrono::Utc;

use crate::{
    auth::{
        password::{hash_password, verify_password},
        JwtService,
    },
    config::Config,
    errors::{AppError, AppResult},
    models::domain::refresh_token::{hash_token, TokenState},
    models::domain::{user::UserRole, Profile, RefreshToken, User},
    models::dto::request::{LoginRequest, SignupRequest},
    models::dto::response::AuthResponse,
    repositories::{ProfileRepository, RefreshTokenRepository, UserRepository},
    services::profile_service::ProfileService,
};

pub struct AuthService {
    users: Arc<dyn UserRepository>,
    profiles: Arc<dyn ProfileRepository>,
    refresh_tokens: Arc<dyn RefreshTokenRepository>,
    profile_service: Arc<ProfileService>,
    jwt_service: Arc<JwtService>,
    config: Arc<Config>,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        profiles: Arc<dyn ProfileRepository>,
        refresh_tokens: Arc<dyn RefreshTokenRepository>,
        profile_service: Arc<ProfileService>,
        jwt_service: Arc<JwtService>,
        config: Arc<Config>,
    ) -> Self {
        Self {
            users,
            profiles,
            refresh_tokens,
            profile_service,
            jwt_service,
            config,
        }
    }

    pub async fn signup(&self, request: SignupRequest) -> AppResult<AuthResponse> {
        let username = request.username.trim().to_string();
        let email = request.email.trim().to_lowercase();

        if self.users.find_by_username(&username).await?.is_some() {
            return Err(AppError::Conflict("Username already taken".to_string()));
        }
        if self.users.find_by_email(&email).await?.is_some() {
            return Err(AppError::Conflict("Email already registered".to_string()));
        }

        let password_hash = hash_password(&request.password)?;
        let user = User::new(
            request.first_name.trim(),
            request.last_name.trim(),
            &username,
            &email,
            &password_hash,
        );
        let user = self.users.create(user).await?;

        let role = request.role.unwrap_or_default();
        let profile = self.profiles.create(Profile::new(&user.id, role)).await?;

        log::info!("Registered {} as {}", user.username, role.as_str());
        self.issue_tokens(user, profile.role).await
    }

    pub async fn login(&self, request: LoginRequest) -> AppResult<AuthResponse> {
        let invalid = || AppError::AuthenticationRequired("Invalid username or password".to_string());

        let user = self
            .users
            .find_by_username(request.username.trim())
            .await?
            .ok_or_else(invalid)?;

        if !verify_password(&request.password, &user.password_hash) {
            log::warn!("Failed login for {}", user.username);
            return Err(invalid());
        }

        let profile = self.profile_service.ensure_profile(&user.id).await?;
        log::info!("User {} logged in", user.username);
        self.issue_tokens(user, profile.role).await
    }

    /// Rotates the refresh token: the presented one is revoked and a new pair issued.
    /// Presenting an already rotated token revokes every token of that user.
    pub async fn refresh(&self, raw_token: &str) -> AppResult<AuthResponse> {
        let claims = self.jwt_service.verify_refresh(raw_token)?;

        let hash = hash_token(raw_token);
        let stored = self
            .refresh_tokens
            .find_by_token_hash(&hash)
            .await?
            .filter(|t| t.user_id == claims.sub)
            .ok_or_else(|| AppError::AuthenticationRequired("Unknown refresh token".to_string()))?;

        match stored.state_at(Utc::now()) {
            TokenState::Active => {}
            TokenState::Expired => {
                return Err(AppError::AuthenticationRequired(
                    "Refresh token has expired".to_string(),
                ));
            }
            TokenState::Revoked => {
                let revoked = self.refresh_tokens.revoke_all_for_user(&stored.user_id).await?;
                log::warn!(
                    "Rotated refresh token presented again for user {}; revoked {} tokens",
                    stored.user_id,
                    revoked
                );
                return Err(AppError::AuthenticationRequired(
                    "Refresh token has been revoked".to_string(),
                ));
            }
        }

        let user = self
            .users
            .find_by_id(&claims.sub)
            .await?
            .ok_or_else(|| {
                AppError::AuthenticationRequired(
                    "User associated with refresh token not found".to_string(),
                )
            })?;

        // a concurrent refresh with the same token may have rotated it first
        if !self.refresh_tokens.revoke(&hash).await? {
            return Err(AppError::AuthenticationRequired(
                "Refresh token has been revoked".to_string(),
            ));
        }
        let profile = self.profile_service.ensure_profile(&user.id).await?;

        log::info!("Token refreshed for user {}", user.username);
        self.issue_tokens(user, profile.role).await
    }

    /// Unknown or already revoked tokens are accepted silently.
    pub async fn logout(&self, raw_token: &str) -> AppResult<()> {
        self.refresh_tokens.revoke(&hash_token(raw_token)).await?;
        Ok(())
    }

    async fn issue_tokens(&self, user: User, role: UserRole) -> AppResult<AuthResponse> {
        let is_admin = self.config.is_admin_username(&user.username);
        let token = self.jwt_service.issue_access(&user, role, is_admin)?;
        let refresh_token = self.jwt_service.issue_refresh(&user.id)?;

        self.refresh_tokens
            .create(RefreshToken::issue(
                &user.id,
                &refresh_token,
                self.jwt_service.refresh_hours(),
            ))
            .await?;

        Ok(AuthResponse {
            token,
            refresh_token,
            user: user.into(),
            role,
            is_admin,
        })
    }
}
