use crate::{
    auth::Claims,
    errors::{AppError, AppResult},
    models::domain::user::UserRole,
};

/// The authenticated user as every handler sees it. Role and admin capability are
/// fixed when the token is issued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub user_id: String,
    pub username: String,
    pub role: UserRole,
    pub is_admin: bool,
}

impl From<&Claims> for Caller {
    fn from(claims: &Claims) -> Self {
        Caller {
            user_id: claims.sub.clone(),
            username: claims.username.clone(),
            role: claims.role,
            is_admin: claims.is_admin,
        }
    }
}

impl Caller {
    pub fn is_faculty(&self) -> bool {
        self.role == UserRole::Faculty
    }

    pub fn is_student(&self) -> bool {
        self.role == UserRole::Student
    }

    pub fn require_faculty(&self) -> AppResult<()> {
        if !self.is_faculty() {
            return Err(AppError::AuthorizationDenied(
                "Only faculty can perform this action".to_string(),
            ));
        }
        Ok(())
    }

    pub fn require_student(&self) -> AppResult<()> {
        if !self.is_student() {
            return Err(AppError::AuthorizationDenied(
                "Only students can perform this action".to_string(),
            ));
        }
        Ok(())
    }

    pub fn require_admin(&self) -> AppResult<()> {
        if !self.is_admin {
            return Err(AppError::AuthorizationDenied(
                "Only administrators can perform this action".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
pub fn test_caller(user_id: &str, role: UserRole) -> Caller {
    Caller {
        user_id: user_id.to_string(),
        username: user_id.to_string(),
        role,
        is_admin: false,
    }
}
