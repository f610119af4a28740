use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;

const DUPLICATE_KEY_CODE: i32 = 11000;

#[derive(Debug, Clone, Error)]
pub enum AppError {
    #[error("Authentication required: {0}")]
    AuthenticationRequired(String),

    #[error("Not allowed: {0}")]
    AuthorizationDenied(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Assistant unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("Assistant not configured")]
    UpstreamNotConfigured,

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl AppError {
    fn error_code(&self) -> &'static str {
        match self {
            AppError::AuthenticationRequired(_) => "AUTHENTICATION_REQUIRED",
            AppError::AuthorizationDenied(_) => "AUTHORIZATION_DENIED",
            AppError::ValidationError(_) => "VALIDATION_ERROR",
            AppError::Conflict(_) => "CONFLICT",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::UpstreamUnavailable(_) | AppError::UpstreamNotConfigured => {
                "UPSTREAM_UNAVAILABLE"
            }
            AppError::DatabaseError(_) => "DATABASE_ERROR",
            AppError::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Shorthand for the "not found" a caller sees for records outside their scope.
    pub fn not_found(what: &str, id: &str) -> Self {
        AppError::NotFound(format!("{} '{}' not found", what, id))
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: &'static str,
    pub status: u16,
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::AuthenticationRequired(_) => StatusCode::UNAUTHORIZED,
            AppError::AuthorizationDenied(_) => StatusCode::FORBIDDEN,
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::UpstreamUnavailable(_) => StatusCode::BAD_GATEWAY,
            AppError::UpstreamNotConfigured => StatusCode::SERVICE_UNAVAILABLE,
            AppError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            // storage and internal details stay in the log
            AppError::DatabaseError(detail) | AppError::InternalError(detail) => {
                log::error!("{}: {}", self.error_code(), detail);
                "Something went wrong, please try again".to_string()
            }
            other => other.to_string(),
        };

        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: message,
            code: self.error_code(),
            status: self.status_code().as_u16(),
        })
    }
}

impl From<mongodb::error::Error> for AppError {
    fn from(err: mongodb::error::Error) -> Self {
        if is_duplicate_key(&err) {
            return AppError::Conflict("Record already exists".to_string());
        }
        AppError::DatabaseError(err.to_string())
    }
}

impl From<mongodb::bson::ser::Error> for AppError {
    fn from(err: mongodb::bson::ser::Error) -> Self {
        AppError::InternalError(format!("BSON serialization error: {}", err))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::ValidationError(err.to_string())
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return AppError::UpstreamUnavailable("the assistant took too long to answer".to_string());
        }
        AppError::UpstreamUnavailable(err.to_string())
    }
}

/// True when a write was rejected by one of the unique indexes.
pub fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    use mongodb::error::{ErrorKind, WriteFailure};

    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(write_error)) => {
            write_error.code == DUPLICATE_KEY_CODE
        }
        _ => false,
    }
}

pub type AppResult<T> = Result<T, AppError>;
