use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Auth service error: {0}")]
    Upstream(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("{0}")]
    NotFound(String),

    #[error("User is not banned")]
    NotBanned,

    #[error("Insufficient permissions")]
    Forbidden,

    #[error("Missing or invalid CSRF token")]
    CsrfRejected,

    #[error("Internal error: {0}")]
    Internal(String),
}

#[derive(Clone, Copy, Debug)]
pub enum ErrorCode {
    DatabaseError,
    UpstreamError,
    InvalidInput,
    NotFound,
    NotBanned,
    Forbidden,
    CsrfRejected,
    InternalError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::DatabaseError => "DATABASE_ERROR",
            ErrorCode::UpstreamError => "UPSTREAM_ERROR",
            ErrorCode::InvalidInput => "INVALID_INPUT",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::NotBanned => "NOT_BANNED",
            ErrorCode::Forbidden => "FORBIDDEN",
            ErrorCode::CsrfRejected => "CSRF_REJECTED",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        }
    }
}

impl AppError {
    pub fn user_not_found() -> Self {
        AppError::NotFound("User not found".into())
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::Database(_) => ErrorCode::DatabaseError,
            AppError::Upstream(_) => ErrorCode::UpstreamError,
            AppError::InvalidInput(_) => ErrorCode::InvalidInput,
            AppError::NotFound(_) => ErrorCode::NotFound,
            AppError::NotBanned => ErrorCode::NotBanned,
            AppError::Forbidden => ErrorCode::Forbidden,
            AppError::CsrfRejected => ErrorCode::CsrfRejected,
            AppError::Internal(_) => ErrorCode::InternalError,
        }
    }

    /// Message safe to return to clients. Backend details stay in the logs.
    pub fn public_message(&self) -> String {
        match self {
            AppError::Database(_) => "Database error".into(),
            AppError::Upstream(_) => "Auth service error".into(),
            AppError::Internal(_) => "Internal error".into(),
            other => other.to_string(),
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
