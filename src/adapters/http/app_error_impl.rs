use crate::app_error::AppError;
use axum::Json;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        log_error(&self);
        (status_for(&self), Json(error_body(&self))).into_response()
    }
}

pub fn status_for(err: &AppError) -> StatusCode {
    match err {
        AppError::InvalidInput(_) | AppError::NotBanned => StatusCode::BAD_REQUEST,
        AppError::Forbidden | AppError::CsrfRejected => StatusCode::FORBIDDEN,
        AppError::NotFound(_) => StatusCode::NOT_FOUND,
        AppError::Database(_) | AppError::Upstream(_) | AppError::Internal(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// `{"error": ..., "code": ...}` with backend details stripped.
pub fn error_body(err: &AppError) -> serde_json::Value {
    serde_json::json!({ "error": err.public_message(), "code": err.code().as_str() })
}

/// Log the error before it gets converted into a status response.
pub fn log_error(err: &AppError) {
    if status_for(err).is_server_error() {
        tracing::error!(error = ?err, "Request failed");
    } else {
        tracing::warn!(error = %err, "Request rejected");
    }
}
