use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use crate::notifications::NotificationError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Not Found: {0}")]
    NotFound(String),
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Internal server error: {0}")]
    InternalServerError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::DatabaseError(msg) => {
                error!(error = %msg, "Database error while handling request.");
                (StatusCode::INTERNAL_SERVER_ERROR, format!("Database error: {msg}"))
            }
            AppError::InternalServerError(msg) => {
                error!(error = %msg, "Internal error while handling request.");
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };
        (status, Json(serde_json::json!({ "error": error_message }))).into_response()
    }
}

impl From<NotificationError> for AppError {
    fn from(err: NotificationError) -> Self {
        match err {
            NotificationError::Validation(msg) => AppError::InvalidInput(msg),
            NotificationError::NotFound(msg) => AppError::NotFound(msg),
            NotificationError::Forbidden => AppError::Forbidden("Invalid secret".to_string()),
            // Duplicate registrations are a client error with an explicit message.
            NotificationError::Conflict => {
                AppError::InvalidInput("Token already registered".to_string())
            }
            NotificationError::Store(e) => AppError::DatabaseError(e.to_string()),
            NotificationError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::DatabaseError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notification_error_status_codes() {
        let cases = [
            (NotificationError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (NotificationError::Conflict, StatusCode::BAD_REQUEST),
            (NotificationError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (NotificationError::Forbidden, StatusCode::FORBIDDEN),
            (NotificationError::Store(sqlx::Error::RowNotFound), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(AppError::from(err).into_response().status(), status);
        }
    }
}
