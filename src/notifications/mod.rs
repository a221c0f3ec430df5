use thiserror::Error;

pub mod authorization;
pub mod directory;
pub mod dispatcher;
pub mod envelope;
pub mod locks;
pub mod models;
pub mod registry;
pub mod senders;
pub mod service;

#[derive(Error, Debug)]
pub enum NotificationError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    #[error("Invalid secret")]
    Forbidden,
    #[error("Token already registered")]
    Conflict,
    #[error("Database error: {0}")]
    Store(#[from] sqlx::Error),
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Rejects empty or whitespace-only values for a required field.
pub(crate) fn require_non_empty(field: &str, value: &str) -> Result<(), NotificationError> {
    if value.trim().is_empty() {
        return Err(NotificationError::Validation(format!("{field} is required")));
    }
    Ok(())
}
