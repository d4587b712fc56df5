use thiserror::Error;
use uuid::Uuid;

/// Domain errors of the notification service.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Caller is not authenticated")]
    Unauthenticated,

    #[error("Notification not found: {id}")]
    NotificationNotFound { id: Uuid },

    #[error("Notification belongs to a different user")]
    Forbidden,

    #[error("Database error: {message}")]
    Database { message: String },
}

impl DomainError {
    pub fn unauthenticated() -> Self {
        Self::Unauthenticated
    }

    pub fn notification_not_found(id: Uuid) -> Self {
        Self::NotificationNotFound { id }
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
        }
    }
}
