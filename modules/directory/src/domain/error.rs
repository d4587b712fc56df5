use thiserror::Error;
use uuid::Uuid;

/// Domain errors of the directory module.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Caller is not authenticated")]
    Unauthenticated,

    #[error("User not found: {id}")]
    UserNotFound { id: Uuid },

    #[error("No user for subject '{subject}'")]
    SubjectNotFound { subject: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Database error: {message}")]
    Database { message: String },
}

impl DomainError {
    pub fn unauthenticated() -> Self {
        Self::Unauthenticated
    }

    pub fn user_not_found(id: Uuid) -> Self {
        Self::UserNotFound { id }
    }

    pub fn subject_not_found(subject: impl Into<String>) -> Self {
        Self::SubjectNotFound {
            subject: subject.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
        }
    }
}
