use thiserror::Error;
use uuid::Uuid;

/// Domain errors of the messaging service.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Caller is not authenticated")]
    Unauthenticated,

    #[error("Cannot message yourself")]
    SelfMessage,

    #[error("Message content must not be empty")]
    EmptyContent,

    #[error("Message not found: {id}")]
    MessageNotFound { id: Uuid },

    #[error("Only the receiver may mark a message read")]
    Forbidden,

    #[error("Database error: {message}")]
    Database { message: String },
}

impl DomainError {
    pub fn unauthenticated() -> Self {
        Self::Unauthenticated
    }

    pub fn message_not_found(id: Uuid) -> Self {
        Self::MessageNotFound { id }
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
        }
    }
}
