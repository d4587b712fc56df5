use thiserror::Error;
use uuid::Uuid;

/// Domain errors of the connection state machine.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Caller is not authenticated")]
    Unauthenticated,

    #[error("Cannot send a connection request to yourself")]
    SelfConnection,

    #[error("User not found: {id}")]
    UserNotFound { id: Uuid },

    #[error("Connection not found: {id}")]
    ConnectionNotFound { id: Uuid },

    #[error("Caller is not authorized to modify this connection")]
    Forbidden,

    #[error("Connection is not {expected}")]
    InvalidState { expected: &'static str },

    #[error("{message}")]
    DuplicateRequest { message: &'static str },

    #[error("{message}")]
    AlreadyExists { message: &'static str },

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

    pub fn connection_not_found(id: Uuid) -> Self {
        Self::ConnectionNotFound { id }
    }

    pub fn invalid_state(expected: &'static str) -> Self {
        Self::InvalidState { expected }
    }

    pub fn duplicate_request() -> Self {
        Self::DuplicateRequest {
            message: "A connection request to this user is already pending",
        }
    }

    /// Rejected edges persist and block re-requests; the detail spells that
    /// out instead of claiming a request is still pending.
    pub fn request_rejected() -> Self {
        Self::DuplicateRequest {
            message: "A previous connection request to this user was rejected",
        }
    }

    pub fn already_connected() -> Self {
        Self::AlreadyExists {
            message: "Users are already connected",
        }
    }

    pub fn already_exists() -> Self {
        Self::AlreadyExists {
            message: "A connection between these users already exists",
        }
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
        }
    }
}
