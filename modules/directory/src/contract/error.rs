use thiserror::Error;
use uuid::Uuid;

/// Errors that are safe to expose to other modules.
#[derive(Error, Debug, Clone)]
pub enum DirectoryError {
    #[error("User not found: {id}")]
    NotFound { id: Uuid },

    #[error("Internal error")]
    Internal,
}

impl DirectoryError {
    pub fn not_found(id: Uuid) -> Self {
        Self::NotFound { id }
    }

    pub fn internal() -> Self {
        Self::Internal
    }
}

impl From<crate::domain::error::DomainError> for DirectoryError {
    fn from(domain_error: crate::domain::error::DomainError) -> Self {
        use crate::domain::error::DomainError::*;
        match domain_error {
            UserNotFound { id } => Self::not_found(id),
            // Caller-scoped and validation failures never cross the contract:
            // the client trait only exposes lookups.
            Unauthenticated | SubjectNotFound { .. } | Validation { .. } | Database { .. } => {
                Self::internal()
            }
        }
    }
}
