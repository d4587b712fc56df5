use api_core::problem::{self, ProblemResponse};
use axum::http::StatusCode;
use tracing::error;

use crate::domain::error::DomainError;

/// Map a domain error onto the RFC 9457 response surface.
pub fn domain_problem(err: DomainError, instance: &str) -> ProblemResponse {
    match err {
        DomainError::Unauthenticated => problem::unauthenticated(instance),
        DomainError::SelfConnection => problem::from_parts(
            StatusCode::UNPROCESSABLE_ENTITY,
            "invalid_target",
            "Invalid Target",
            err.to_string(),
            instance,
        ),
        DomainError::UserNotFound { .. } | DomainError::ConnectionNotFound { .. } => {
            problem::from_parts(
                StatusCode::NOT_FOUND,
                "not_found",
                "Not Found",
                err.to_string(),
                instance,
            )
        }
        DomainError::Forbidden => problem::from_parts(
            StatusCode::FORBIDDEN,
            "forbidden",
            "Forbidden",
            err.to_string(),
            instance,
        ),
        DomainError::InvalidState { .. } => problem::from_parts(
            StatusCode::CONFLICT,
            "invalid_state",
            "Invalid State",
            err.to_string(),
            instance,
        ),
        DomainError::DuplicateRequest { .. } => problem::from_parts(
            StatusCode::CONFLICT,
            "duplicate_request",
            "Duplicate Request",
            err.to_string(),
            instance,
        ),
        DomainError::AlreadyExists { message } => problem::from_parts(
            StatusCode::CONFLICT,
            "already_exists",
            "Already Exists",
            message,
            instance,
        ),
        DomainError::Database { message } => {
            error!(%message, "Connections storage failure");
            problem::internal_error(instance)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn maps_kinds_to_status() {
        let cases = [
            (DomainError::unauthenticated(), 401, "unauthenticated"),
            (DomainError::SelfConnection, 422, "invalid_target"),
            (DomainError::user_not_found(Uuid::nil()), 404, "not_found"),
            (DomainError::Forbidden, 403, "forbidden"),
            (DomainError::invalid_state("pending"), 409, "invalid_state"),
            (DomainError::duplicate_request(), 409, "duplicate_request"),
            (DomainError::request_rejected(), 409, "duplicate_request"),
            (DomainError::already_connected(), 409, "already_exists"),
            (DomainError::database("boom"), 500, "internal"),
        ];
        for (err, status, code) in cases {
            let resp = domain_problem(err, "/connections/requests");
            assert_eq!(resp.0.status, status);
            assert_eq!(resp.0.code, code);
        }
    }
}
