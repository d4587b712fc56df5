use api_core::problem::{self, ProblemResponse};
use axum::http::StatusCode;
use tracing::error;

use crate::domain::error::DomainError;

/// Map a domain error onto the RFC 9457 response surface.
pub fn domain_problem(err: DomainError, instance: &str) -> ProblemResponse {
    match err {
        DomainError::Unauthenticated => problem::unauthenticated(instance),
        DomainError::SelfMessage => problem::from_parts(
            StatusCode::UNPROCESSABLE_ENTITY,
            "invalid_target",
            "Invalid Target",
            err.to_string(),
            instance,
        ),
        DomainError::EmptyContent => problem::from_parts(
            StatusCode::UNPROCESSABLE_ENTITY,
            "invalid_input",
            "Invalid Input",
            err.to_string(),
            instance,
        ),
        DomainError::MessageNotFound { .. } => problem::from_parts(
            StatusCode::NOT_FOUND,
            "not_found",
            "Not Found",
            err.to_string(),
            instance,
        ),
        DomainError::Forbidden => problem::from_parts(
            StatusCode::FORBIDDEN,
            "forbidden",
            "Forbidden",
            err.to_string(),
            instance,
        ),
        DomainError::Database { message } => {
            error!(%message, "Messaging storage failure");
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
            (DomainError::SelfMessage, 422, "invalid_target"),
            (DomainError::EmptyContent, 422, "invalid_input"),
            (DomainError::message_not_found(Uuid::nil()), 404, "not_found"),
            (DomainError::Forbidden, 403, "forbidden"),
            (DomainError::database("boom"), 500, "internal"),
        ];
        for (err, status, code) in cases {
            let resp = domain_problem(err, "/messages");
            assert_eq!(resp.0.status, status);
            assert_eq!(resp.0.code, code);
        }
    }
}
