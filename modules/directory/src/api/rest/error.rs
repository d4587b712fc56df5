use api_core::problem::{self, ProblemResponse};
use axum::http::StatusCode;
use tracing::error;

use crate::domain::error::DomainError;

/// Map a domain error onto the RFC 9457 response surface.
pub fn domain_problem(err: DomainError, instance: &str) -> ProblemResponse {
    match err {
        DomainError::Unauthenticated => problem::unauthenticated(instance),
        DomainError::UserNotFound { .. } | DomainError::SubjectNotFound { .. } => problem::from_parts(
            StatusCode::NOT_FOUND,
            "not_found",
            "Not Found",
            err.to_string(),
            instance,
        ),
        DomainError::Validation { ref message } => problem::from_parts(
            StatusCode::UNPROCESSABLE_ENTITY,
            "invalid_input",
            "Invalid Input",
            message.clone(),
            instance,
        ),
        DomainError::Database { message } => {
            error!(%message, "Directory storage failure");
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
            (DomainError::user_not_found(Uuid::nil()), 404, "not_found"),
            (DomainError::validation("bad"), 422, "invalid_input"),
            (DomainError::database("boom"), 500, "internal"),
        ];
        for (err, status, code) in cases {
            let resp = domain_problem(err, "/directory/me");
            assert_eq!(resp.0.status, status);
            assert_eq!(resp.0.code, code);
        }
    }
}
