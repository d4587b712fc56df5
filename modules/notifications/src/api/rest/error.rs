use api_core::problem::{self, ProblemResponse};
use axum::http::StatusCode;
use tracing::error;

use crate::domain::error::DomainError;

/// Map a domain error onto the RFC 9457 response surface.
pub fn domain_problem(err: DomainError, instance: &str) -> ProblemResponse {
    match err {
        DomainError::Unauthenticated => problem::unauthenticated(instance),
        DomainError::NotificationNotFound { .. } => problem::from_parts(
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
            error!(%message, "Notification storage failure");
            problem::internal_error(instance)
        }
    }
}
