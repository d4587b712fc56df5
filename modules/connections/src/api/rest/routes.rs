use std::sync::Arc;

use axum::{
    routing::{delete, get, post},
    Extension, Router,
};
use utoipa::OpenApi;

use crate::api::rest::{dto, handlers};
use crate::domain::service::Service;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::send_request,
        handlers::accept_request,
        handlers::reject_request,
        handlers::cancel_request,
        handlers::remove_connection,
        handlers::get_connections,
        handlers::get_inbound_requests,
        handlers::get_outbound_requests,
        handlers::get_connection_status,
        handlers::get_pending_count,
    ),
    components(schemas(
        dto::SendConnectionRequestReq,
        dto::SendOutcomeDto,
        dto::SuccessDto,
        dto::UserSummaryDto,
        dto::ConnectionDto,
        dto::ConnectionStatusDto,
        dto::PendingCountDto,
    )),
    tags((name = "connections", description = "Connection requests and the connection list"))
)]
pub struct ApiDoc;

/// Connection routes, mounted by the gateway under `/api/v1`.
pub fn router(service: Arc<Service>) -> Router {
    Router::new()
        .route("/connections", get(handlers::get_connections))
        .route("/connections/requests", post(handlers::send_request))
        .route(
            "/connections/requests/inbound",
            get(handlers::get_inbound_requests),
        )
        .route(
            "/connections/requests/outbound",
            get(handlers::get_outbound_requests),
        )
        .route(
            "/connections/requests/pending-count",
            get(handlers::get_pending_count),
        )
        .route(
            "/connections/requests/{id}",
            delete(handlers::cancel_request),
        )
        .route(
            "/connections/requests/{id}/accept",
            post(handlers::accept_request),
        )
        .route(
            "/connections/requests/{id}/reject",
            post(handlers::reject_request),
        )
        .route(
            "/connections/status/{user_id}",
            get(handlers::get_connection_status),
        )
        .route("/connections/{id}", delete(handlers::remove_connection))
        .layer(Extension(service))
}
