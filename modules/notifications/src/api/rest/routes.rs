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
        handlers::list_notifications,
        handlers::list_unread,
        handlers::list_starred,
        handlers::get_unread_count,
        handlers::mark_read,
        handlers::mark_unread,
        handlers::toggle_star,
        handlers::mark_all_read,
        handlers::delete_notification,
        handlers::delete_all,
    ),
    components(schemas(
        dto::NotificationDto,
        dto::UserSummaryDto,
        dto::UnreadCountDto,
        dto::StarredDto,
        dto::UpdatedDto,
        dto::DeletedDto,
    )),
    tags((name = "notifications", description = "Notification center"))
)]
pub struct ApiDoc;

/// Notification routes, mounted by the gateway under `/api/v1`.
pub fn router(service: Arc<Service>) -> Router {
    Router::new()
        .route(
            "/notifications",
            get(handlers::list_notifications).delete(handlers::delete_all),
        )
        .route("/notifications/unread", get(handlers::list_unread))
        .route("/notifications/starred", get(handlers::list_starred))
        .route(
            "/notifications/unread-count",
            get(handlers::get_unread_count),
        )
        .route("/notifications/read-all", post(handlers::mark_all_read))
        .route("/notifications/{id}/read", post(handlers::mark_read))
        .route("/notifications/{id}/unread", post(handlers::mark_unread))
        .route("/notifications/{id}/star", post(handlers::toggle_star))
        .route("/notifications/{id}", delete(handlers::delete_notification))
        .layer(Extension(service))
}
