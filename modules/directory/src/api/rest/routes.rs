use std::sync::Arc;

use axum::{
    routing::{get, put},
    Extension, Router,
};
use utoipa::OpenApi;

use crate::api::rest::{dto, handlers};
use crate::config::DirectoryConfig;
use crate::domain::service::Service;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::get_me,
        handlers::update_me,
        handlers::get_user,
        handlers::search_users,
        handlers::sync_user,
        handlers::delete_synced_user,
    ),
    components(schemas(dto::UserDto, dto::UpdateProfileReq, dto::SyncUserReq)),
    tags((name = "directory", description = "User profiles and identity sync"))
)]
pub struct ApiDoc;

/// Directory routes, mounted by the gateway under `/api/v1`.
pub fn router(service: Arc<Service>, config: Arc<DirectoryConfig>) -> Router {
    Router::new()
        .route(
            "/directory/me",
            get(handlers::get_me).patch(handlers::update_me),
        )
        .route("/directory/users", get(handlers::search_users))
        .route("/directory/users/{id}", get(handlers::get_user))
        .route("/directory/sync", put(handlers::sync_user))
        .route(
            "/directory/sync/{subject}",
            axum::routing::delete(handlers::delete_synced_user),
        )
        .layer(Extension(service))
        .layer(Extension(config))
}
