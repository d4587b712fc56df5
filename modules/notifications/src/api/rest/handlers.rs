use std::sync::Arc;

use api_core::problem::ProblemResponse;
use api_core::CallerIdentity;
use axum::{
    extract::{Path, Query},
    http::StatusCode,
    response::Json,
    Extension,
};
use uuid::Uuid;

use crate::api::rest::dto::{
    DeletedDto, ListNotificationsQuery, NotificationDto, StarredDto, UnreadCountDto, UpdatedDto,
};
use crate::api::rest::error::domain_problem;
use crate::domain::service::Service;

/// Newest notifications of the caller.
#[utoipa::path(
    get,
    path = "/notifications",
    tag = "notifications",
    params(("limit" = Option<u64>, Query, description = "Page size, default 50")),
    responses((status = 200, description = "Notifications, newest first", body = [NotificationDto]))
)]
pub async fn list_notifications(
    Extension(svc): Extension<Arc<Service>>,
    Extension(identity): Extension<CallerIdentity>,
    Query(query): Query<ListNotificationsQuery>,
) -> Result<Json<Vec<NotificationDto>>, ProblemResponse> {
    let rows = svc
        .list_notifications(identity.0.as_ref(), query.limit)
        .await
        .map_err(|e| domain_problem(e, "/notifications"))?;
    Ok(Json(rows.into_iter().map(NotificationDto::from).collect()))
}

#[utoipa::path(
    get,
    path = "/notifications/unread",
    tag = "notifications",
    responses((status = 200, description = "Unread notifications, newest first", body = [NotificationDto]))
)]
pub async fn list_unread(
    Extension(svc): Extension<Arc<Service>>,
    Extension(identity): Extension<CallerIdentity>,
) -> Result<Json<Vec<NotificationDto>>, ProblemResponse> {
    let rows = svc
        .list_unread(identity.0.as_ref())
        .await
        .map_err(|e| domain_problem(e, "/notifications/unread"))?;
    Ok(Json(rows.into_iter().map(NotificationDto::from).collect()))
}

#[utoipa::path(
    get,
    path = "/notifications/starred",
    tag = "notifications",
    responses((status = 200, description = "Starred notifications, newest first", body = [NotificationDto]))
)]
pub async fn list_starred(
    Extension(svc): Extension<Arc<Service>>,
    Extension(identity): Extension<CallerIdentity>,
) -> Result<Json<Vec<NotificationDto>>, ProblemResponse> {
    let rows = svc
        .list_starred(identity.0.as_ref())
        .await
        .map_err(|e| domain_problem(e, "/notifications/starred"))?;
    Ok(Json(rows.into_iter().map(NotificationDto::from).collect()))
}

/// Badge counter for unread notifications.
#[utoipa::path(
    get,
    path = "/notifications/unread-count",
    tag = "notifications",
    responses((status = 200, description = "Unread notification count", body = UnreadCountDto))
)]
pub async fn get_unread_count(
    Extension(svc): Extension<Arc<Service>>,
    Extension(identity): Extension<CallerIdentity>,
) -> Result<Json<UnreadCountDto>, ProblemResponse> {
    let count = svc
        .get_unread_count(identity.0.as_ref())
        .await
        .map_err(|e| domain_problem(e, "/notifications/unread-count"))?;
    Ok(Json(UnreadCountDto { count }))
}

#[utoipa::path(
    post,
    path = "/notifications/{id}/read",
    tag = "notifications",
    params(("id" = Uuid, Path, description = "Notification id")),
    responses(
        (status = 204, description = "Marked read"),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Unknown notification"),
    )
)]
pub async fn mark_read(
    Extension(svc): Extension<Arc<Service>>,
    Extension(identity): Extension<CallerIdentity>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ProblemResponse> {
    svc.mark_read(identity.0.as_ref(), id)
        .await
        .map_err(|e| domain_problem(e, &format!("/notifications/{}/read", id)))?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/notifications/{id}/unread",
    tag = "notifications",
    params(("id" = Uuid, Path, description = "Notification id")),
    responses(
        (status = 204, description = "Marked unread"),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Unknown notification"),
    )
)]
pub async fn mark_unread(
    Extension(svc): Extension<Arc<Service>>,
    Extension(identity): Extension<CallerIdentity>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ProblemResponse> {
    svc.mark_unread(identity.0.as_ref(), id)
        .await
        .map_err(|e| domain_problem(e, &format!("/notifications/{}/unread", id)))?;
    Ok(StatusCode::NO_CONTENT)
}

/// Toggle the star flag and report the new value.
#[utoipa::path(
    post,
    path = "/notifications/{id}/star",
    tag = "notifications",
    params(("id" = Uuid, Path, description = "Notification id")),
    responses(
        (status = 200, description = "New star state", body = StarredDto),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Unknown notification"),
    )
)]
pub async fn toggle_star(
    Extension(svc): Extension<Arc<Service>>,
    Extension(identity): Extension<CallerIdentity>,
    Path(id): Path<Uuid>,
) -> Result<Json<StarredDto>, ProblemResponse> {
    let is_starred = svc
        .toggle_star(identity.0.as_ref(), id)
        .await
        .map_err(|e| domain_problem(e, &format!("/notifications/{}/star", id)))?;
    Ok(Json(StarredDto { is_starred }))
}

#[utoipa::path(
    post,
    path = "/notifications/read-all",
    tag = "notifications",
    responses(
        (status = 200, description = "Patched count", body = UpdatedDto),
        (status = 401, description = "Unauthenticated"),
    )
)]
pub async fn mark_all_read(
    Extension(svc): Extension<Arc<Service>>,
    Extension(identity): Extension<CallerIdentity>,
) -> Result<Json<UpdatedDto>, ProblemResponse> {
    let updated = svc
        .mark_all_read(identity.0.as_ref())
        .await
        .map_err(|e| domain_problem(e, "/notifications/read-all"))?;
    Ok(Json(UpdatedDto { updated }))
}

#[utoipa::path(
    delete,
    path = "/notifications/{id}",
    tag = "notifications",
    params(("id" = Uuid, Path, description = "Notification id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Unknown notification"),
    )
)]
pub async fn delete_notification(
    Extension(svc): Extension<Arc<Service>>,
    Extension(identity): Extension<CallerIdentity>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ProblemResponse> {
    svc.delete_notification(identity.0.as_ref(), id)
        .await
        .map_err(|e| domain_problem(e, &format!("/notifications/{}", id)))?;
    Ok(StatusCode::NO_CONTENT)
}

/// Clear the caller's notification list.
#[utoipa::path(
    delete,
    path = "/notifications",
    tag = "notifications",
    responses(
        (status = 200, description = "Deleted count", body = DeletedDto),
        (status = 401, description = "Unauthenticated"),
    )
)]
pub async fn delete_all(
    Extension(svc): Extension<Arc<Service>>,
    Extension(identity): Extension<CallerIdentity>,
) -> Result<Json<DeletedDto>, ProblemResponse> {
    let deleted = svc
        .delete_all(identity.0.as_ref())
        .await
        .map_err(|e| domain_problem(e, "/notifications"))?;
    Ok(Json(DeletedDto { deleted }))
}
