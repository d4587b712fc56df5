use std::sync::Arc;

use api_core::problem::{self, ProblemResponse};
use api_core::CallerIdentity;
use axum::{
    extract::{Path, Query},
    http::{header, HeaderMap, StatusCode},
    response::Json,
    Extension,
};
use tracing::info;
use uuid::Uuid;

use crate::api::rest::dto::{SearchUsersQuery, SyncUserReq, UpdateProfileReq, UserDto};
use crate::api::rest::error::domain_problem;
use crate::config::DirectoryConfig;
use crate::contract::model::{Role, UserSearch};
use crate::domain::service::Service;

/// The caller's own profile.
#[utoipa::path(
    get,
    path = "/directory/me",
    tag = "directory",
    responses(
        (status = 200, description = "Current user profile", body = UserDto),
        (status = 401, description = "Unauthenticated"),
    )
)]
pub async fn get_me(
    Extension(svc): Extension<Arc<Service>>,
    Extension(identity): Extension<CallerIdentity>,
) -> Result<Json<UserDto>, ProblemResponse> {
    let user = svc
        .current_user(identity.0.as_ref())
        .await
        .map_err(|e| domain_problem(e, "/directory/me"))?
        .ok_or_else(|| problem::unauthenticated("/directory/me"))?;
    Ok(Json(UserDto::from(user)))
}

/// Update the caller's own profile.
#[utoipa::path(
    patch,
    path = "/directory/me",
    tag = "directory",
    request_body = UpdateProfileReq,
    responses(
        (status = 200, description = "Updated profile", body = UserDto),
        (status = 401, description = "Unauthenticated"),
        (status = 422, description = "Invalid input"),
    )
)]
pub async fn update_me(
    Extension(svc): Extension<Arc<Service>>,
    Extension(identity): Extension<CallerIdentity>,
    Json(req): Json<UpdateProfileReq>,
) -> Result<Json<UserDto>, ProblemResponse> {
    let patch = req.into_patch().map_err(|msg| {
        problem::from_parts(
            StatusCode::UNPROCESSABLE_ENTITY,
            "invalid_input",
            "Invalid Input",
            msg,
            "/directory/me",
        )
    })?;
    let user = svc
        .update_profile(identity.0.as_ref(), patch)
        .await
        .map_err(|e| domain_problem(e, "/directory/me"))?;
    Ok(Json(UserDto::from(user)))
}

/// Fetch a user profile by id.
#[utoipa::path(
    get,
    path = "/directory/users/{id}",
    tag = "directory",
    params(("id" = Uuid, Path, description = "User id")),
    responses(
        (status = 200, description = "User profile", body = UserDto),
        (status = 404, description = "Unknown user"),
    )
)]
pub async fn get_user(
    Extension(svc): Extension<Arc<Service>>,
    Path(id): Path<Uuid>,
) -> Result<Json<UserDto>, ProblemResponse> {
    let user = svc
        .get_user(id)
        .await
        .map_err(|e| domain_problem(e, &format!("/directory/users/{}", id)))?;
    Ok(Json(UserDto::from(user)))
}

/// Search the directory. Anonymous callers get an empty list.
#[utoipa::path(
    get,
    path = "/directory/users",
    tag = "directory",
    params(SearchUsersQuery),
    responses((status = 200, description = "Matching users", body = [UserDto]))
)]
pub async fn search_users(
    Extension(svc): Extension<Arc<Service>>,
    Extension(identity): Extension<CallerIdentity>,
    Query(query): Query<SearchUsersQuery>,
) -> Result<Json<Vec<UserDto>>, ProblemResponse> {
    let filter = UserSearch {
        role: query.role.as_deref().and_then(Role::parse),
        query: query.q.filter(|q| !q.trim().is_empty()),
    };
    let users = svc
        .search_users(identity.0.as_ref(), filter)
        .await
        .map_err(|e| domain_problem(e, "/directory/users"))?;
    Ok(Json(users.into_iter().map(UserDto::from).collect()))
}

/// Identity-provider sync: create or refresh a user.
#[utoipa::path(
    put,
    path = "/directory/sync",
    tag = "directory",
    request_body = SyncUserReq,
    responses(
        (status = 200, description = "Synced user", body = UserDto),
        (status = 401, description = "Missing or wrong sync token"),
        (status = 422, description = "Invalid payload"),
    )
)]
pub async fn sync_user(
    Extension(svc): Extension<Arc<Service>>,
    Extension(cfg): Extension<Arc<DirectoryConfig>>,
    headers: HeaderMap,
    Json(req): Json<SyncUserReq>,
) -> Result<Json<UserDto>, ProblemResponse> {
    require_sync_token(&cfg, &headers, "/directory/sync")?;
    info!(subject = %req.subject, "Identity sync received");
    let user = svc
        .sync_user(req.into())
        .await
        .map_err(|e| domain_problem(e, "/directory/sync"))?;
    Ok(Json(UserDto::from(user)))
}

/// Identity-provider account deletion sync.
#[utoipa::path(
    delete,
    path = "/directory/sync/{subject}",
    tag = "directory",
    params(("subject" = String, Path, description = "Identity provider subject")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 401, description = "Missing or wrong sync token"),
        (status = 404, description = "Unknown subject"),
    )
)]
pub async fn delete_synced_user(
    Extension(svc): Extension<Arc<Service>>,
    Extension(cfg): Extension<Arc<DirectoryConfig>>,
    headers: HeaderMap,
    Path(subject): Path<String>,
) -> Result<StatusCode, ProblemResponse> {
    let instance = format!("/directory/sync/{}", subject);
    require_sync_token(&cfg, &headers, &instance)?;
    svc.delete_user(&subject)
        .await
        .map_err(|e| domain_problem(e, &instance))?;
    Ok(StatusCode::NO_CONTENT)
}

/// Shared-token guard for the sync endpoints. With no token configured the
/// endpoints are disabled entirely.
fn require_sync_token(
    cfg: &DirectoryConfig,
    headers: &HeaderMap,
    instance: &str,
) -> Result<(), ProblemResponse> {
    let expected = cfg.sync_token.as_deref().ok_or_else(|| {
        problem::from_parts(
            StatusCode::NOT_FOUND,
            "not_found",
            "Not Found",
            "Identity sync is not enabled",
            instance,
        )
    })?;

    let presented = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    if presented == Some(expected) {
        Ok(())
    } else {
        Err(problem::from_parts(
            StatusCode::UNAUTHORIZED,
            "unauthenticated",
            "Unauthenticated",
            "Missing or invalid sync token",
            instance,
        ))
    }
}
