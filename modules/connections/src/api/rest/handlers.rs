use std::sync::Arc;

use api_core::problem::ProblemResponse;
use api_core::CallerIdentity;
use axum::{extract::Path, http::StatusCode, response::Json, Extension};
use uuid::Uuid;

use crate::api::rest::dto::{
    ConnectionDto, ConnectionStatusDto, PendingCountDto, SendConnectionRequestReq, SendOutcomeDto,
    SuccessDto,
};
use crate::api::rest::error::domain_problem;
use crate::domain::service::Service;

/// Send a connection request.
#[utoipa::path(
    post,
    path = "/connections/requests",
    tag = "connections",
    request_body = SendConnectionRequestReq,
    responses(
        (status = 201, description = "Request created or auto-accepted", body = SendOutcomeDto),
        (status = 401, description = "Unauthenticated"),
        (status = 404, description = "Receiver does not exist"),
        (status = 409, description = "Edge already exists"),
        (status = 422, description = "Self-connection"),
    )
)]
pub async fn send_request(
    Extension(svc): Extension<Arc<Service>>,
    Extension(identity): Extension<CallerIdentity>,
    Json(req): Json<SendConnectionRequestReq>,
) -> Result<(StatusCode, Json<SendOutcomeDto>), ProblemResponse> {
    let outcome = svc
        .send_connection_request(identity.0.as_ref(), req.receiver_id, req.message)
        .await
        .map_err(|e| domain_problem(e, "/connections/requests"))?;
    Ok((StatusCode::CREATED, Json(SendOutcomeDto::from(outcome))))
}

/// Accept a pending request (receiver only).
#[utoipa::path(
    post,
    path = "/connections/requests/{id}/accept",
    tag = "connections",
    params(("id" = Uuid, Path, description = "Connection id")),
    responses(
        (status = 200, description = "Accepted", body = SuccessDto),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Caller is not the receiver"),
        (status = 404, description = "Unknown connection"),
        (status = 409, description = "Not pending"),
    )
)]
pub async fn accept_request(
    Extension(svc): Extension<Arc<Service>>,
    Extension(identity): Extension<CallerIdentity>,
    Path(id): Path<Uuid>,
) -> Result<Json<SuccessDto>, ProblemResponse> {
    svc.accept_connection_request(identity.0.as_ref(), id)
        .await
        .map_err(|e| domain_problem(e, &format!("/connections/requests/{}/accept", id)))?;
    Ok(Json(SuccessDto::ok()))
}

/// Reject a pending request (receiver only).
#[utoipa::path(
    post,
    path = "/connections/requests/{id}/reject",
    tag = "connections",
    params(("id" = Uuid, Path, description = "Connection id")),
    responses(
        (status = 200, description = "Rejected", body = SuccessDto),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Caller is not the receiver"),
        (status = 404, description = "Unknown connection"),
        (status = 409, description = "Not pending"),
    )
)]
pub async fn reject_request(
    Extension(svc): Extension<Arc<Service>>,
    Extension(identity): Extension<CallerIdentity>,
    Path(id): Path<Uuid>,
) -> Result<Json<SuccessDto>, ProblemResponse> {
    svc.reject_connection_request(identity.0.as_ref(), id)
        .await
        .map_err(|e| domain_problem(e, &format!("/connections/requests/{}/reject", id)))?;
    Ok(Json(SuccessDto::ok()))
}

/// Withdraw a pending request (requester only).
#[utoipa::path(
    delete,
    path = "/connections/requests/{id}",
    tag = "connections",
    params(("id" = Uuid, Path, description = "Connection id")),
    responses(
        (status = 200, description = "Cancelled", body = SuccessDto),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Caller is not the requester"),
        (status = 404, description = "Unknown connection"),
        (status = 409, description = "Not pending"),
    )
)]
pub async fn cancel_request(
    Extension(svc): Extension<Arc<Service>>,
    Extension(identity): Extension<CallerIdentity>,
    Path(id): Path<Uuid>,
) -> Result<Json<SuccessDto>, ProblemResponse> {
    svc.cancel_connection_request(identity.0.as_ref(), id)
        .await
        .map_err(|e| domain_problem(e, &format!("/connections/requests/{}", id)))?;
    Ok(Json(SuccessDto::ok()))
}

/// Remove an accepted connection (either party).
#[utoipa::path(
    delete,
    path = "/connections/{id}",
    tag = "connections",
    params(("id" = Uuid, Path, description = "Connection id")),
    responses(
        (status = 200, description = "Removed", body = SuccessDto),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Caller is not a participant"),
        (status = 404, description = "Unknown connection"),
        (status = 409, description = "Not accepted"),
    )
)]
pub async fn remove_connection(
    Extension(svc): Extension<Arc<Service>>,
    Extension(identity): Extension<CallerIdentity>,
    Path(id): Path<Uuid>,
) -> Result<Json<SuccessDto>, ProblemResponse> {
    svc.remove_connection(identity.0.as_ref(), id)
        .await
        .map_err(|e| domain_problem(e, &format!("/connections/{}", id)))?;
    Ok(Json(SuccessDto::ok()))
}

/// The caller's accepted connections.
#[utoipa::path(
    get,
    path = "/connections",
    tag = "connections",
    responses((status = 200, description = "Accepted connections", body = [ConnectionDto]))
)]
pub async fn get_connections(
    Extension(svc): Extension<Arc<Service>>,
    Extension(identity): Extension<CallerIdentity>,
) -> Result<Json<Vec<ConnectionDto>>, ProblemResponse> {
    let rows = svc
        .get_connections(identity.0.as_ref())
        .await
        .map_err(|e| domain_problem(e, "/connections"))?;
    Ok(Json(rows.into_iter().map(ConnectionDto::from).collect()))
}

/// Pending requests addressed to the caller.
#[utoipa::path(
    get,
    path = "/connections/requests/inbound",
    tag = "connections",
    responses((status = 200, description = "Inbound pending requests", body = [ConnectionDto]))
)]
pub async fn get_inbound_requests(
    Extension(svc): Extension<Arc<Service>>,
    Extension(identity): Extension<CallerIdentity>,
) -> Result<Json<Vec<ConnectionDto>>, ProblemResponse> {
    let rows = svc
        .get_inbound_requests(identity.0.as_ref())
        .await
        .map_err(|e| domain_problem(e, "/connections/requests/inbound"))?;
    Ok(Json(rows.into_iter().map(ConnectionDto::from).collect()))
}

/// Pending requests sent by the caller.
#[utoipa::path(
    get,
    path = "/connections/requests/outbound",
    tag = "connections",
    responses((status = 200, description = "Outbound pending requests", body = [ConnectionDto]))
)]
pub async fn get_outbound_requests(
    Extension(svc): Extension<Arc<Service>>,
    Extension(identity): Extension<CallerIdentity>,
) -> Result<Json<Vec<ConnectionDto>>, ProblemResponse> {
    let rows = svc
        .get_outbound_requests(identity.0.as_ref())
        .await
        .map_err(|e| domain_problem(e, "/connections/requests/outbound"))?;
    Ok(Json(rows.into_iter().map(ConnectionDto::from).collect()))
}

/// Relationship between the caller and another user.
#[utoipa::path(
    get,
    path = "/connections/status/{user_id}",
    tag = "connections",
    params(("user_id" = Uuid, Path, description = "Other user id")),
    responses((status = 200, description = "Connection status", body = ConnectionStatusDto))
)]
pub async fn get_connection_status(
    Extension(svc): Extension<Arc<Service>>,
    Extension(identity): Extension<CallerIdentity>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<ConnectionStatusDto>, ProblemResponse> {
    let view = svc
        .get_connection_status(identity.0.as_ref(), user_id)
        .await
        .map_err(|e| domain_problem(e, &format!("/connections/status/{}", user_id)))?;
    Ok(Json(ConnectionStatusDto::from(view)))
}

/// Badge counter for inbound pending requests.
#[utoipa::path(
    get,
    path = "/connections/requests/pending-count",
    tag = "connections",
    responses((status = 200, description = "Pending request count", body = PendingCountDto))
)]
pub async fn get_pending_count(
    Extension(svc): Extension<Arc<Service>>,
    Extension(identity): Extension<CallerIdentity>,
) -> Result<Json<PendingCountDto>, ProblemResponse> {
    let count = svc
        .get_pending_request_count(identity.0.as_ref())
        .await
        .map_err(|e| domain_problem(e, "/connections/requests/pending-count"))?;
    Ok(Json(PendingCountDto { count }))
}
