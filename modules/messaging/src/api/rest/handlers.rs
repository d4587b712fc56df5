use std::sync::Arc;

use api_core::problem::ProblemResponse;
use api_core::CallerIdentity;
use axum::{extract::Path, http::StatusCode, response::Json, Extension};
use uuid::Uuid;

use crate::api::rest::dto::{
    ConversationDto, MarkedReadDto, MessageDto, MessageSentDto, SendMessageReq, UnreadCountDto,
};
use crate::api::rest::error::domain_problem;
use crate::domain::service::Service;

/// Send a direct message.
#[utoipa::path(
    post,
    path = "/messages",
    tag = "messaging",
    request_body = SendMessageReq,
    responses(
        (status = 201, description = "Message stored", body = MessageSentDto),
        (status = 401, description = "Unauthenticated"),
        (status = 422, description = "Self-message or empty content"),
    )
)]
pub async fn send_message(
    Extension(svc): Extension<Arc<Service>>,
    Extension(identity): Extension<CallerIdentity>,
    Json(req): Json<SendMessageReq>,
) -> Result<(StatusCode, Json<MessageSentDto>), ProblemResponse> {
    let message_id = svc
        .send_message(identity.0.as_ref(), req.receiver_id, &req.content)
        .await
        .map_err(|e| domain_problem(e, "/messages"))?;
    Ok((StatusCode::CREATED, Json(MessageSentDto { message_id })))
}

/// Both directions with one partner, oldest first.
#[utoipa::path(
    get,
    path = "/messages/conversations/{user_id}",
    tag = "messaging",
    params(("user_id" = Uuid, Path, description = "Other user id")),
    responses((status = 200, description = "Messages, ascending by time", body = [MessageDto]))
)]
pub async fn get_conversation(
    Extension(svc): Extension<Arc<Service>>,
    Extension(identity): Extension<CallerIdentity>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<MessageDto>>, ProblemResponse> {
    let messages = svc
        .get_conversation(identity.0.as_ref(), user_id)
        .await
        .map_err(|e| domain_problem(e, &format!("/messages/conversations/{}", user_id)))?;
    Ok(Json(messages.into_iter().map(MessageDto::from).collect()))
}

/// All conversations of the caller, most recent first.
#[utoipa::path(
    get,
    path = "/messages/conversations",
    tag = "messaging",
    responses((status = 200, description = "Conversation list", body = [ConversationDto]))
)]
pub async fn get_conversations(
    Extension(svc): Extension<Arc<Service>>,
    Extension(identity): Extension<CallerIdentity>,
) -> Result<Json<Vec<ConversationDto>>, ProblemResponse> {
    let conversations = svc
        .get_user_conversations(identity.0.as_ref())
        .await
        .map_err(|e| domain_problem(e, "/messages/conversations"))?;
    Ok(Json(
        conversations.into_iter().map(ConversationDto::from).collect(),
    ))
}

/// Mark everything unread from one partner as read.
#[utoipa::path(
    post,
    path = "/messages/conversations/{user_id}/read",
    tag = "messaging",
    params(("user_id" = Uuid, Path, description = "Other user id")),
    responses(
        (status = 200, description = "Patched count", body = MarkedReadDto),
        (status = 401, description = "Unauthenticated"),
    )
)]
pub async fn mark_conversation_read(
    Extension(svc): Extension<Arc<Service>>,
    Extension(identity): Extension<CallerIdentity>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<MarkedReadDto>, ProblemResponse> {
    let updated = svc
        .mark_conversation_read(identity.0.as_ref(), user_id)
        .await
        .map_err(|e| domain_problem(e, &format!("/messages/conversations/{}/read", user_id)))?;
    Ok(Json(MarkedReadDto { updated }))
}

/// Mark a single message read (receiver only).
#[utoipa::path(
    post,
    path = "/messages/{id}/read",
    tag = "messaging",
    params(("id" = Uuid, Path, description = "Message id")),
    responses(
        (status = 204, description = "Marked read"),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Caller is not the receiver"),
        (status = 404, description = "Unknown message"),
    )
)]
pub async fn mark_message_read(
    Extension(svc): Extension<Arc<Service>>,
    Extension(identity): Extension<CallerIdentity>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ProblemResponse> {
    svc.mark_message_read(identity.0.as_ref(), id)
        .await
        .map_err(|e| domain_problem(e, &format!("/messages/{}/read", id)))?;
    Ok(StatusCode::NO_CONTENT)
}

/// Badge counter for unread messages.
#[utoipa::path(
    get,
    path = "/messages/unread-count",
    tag = "messaging",
    responses((status = 200, description = "Unread message count", body = UnreadCountDto))
)]
pub async fn get_unread_count(
    Extension(svc): Extension<Arc<Service>>,
    Extension(identity): Extension<CallerIdentity>,
) -> Result<Json<UnreadCountDto>, ProblemResponse> {
    let count = svc
        .get_unread_count(identity.0.as_ref())
        .await
        .map_err(|e| domain_problem(e, "/messages/unread-count"))?;
    Ok(Json(UnreadCountDto { count }))
}
