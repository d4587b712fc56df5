use std::sync::Arc;

use axum::{
    routing::{get, post},
    Extension, Router,
};
use utoipa::OpenApi;

use crate::api::rest::{dto, handlers};
use crate::domain::service::Service;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::send_message,
        handlers::get_conversation,
        handlers::get_conversations,
        handlers::mark_conversation_read,
        handlers::mark_message_read,
        handlers::get_unread_count,
    ),
    components(schemas(
        dto::SendMessageReq,
        dto::MessageSentDto,
        dto::MessageDto,
        dto::UserSummaryDto,
        dto::ConversationDto,
        dto::MarkedReadDto,
        dto::UnreadCountDto,
    )),
    tags((name = "messaging", description = "Direct messages and conversations"))
)]
pub struct ApiDoc;

/// Messaging routes, mounted by the gateway under `/api/v1`.
pub fn router(service: Arc<Service>) -> Router {
    Router::new()
        .route("/messages", post(handlers::send_message))
        .route("/messages/unread-count", get(handlers::get_unread_count))
        .route(
            "/messages/conversations",
            get(handlers::get_conversations),
        )
        .route(
            "/messages/conversations/{user_id}",
            get(handlers::get_conversation),
        )
        .route(
            "/messages/conversations/{user_id}/read",
            post(handlers::mark_conversation_read),
        )
        .route("/messages/{id}/read", post(handlers::mark_message_read))
        .layer(Extension(service))
}
