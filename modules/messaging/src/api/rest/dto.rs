use chrono::{DateTime, Utc};
use directory::contract::model::UserSummary;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::contract::model::{Conversation, Message};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SendMessageReq {
    pub receiver_id: Uuid,
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageSentDto {
    pub message_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageDto {
    pub id: Uuid,
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
    pub content: String,
    pub sent_at: DateTime<Utc>,
    pub is_read: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserSummaryDto {
    pub id: Uuid,
    pub name: String,
    pub avatar_url: Option<String>,
}

/// One conversation-list entry per partner.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ConversationDto {
    pub other_user: UserSummaryDto,
    pub last_message: MessageDto,
    pub unread_count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MarkedReadDto {
    /// Number of messages flipped to read by this call.
    pub updated: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UnreadCountDto {
    pub count: u64,
}

impl From<Message> for MessageDto {
    fn from(message: Message) -> Self {
        Self {
            id: message.id,
            sender_id: message.sender_id,
            receiver_id: message.receiver_id,
            content: message.content,
            sent_at: message.sent_at,
            is_read: message.is_read,
        }
    }
}

impl From<UserSummary> for UserSummaryDto {
    fn from(summary: UserSummary) -> Self {
        Self {
            id: summary.id,
            name: summary.name,
            avatar_url: summary.avatar_url,
        }
    }
}

impl From<Conversation> for ConversationDto {
    fn from(conversation: Conversation) -> Self {
        Self {
            other_user: UserSummaryDto::from(conversation.other_user),
            last_message: MessageDto::from(conversation.last_message),
            unread_count: conversation.unread_count,
        }
    }
}
