use chrono::{DateTime, Utc};
use directory::contract::model::UserSummary;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::contract::model::NotificationWithUser;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserSummaryDto {
    pub id: Uuid,
    pub name: String,
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NotificationDto {
    pub id: Uuid,
    /// One of `message`, `connection_request`, `connection_accepted`,
    /// `connection_removed`.
    pub kind: String,
    pub from_user: UserSummaryDto,
    pub title: String,
    pub body: Option<String>,
    pub related_message_id: Option<Uuid>,
    pub related_connection_id: Option<Uuid>,
    pub is_read: bool,
    pub is_starred: bool,
    pub created_at: DateTime<Utc>,
    pub read_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ListNotificationsQuery {
    /// Page size; defaults to 50 newest notifications.
    pub limit: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UnreadCountDto {
    pub count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StarredDto {
    pub is_starred: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdatedDto {
    /// Number of notifications this call touched.
    pub updated: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DeletedDto {
    pub deleted: u64,
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

impl From<NotificationWithUser> for NotificationDto {
    fn from(row: NotificationWithUser) -> Self {
        let n = row.notification;
        Self {
            id: n.id,
            kind: n.kind.as_str().to_string(),
            from_user: UserSummaryDto::from(row.from_user),
            title: n.title,
            body: n.body,
            related_message_id: n.related_message_id,
            related_connection_id: n.related_connection_id,
            is_read: n.is_read,
            is_starred: n.is_starred,
            created_at: n.created_at,
            read_at: n.read_at,
        }
    }
}
