use chrono::{DateTime, Utc};
use directory::contract::model::UserSummary;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::contract::model::{ConnectionStatusView, ConnectionWithUser, SendOutcome};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SendConnectionRequestReq {
    pub receiver_id: Uuid,
    /// Optional note shown to the receiver.
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SendOutcomeDto {
    pub connection_id: Uuid,
    /// True when the opposite-direction pending request was accepted
    /// instead of creating a new one.
    pub auto_accepted: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SuccessDto {
    pub success: bool,
}

impl SuccessDto {
    pub fn ok() -> Self {
        Self { success: true }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserSummaryDto {
    pub id: Uuid,
    pub name: String,
    pub avatar_url: Option<String>,
}

/// Connection edge enriched with the other party's profile summary.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ConnectionDto {
    pub id: Uuid,
    pub requester_id: Uuid,
    pub receiver_id: Uuid,
    /// `pending`, `accepted` or `rejected`.
    pub status: String,
    pub message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub responded_at: Option<DateTime<Utc>>,
    pub other_user: UserSummaryDto,
}

/// Relationship between the caller and another user.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ConnectionStatusDto {
    /// `none`, `pending`, `accepted` or `rejected`.
    pub status: String,
    pub connection_id: Option<Uuid>,
    /// `outbound` or `inbound`, present when an edge exists.
    pub direction: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PendingCountDto {
    pub count: u64,
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

impl From<SendOutcome> for SendOutcomeDto {
    fn from(outcome: SendOutcome) -> Self {
        Self {
            connection_id: outcome.connection_id,
            auto_accepted: outcome.auto_accepted,
        }
    }
}

impl From<ConnectionWithUser> for ConnectionDto {
    fn from(row: ConnectionWithUser) -> Self {
        Self {
            id: row.connection.id,
            requester_id: row.connection.requester_id,
            receiver_id: row.connection.receiver_id,
            status: row.connection.status.as_str().to_string(),
            message: row.connection.message,
            created_at: row.connection.created_at,
            responded_at: row.connection.responded_at,
            other_user: UserSummaryDto::from(row.other_user),
        }
    }
}

impl From<ConnectionStatusView> for ConnectionStatusDto {
    fn from(view: ConnectionStatusView) -> Self {
        Self {
            status: view
                .status
                .map(|s| s.as_str().to_string())
                .unwrap_or_else(|| "none".to_string()),
            connection_id: view.connection_id,
            direction: view.direction.map(|d| d.as_str().to_string()),
        }
    }
}
