use chrono::{DateTime, Utc};
use directory::contract::model::UserSummary;
use uuid::Uuid;

/// What a notification is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Message,
    ConnectionRequest,
    ConnectionAccepted,
    ConnectionRemoved,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::Message => "message",
            NotificationKind::ConnectionRequest => "connection_request",
            NotificationKind::ConnectionAccepted => "connection_accepted",
            NotificationKind::ConnectionRemoved => "connection_removed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "message" => Some(NotificationKind::Message),
            "connection_request" => Some(NotificationKind::ConnectionRequest),
            "connection_accepted" => Some(NotificationKind::ConnectionAccepted),
            "connection_removed" => Some(NotificationKind::ConnectionRemoved),
            _ => None,
        }
    }
}

/// One notification row, owned by `user_id`.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub id: Uuid,
    /// Owner: the user this notification is shown to.
    pub user_id: Uuid,
    pub kind: NotificationKind,
    /// The user whose action produced the notification.
    pub from_user_id: Uuid,
    pub title: String,
    pub body: Option<String>,
    pub related_message_id: Option<Uuid>,
    pub related_connection_id: Option<Uuid>,
    pub is_read: bool,
    pub is_starred: bool,
    pub created_at: DateTime<Utc>,
    pub read_at: Option<DateTime<Utc>>,
}

/// Notification enriched with the originating user's profile summary.
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationWithUser {
    pub notification: Notification,
    pub from_user: UserSummary,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_round_trips_through_strings() {
        for kind in [
            NotificationKind::Message,
            NotificationKind::ConnectionRequest,
            NotificationKind::ConnectionAccepted,
            NotificationKind::ConnectionRemoved,
        ] {
            assert_eq!(NotificationKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(NotificationKind::parse("mention"), None);
    }
}
