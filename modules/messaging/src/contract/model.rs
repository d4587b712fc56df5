use chrono::{DateTime, Utc};
use directory::contract::model::UserSummary;
use uuid::Uuid;

/// Direct message. Content is immutable after creation; only the read flag
/// ever changes, and only the receiver flips it.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub id: Uuid,
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
    pub content: String,
    pub sent_at: DateTime<Utc>,
    pub is_read: bool,
}

/// Conversation projection entry: one per partner the caller has exchanged
/// messages with.
#[derive(Debug, Clone, PartialEq)]
pub struct Conversation {
    pub other_user: UserSummary,
    pub last_message: Message,
    /// Messages from this partner the caller has not read yet.
    pub unread_count: u64,
}
