use async_trait::async_trait;
use uuid::Uuid;

use crate::contract::model::Message;

/// Port for message persistence.
///
/// Ordering contract: `conversation` returns ascending `(sent_at, id)`;
/// `all_touching` returns descending `(sent_at, id)`. The id tie-break makes
/// equal-timestamp ordering stable across calls.
#[async_trait]
pub trait MessagesRepository: Send + Sync {
    async fn insert(&self, message: Message) -> anyhow::Result<()>;

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Message>>;

    /// Set the read flag on a single message.
    async fn mark_read(&self, id: Uuid) -> anyhow::Result<()>;

    /// Bulk read-flag update for everything `receiver_id` has unread from
    /// `sender_id`. Returns the number of rows patched.
    async fn mark_conversation_read(
        &self,
        receiver_id: Uuid,
        sender_id: Uuid,
    ) -> anyhow::Result<u64>;

    /// Both directions between two users, oldest first.
    async fn conversation(&self, user_a: Uuid, user_b: Uuid) -> anyhow::Result<Vec<Message>>;

    /// Every message the user sent or received, newest first.
    async fn all_touching(&self, user_id: Uuid) -> anyhow::Result<Vec<Message>>;

    /// Unread messages addressed to the user.
    async fn unread_count(&self, user_id: Uuid) -> anyhow::Result<u64>;
}
