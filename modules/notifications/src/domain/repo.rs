use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::contract::model::Notification;

/// Port for notification persistence.
///
/// Listing contract: all list methods return newest first, descending
/// `(created_at, id)` so equal timestamps stay stable across calls.
#[async_trait]
pub trait NotificationsRepository: Send + Sync {
    async fn insert(&self, notification: Notification) -> anyhow::Result<()>;

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Notification>>;

    /// Newest notifications owned by the user, at most `limit`.
    async fn list_for(&self, user_id: Uuid, limit: u64) -> anyhow::Result<Vec<Notification>>;

    async fn list_unread(&self, user_id: Uuid) -> anyhow::Result<Vec<Notification>>;

    async fn list_starred(&self, user_id: Uuid) -> anyhow::Result<Vec<Notification>>;

    async fn unread_count(&self, user_id: Uuid) -> anyhow::Result<u64>;

    /// Set or clear the read flag; `read_at` is stored alongside.
    async fn set_read(&self, id: Uuid, read_at: Option<DateTime<Utc>>) -> anyhow::Result<()>;

    async fn set_starred(&self, id: Uuid, starred: bool) -> anyhow::Result<()>;

    /// Flag every unread notification of the user. Returns rows patched.
    async fn mark_all_read(&self, user_id: Uuid, now: DateTime<Utc>) -> anyhow::Result<u64>;

    /// Returns whether a row was actually deleted.
    async fn delete(&self, id: Uuid) -> anyhow::Result<bool>;

    /// Clear the user's notification list. Returns rows deleted.
    async fn delete_all(&self, user_id: Uuid) -> anyhow::Result<u64>;
}
