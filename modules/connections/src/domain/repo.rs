use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::contract::model::{Connection, ConnectionStatus};

/// Result of inserting a new edge under the `(requester, receiver)` unique
/// index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    /// Lost the race to another insert of the same ordered pair.
    DuplicateEdge,
}

/// Port for the connection state machine's persistence.
///
/// The conditional mutations (`set_status_if`, `delete_if`) are the
/// concurrency guard: they apply only while the row is still in the expected
/// state and report whether anything changed.
#[async_trait]
pub trait ConnectionsRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Connection>>;

    /// Load the edge for an ordered `(requester, receiver)` pair.
    async fn find_edge(
        &self,
        requester_id: Uuid,
        receiver_id: Uuid,
    ) -> anyhow::Result<Option<Connection>>;

    async fn insert(&self, connection: Connection) -> anyhow::Result<InsertOutcome>;

    /// Transition `expected -> next` and stamp `responded_at`, only if the
    /// row is still in `expected`. Returns false when it no longer is.
    async fn set_status_if(
        &self,
        id: Uuid,
        expected: ConnectionStatus,
        next: ConnectionStatus,
        responded_at: DateTime<Utc>,
    ) -> anyhow::Result<bool>;

    /// Delete the row only if it is still in `expected`.
    async fn delete_if(&self, id: Uuid, expected: ConnectionStatus) -> anyhow::Result<bool>;

    /// Accepted edges touching the user, either direction.
    async fn list_accepted_for(&self, user_id: Uuid) -> anyhow::Result<Vec<Connection>>;

    /// Pending requests addressed to the user.
    async fn list_pending_to(&self, user_id: Uuid) -> anyhow::Result<Vec<Connection>>;

    /// Pending requests sent by the user.
    async fn list_pending_from(&self, user_id: Uuid) -> anyhow::Result<Vec<Connection>>;

    async fn count_pending_to(&self, user_id: Uuid) -> anyhow::Result<u64>;
}
