use async_trait::async_trait;
use uuid::Uuid;

use crate::contract::model::{SyncUser, User, UserSearch};

/// Port for the domain layer: persistence operations the domain needs.
#[async_trait]
pub trait UsersRepository: Send + Sync {
    /// Load a user by id.
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>>;

    /// Load a user by external identity subject (unique, indexed).
    async fn find_by_subject(&self, subject: &str) -> anyhow::Result<Option<User>>;

    /// Batch load. Ids without a row are skipped.
    async fn find_many(&self, ids: &[Uuid]) -> anyhow::Result<Vec<User>>;

    /// Insert-or-update keyed on subject: inserts `candidate` for a new
    /// subject, otherwise refreshes name/email/avatar only. Returns the
    /// stored row.
    async fn upsert_by_subject(&self, candidate: User, sync: &SyncUser) -> anyhow::Result<User>;

    /// Persist a full user row (by primary key in `u.id`).
    async fn update(&self, u: User) -> anyhow::Result<()>;

    /// Delete by subject. Returns true if a row was deleted.
    async fn delete_by_subject(&self, subject: &str) -> anyhow::Result<bool>;

    /// Role/substring search over the whole directory.
    async fn search(&self, filter: &UserSearch) -> anyhow::Result<Vec<User>>;
}
