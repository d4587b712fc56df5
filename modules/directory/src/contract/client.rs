use api_core::CallerContext;
use async_trait::async_trait;
use uuid::Uuid;

use crate::contract::{error::DirectoryError, model::User};

/// Public API of the directory module for in-process consumers.
///
/// The connection and messaging modules depend on this trait only; the wider
/// profile/sync surface is reachable solely over REST.
#[async_trait]
pub trait DirectoryApi: Send + Sync {
    /// Map an external identity subject to a caller context.
    /// Unknown subjects resolve to `None`, never to an error.
    async fn resolve_subject(&self, subject: &str) -> Result<Option<CallerContext>, DirectoryError>;

    /// Get a user by internal id.
    async fn get_user(&self, id: Uuid) -> Result<User, DirectoryError>;

    /// Batch fetch for enrichment. Unknown ids are skipped.
    async fn get_users(&self, ids: &[Uuid]) -> Result<Vec<User>, DirectoryError>;
}
