use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{DatabaseConnection, DbErr};
use uuid::Uuid;

use crate::contract::model::{Connection, ConnectionStatus};
use crate::domain::repo::{ConnectionsRepository, InsertOutcome};
use crate::infra::storage::{entity, mapper};

/// SeaORM-backed implementation of the connections repository port.
pub struct SeaOrmConnectionsRepository {
    db: DatabaseConnection,
}

impl SeaOrmConnectionsRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// SQLite reports unique-index collisions as execution errors; the message
/// is the only portable discriminator sqlx exposes for them.
fn is_unique_violation(err: &DbErr) -> bool {
    err.to_string().contains("UNIQUE constraint failed")
}

#[async_trait]
impl ConnectionsRepository for SeaOrmConnectionsRepository {
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Connection>> {
        let row = entity::find_by_id(&self.db, id).await?;
        Ok(row.map(mapper::entity_to_contract))
    }

    async fn find_edge(
        &self,
        requester_id: Uuid,
        receiver_id: Uuid,
    ) -> anyhow::Result<Option<Connection>> {
        let row = entity::find_edge(&self.db, requester_id, receiver_id).await?;
        Ok(row.map(mapper::entity_to_contract))
    }

    async fn insert(&self, connection: Connection) -> anyhow::Result<InsertOutcome> {
        match entity::insert(&self.db, mapper::contract_to_entity(connection)).await {
            Ok(_) => Ok(InsertOutcome::Inserted),
            Err(e) if is_unique_violation(&e) => Ok(InsertOutcome::DuplicateEdge),
            Err(e) => Err(e.into()),
        }
    }

    async fn set_status_if(
        &self,
        id: Uuid,
        expected: ConnectionStatus,
        next: ConnectionStatus,
        responded_at: DateTime<Utc>,
    ) -> anyhow::Result<bool> {
        let affected =
            entity::set_status_if(&self.db, id, expected.as_str(), next.as_str(), responded_at)
                .await?;
        Ok(affected > 0)
    }

    async fn delete_if(&self, id: Uuid, expected: ConnectionStatus) -> anyhow::Result<bool> {
        let affected = entity::delete_if(&self.db, id, expected.as_str()).await?;
        Ok(affected > 0)
    }

    async fn list_accepted_for(&self, user_id: Uuid) -> anyhow::Result<Vec<Connection>> {
        let rows = entity::list_for_user_with_status(&self.db, user_id, "accepted").await?;
        Ok(rows.into_iter().map(mapper::entity_to_contract).collect())
    }

    async fn list_pending_to(&self, user_id: Uuid) -> anyhow::Result<Vec<Connection>> {
        let rows = entity::list_pending_to(&self.db, user_id).await?;
        Ok(rows.into_iter().map(mapper::entity_to_contract).collect())
    }

    async fn list_pending_from(&self, user_id: Uuid) -> anyhow::Result<Vec<Connection>> {
        let rows = entity::list_pending_from(&self.db, user_id).await?;
        Ok(rows.into_iter().map(mapper::entity_to_contract).collect())
    }

    async fn count_pending_to(&self, user_id: Uuid) -> anyhow::Result<u64> {
        Ok(entity::count_pending_to(&self.db, user_id).await?)
    }
}
