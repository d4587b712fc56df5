use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::contract::model::Notification;
use crate::domain::repo::NotificationsRepository;
use crate::infra::storage::{entity, mapper};

/// SeaORM-backed implementation of the notifications repository port.
pub struct SeaOrmNotificationsRepository {
    db: DatabaseConnection,
}

impl SeaOrmNotificationsRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl NotificationsRepository for SeaOrmNotificationsRepository {
    async fn insert(&self, notification: Notification) -> anyhow::Result<()> {
        entity::insert(&self.db, mapper::contract_to_entity(notification)).await?;
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Notification>> {
        let row = entity::find_by_id(&self.db, id).await?;
        Ok(row.and_then(mapper::entity_to_contract))
    }

    async fn list_for(&self, user_id: Uuid, limit: u64) -> anyhow::Result<Vec<Notification>> {
        let rows = entity::list_for(&self.db, user_id, limit).await?;
        Ok(rows
            .into_iter()
            .filter_map(mapper::entity_to_contract)
            .collect())
    }

    async fn list_unread(&self, user_id: Uuid) -> anyhow::Result<Vec<Notification>> {
        let rows = entity::list_unread(&self.db, user_id).await?;
        Ok(rows
            .into_iter()
            .filter_map(mapper::entity_to_contract)
            .collect())
    }

    async fn list_starred(&self, user_id: Uuid) -> anyhow::Result<Vec<Notification>> {
        let rows = entity::list_starred(&self.db, user_id).await?;
        Ok(rows
            .into_iter()
            .filter_map(mapper::entity_to_contract)
            .collect())
    }

    async fn unread_count(&self, user_id: Uuid) -> anyhow::Result<u64> {
        Ok(entity::unread_count(&self.db, user_id).await?)
    }

    async fn set_read(&self, id: Uuid, read_at: Option<DateTime<Utc>>) -> anyhow::Result<()> {
        entity::set_read(&self.db, id, read_at).await?;
        Ok(())
    }

    async fn set_starred(&self, id: Uuid, starred: bool) -> anyhow::Result<()> {
        entity::set_starred(&self.db, id, starred).await?;
        Ok(())
    }

    async fn mark_all_read(&self, user_id: Uuid, now: DateTime<Utc>) -> anyhow::Result<u64> {
        Ok(entity::mark_all_read(&self.db, user_id, now).await?)
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<bool> {
        Ok(entity::delete_by_id(&self.db, id).await? > 0)
    }

    async fn delete_all(&self, user_id: Uuid) -> anyhow::Result<u64> {
        Ok(entity::delete_all_for(&self.db, user_id).await?)
    }
}
