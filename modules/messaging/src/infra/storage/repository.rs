use async_trait::async_trait;
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::contract::model::Message;
use crate::domain::repo::MessagesRepository;
use crate::infra::storage::{entity, mapper};

/// SeaORM-backed implementation of the messages repository port.
pub struct SeaOrmMessagesRepository {
    db: DatabaseConnection,
}

impl SeaOrmMessagesRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl MessagesRepository for SeaOrmMessagesRepository {
    async fn insert(&self, message: Message) -> anyhow::Result<()> {
        entity::insert(&self.db, mapper::contract_to_entity(message)).await?;
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Message>> {
        let row = entity::find_by_id(&self.db, id).await?;
        Ok(row.map(mapper::entity_to_contract))
    }

    async fn mark_read(&self, id: Uuid) -> anyhow::Result<()> {
        entity::mark_read(&self.db, id).await?;
        Ok(())
    }

    async fn mark_conversation_read(
        &self,
        receiver_id: Uuid,
        sender_id: Uuid,
    ) -> anyhow::Result<u64> {
        Ok(entity::mark_conversation_read(&self.db, receiver_id, sender_id).await?)
    }

    async fn conversation(&self, user_a: Uuid, user_b: Uuid) -> anyhow::Result<Vec<Message>> {
        let rows = entity::conversation(&self.db, user_a, user_b).await?;
        Ok(rows.into_iter().map(mapper::entity_to_contract).collect())
    }

    async fn all_touching(&self, user_id: Uuid) -> anyhow::Result<Vec<Message>> {
        let rows = entity::all_touching(&self.db, user_id).await?;
        Ok(rows.into_iter().map(mapper::entity_to_contract).collect())
    }

    async fn unread_count(&self, user_id: Uuid) -> anyhow::Result<u64> {
        Ok(entity::unread_count(&self.db, user_id).await?)
    }
}
