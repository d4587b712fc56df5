use async_trait::async_trait;
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::contract::model::{SyncUser, User, UserSearch};
use crate::domain::repo::UsersRepository;
use crate::infra::storage::{entity, mapper};

/// SeaORM-backed implementation of the users repository port.
pub struct SeaOrmUsersRepository {
    db: DatabaseConnection,
}

impl SeaOrmUsersRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UsersRepository for SeaOrmUsersRepository {
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>> {
        let row = entity::find_by_id(&self.db, id).await?;
        Ok(row.map(mapper::entity_to_contract))
    }

    async fn find_by_subject(&self, subject: &str) -> anyhow::Result<Option<User>> {
        let row = entity::find_by_subject(&self.db, subject).await?;
        Ok(row.map(mapper::entity_to_contract))
    }

    async fn find_many(&self, ids: &[Uuid]) -> anyhow::Result<Vec<User>> {
        let rows = entity::find_many(&self.db, ids).await?;
        Ok(rows.into_iter().map(mapper::entity_to_contract).collect())
    }

    async fn upsert_by_subject(&self, candidate: User, sync: &SyncUser) -> anyhow::Result<User> {
        let stored = match entity::find_by_subject(&self.db, &sync.subject).await? {
            Some(existing) => {
                entity::update_sync_fields(
                    &self.db,
                    existing.id,
                    sync.name.clone(),
                    sync.email.clone(),
                    sync.avatar_url.clone(),
                )
                .await?
            }
            None => entity::insert(&self.db, mapper::contract_to_entity(candidate)).await?,
        };
        Ok(mapper::entity_to_contract(stored))
    }

    async fn update(&self, u: User) -> anyhow::Result<()> {
        entity::update_profile(&self.db, mapper::contract_to_entity(u)).await?;
        Ok(())
    }

    async fn delete_by_subject(&self, subject: &str) -> anyhow::Result<bool> {
        Ok(entity::delete_by_subject(&self.db, subject).await?)
    }

    async fn search(&self, filter: &UserSearch) -> anyhow::Result<Vec<User>> {
        let rows = entity::search(
            &self.db,
            filter.role.map(|r| r.as_str()),
            filter.query.as_deref(),
        )
        .await?;
        Ok(rows.into_iter().map(mapper::entity_to_contract).collect())
    }
}
