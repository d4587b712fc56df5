use std::sync::Arc;

use api_core::CallerContext;
use async_trait::async_trait;
use uuid::Uuid;

use crate::contract::{client::DirectoryApi, error::DirectoryError, model::User};
use crate::domain::service::Service;

/// In-process implementation of [`DirectoryApi`] delegating to the domain
/// service. Other modules hold this behind `Arc<dyn DirectoryApi>`.
pub struct DirectoryLocalClient {
    service: Arc<Service>,
}

impl DirectoryLocalClient {
    pub fn new(service: Arc<Service>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl DirectoryApi for DirectoryLocalClient {
    async fn resolve_subject(
        &self,
        subject: &str,
    ) -> Result<Option<CallerContext>, DirectoryError> {
        let user = self.service.resolve_subject(subject).await?;
        Ok(user.map(|u| CallerContext::new(u.id, u.subject)))
    }

    async fn get_user(&self, id: Uuid) -> Result<User, DirectoryError> {
        Ok(self.service.get_user(id).await?)
    }

    async fn get_users(&self, ids: &[Uuid]) -> Result<Vec<User>, DirectoryError> {
        Ok(self.service.get_users(ids).await?)
    }
}
