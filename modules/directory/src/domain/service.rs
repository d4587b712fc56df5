use std::sync::Arc;

use api_core::CallerContext;
use chrono::Utc;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::contract::model::{ProfilePatch, SyncUser, User, UserSearch};
use crate::domain::error::DomainError;
use crate::domain::repo::UsersRepository;

/// Domain service with business rules for the user directory.
/// Depends only on the repository port, not on infra types.
#[derive(Clone)]
pub struct Service {
    repo: Arc<dyn UsersRepository>,
}

impl Service {
    pub fn new(repo: Arc<dyn UsersRepository>) -> Self {
        Self { repo }
    }

    /// Map an identity-provider subject to the stored user, if any.
    /// Unknown subjects are a normal outcome, not an error.
    #[instrument(name = "directory.service.resolve_subject", skip(self, subject))]
    pub async fn resolve_subject(&self, subject: &str) -> Result<Option<User>, DomainError> {
        if subject.trim().is_empty() {
            return Ok(None);
        }
        self.repo
            .find_by_subject(subject)
            .await
            .map_err(|e| DomainError::database(e.to_string()))
    }

    /// Identity-provider sync: create the user on first sight, refresh
    /// name/email/avatar afterwards. Profile fields edited in-app survive.
    #[instrument(name = "directory.service.sync_user", skip(self, sync), fields(subject = %sync.subject))]
    pub async fn sync_user(&self, mut sync: SyncUser) -> Result<User, DomainError> {
        if sync.subject.trim().is_empty() {
            return Err(DomainError::validation("subject must not be empty"));
        }
        if !sync.email.contains('@') {
            return Err(DomainError::validation("email must contain '@'"));
        }
        sync.name = derive_display_name(&sync.name, &sync.email);

        let candidate = User {
            id: Uuid::new_v4(),
            subject: sync.subject.clone(),
            name: sync.name.clone(),
            email: sync.email.clone(),
            role: Default::default(),
            bio: None,
            skills: Vec::new(),
            location: None,
            avatar_url: sync.avatar_url.clone(),
            created_at: Utc::now(),
        };

        let user = self
            .repo
            .upsert_by_subject(candidate, &sync)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;

        info!(user_id = %user.id, "Synced user from identity provider");
        Ok(user)
    }

    /// Account-deletion sync. Connections, messages and notifications owned
    /// by the user go with it (FK cascade).
    #[instrument(name = "directory.service.delete_user", skip(self, subject))]
    pub async fn delete_user(&self, subject: &str) -> Result<(), DomainError> {
        let deleted = self
            .repo
            .delete_by_subject(subject)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;

        if !deleted {
            return Err(DomainError::subject_not_found(subject));
        }

        info!("Deleted user for removed identity");
        Ok(())
    }

    #[instrument(name = "directory.service.get_user", skip(self), fields(user_id = %id))]
    pub async fn get_user(&self, id: Uuid) -> Result<User, DomainError> {
        self.repo
            .find_by_id(id)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?
            .ok_or_else(|| DomainError::user_not_found(id))
    }

    #[instrument(name = "directory.service.get_users", skip(self, ids))]
    pub async fn get_users(&self, ids: &[Uuid]) -> Result<Vec<User>, DomainError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        self.repo
            .find_many(ids)
            .await
            .map_err(|e| DomainError::database(e.to_string()))
    }

    /// The caller's own profile; `None` for anonymous callers.
    #[instrument(name = "directory.service.current_user", skip(self, caller))]
    pub async fn current_user(
        &self,
        caller: Option<&CallerContext>,
    ) -> Result<Option<User>, DomainError> {
        let Some(ctx) = caller else {
            return Ok(None);
        };
        self.repo
            .find_by_id(ctx.user_id)
            .await
            .map_err(|e| DomainError::database(e.to_string()))
    }

    /// Caller edits their own profile. Fails closed for anonymous callers.
    #[instrument(name = "directory.service.update_profile", skip(self, caller, patch))]
    pub async fn update_profile(
        &self,
        caller: Option<&CallerContext>,
        patch: ProfilePatch,
    ) -> Result<User, DomainError> {
        let ctx = caller.ok_or_else(DomainError::unauthenticated)?;

        if let Some(ref name) = patch.name {
            if name.trim().is_empty() {
                return Err(DomainError::validation("name must not be empty"));
            }
        }

        let mut current = self
            .repo
            .find_by_id(ctx.user_id)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?
            .ok_or_else(|| DomainError::user_not_found(ctx.user_id))?;

        if let Some(name) = patch.name {
            current.name = name;
        }
        if let Some(bio) = patch.bio {
            current.bio = Some(bio);
        }
        if let Some(skills) = patch.skills {
            current.skills = skills;
        }
        if let Some(location) = patch.location {
            current.location = Some(location);
        }
        if let Some(avatar_url) = patch.avatar_url {
            current.avatar_url = Some(avatar_url);
        }
        if let Some(role) = patch.role {
            current.role = role;
        }

        self.repo
            .update(current.clone())
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;

        debug!(user_id = %current.id, "Updated profile");
        Ok(current)
    }

    /// Directory search. Anonymous callers see an empty result, not an error.
    #[instrument(name = "directory.service.search_users", skip(self, caller, filter))]
    pub async fn search_users(
        &self,
        caller: Option<&CallerContext>,
        filter: UserSearch,
    ) -> Result<Vec<User>, DomainError> {
        if caller.is_none() {
            return Ok(Vec::new());
        }
        self.repo
            .search(&filter)
            .await
            .map_err(|e| DomainError::database(e.to_string()))
    }
}

/// Display-name fallback chain: provided name, then the email local part,
/// then a generic placeholder.
fn derive_display_name(name: &str, email: &str) -> String {
    let trimmed = name.trim();
    if !trimmed.is_empty() {
        return trimmed.to_string();
    }
    let local = email.split('@').next().unwrap_or("");
    if !local.is_empty() {
        return local.to_string();
    }
    "User".to_string()
}
