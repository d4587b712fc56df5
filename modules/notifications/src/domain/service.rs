use std::collections::HashMap;
use std::sync::Arc;

use api_core::CallerContext;
use chrono::Utc;
use directory::contract::{model::UserSummary, DirectoryApi};
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::contract::model::{Notification, NotificationKind, NotificationWithUser};
use crate::domain::error::DomainError;
use crate::domain::repo::NotificationsRepository;

/// Default page size for the notification list.
const DEFAULT_LIST_LIMIT: u64 = 50;

/// Everything needed to project an event into a notification row. Built by
/// the writer, stored verbatim apart from id and timestamps.
#[derive(Debug, Clone)]
pub struct NewNotification {
    pub user_id: Uuid,
    pub kind: NotificationKind,
    pub from_user_id: Uuid,
    pub title: String,
    pub body: Option<String>,
    pub related_message_id: Option<Uuid>,
    pub related_connection_id: Option<Uuid>,
}

/// Notification service: caller-scoped reads and flag updates over rows the
/// writer task projects from domain events. Mutations fail closed for
/// anonymous callers; reads degrade to empty/zero.
pub struct Service {
    repo: Arc<dyn NotificationsRepository>,
    directory: Arc<dyn DirectoryApi>,
}

impl Service {
    pub fn new(repo: Arc<dyn NotificationsRepository>, directory: Arc<dyn DirectoryApi>) -> Self {
        Self { repo, directory }
    }

    /// Store a projected row. Writer-side entry point, not caller-scoped.
    #[instrument(name = "notifications.service.record", skip(self, new), fields(user_id = %new.user_id, kind = new.kind.as_str()))]
    pub async fn record(&self, new: NewNotification) -> Result<Uuid, DomainError> {
        let notification = Notification {
            id: Uuid::new_v4(),
            user_id: new.user_id,
            kind: new.kind,
            from_user_id: new.from_user_id,
            title: new.title,
            body: new.body,
            related_message_id: new.related_message_id,
            related_connection_id: new.related_connection_id,
            is_read: false,
            is_starred: false,
            created_at: Utc::now(),
            read_at: None,
        };
        let id = notification.id;
        self.repo
            .insert(notification)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;
        debug!(notification_id = %id, "Recorded notification");
        Ok(id)
    }

    /// Newest notifications first; `limit` caps the page (default 50).
    #[instrument(name = "notifications.service.list", skip(self, caller))]
    pub async fn list_notifications(
        &self,
        caller: Option<&CallerContext>,
        limit: Option<u64>,
    ) -> Result<Vec<NotificationWithUser>, DomainError> {
        let Some(ctx) = caller else {
            return Ok(Vec::new());
        };
        let rows = self
            .repo
            .list_for(ctx.user_id, limit.unwrap_or(DEFAULT_LIST_LIMIT))
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;
        self.enrich(rows).await
    }

    #[instrument(name = "notifications.service.list_unread", skip(self, caller))]
    pub async fn list_unread(
        &self,
        caller: Option<&CallerContext>,
    ) -> Result<Vec<NotificationWithUser>, DomainError> {
        let Some(ctx) = caller else {
            return Ok(Vec::new());
        };
        let rows = self
            .repo
            .list_unread(ctx.user_id)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;
        self.enrich(rows).await
    }

    #[instrument(name = "notifications.service.list_starred", skip(self, caller))]
    pub async fn list_starred(
        &self,
        caller: Option<&CallerContext>,
    ) -> Result<Vec<NotificationWithUser>, DomainError> {
        let Some(ctx) = caller else {
            return Ok(Vec::new());
        };
        let rows = self
            .repo
            .list_starred(ctx.user_id)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;
        self.enrich(rows).await
    }

    #[instrument(name = "notifications.service.unread_count", skip(self, caller))]
    pub async fn get_unread_count(
        &self,
        caller: Option<&CallerContext>,
    ) -> Result<u64, DomainError> {
        let Some(ctx) = caller else {
            return Ok(0);
        };
        self.repo
            .unread_count(ctx.user_id)
            .await
            .map_err(|e| DomainError::database(e.to_string()))
    }

    /// Mark one notification read. Idempotent for already-read rows.
    #[instrument(name = "notifications.service.mark_read", skip(self, caller), fields(notification_id = %notification_id))]
    pub async fn mark_read(
        &self,
        caller: Option<&CallerContext>,
        notification_id: Uuid,
    ) -> Result<(), DomainError> {
        let row = self.owned(caller, notification_id).await?;
        if row.is_read {
            return Ok(());
        }
        self.repo
            .set_read(notification_id, Some(Utc::now()))
            .await
            .map_err(|e| DomainError::database(e.to_string()))
    }

    /// Flip a read notification back to unread; clears `read_at`.
    #[instrument(name = "notifications.service.mark_unread", skip(self, caller), fields(notification_id = %notification_id))]
    pub async fn mark_unread(
        &self,
        caller: Option<&CallerContext>,
        notification_id: Uuid,
    ) -> Result<(), DomainError> {
        let row = self.owned(caller, notification_id).await?;
        if !row.is_read {
            return Ok(());
        }
        self.repo
            .set_read(notification_id, None)
            .await
            .map_err(|e| DomainError::database(e.to_string()))
    }

    /// Toggle the star flag; returns the new value.
    #[instrument(name = "notifications.service.toggle_star", skip(self, caller), fields(notification_id = %notification_id))]
    pub async fn toggle_star(
        &self,
        caller: Option<&CallerContext>,
        notification_id: Uuid,
    ) -> Result<bool, DomainError> {
        let row = self.owned(caller, notification_id).await?;
        let starred = !row.is_starred;
        self.repo
            .set_starred(notification_id, starred)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;
        Ok(starred)
    }

    /// Mark everything unread as read; returns rows patched.
    #[instrument(name = "notifications.service.mark_all_read", skip(self, caller))]
    pub async fn mark_all_read(
        &self,
        caller: Option<&CallerContext>,
    ) -> Result<u64, DomainError> {
        let ctx = caller.ok_or_else(DomainError::unauthenticated)?;
        let patched = self
            .repo
            .mark_all_read(ctx.user_id, Utc::now())
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;
        info!(patched, "Marked all notifications read");
        Ok(patched)
    }

    #[instrument(name = "notifications.service.delete", skip(self, caller), fields(notification_id = %notification_id))]
    pub async fn delete_notification(
        &self,
        caller: Option<&CallerContext>,
        notification_id: Uuid,
    ) -> Result<(), DomainError> {
        self.owned(caller, notification_id).await?;
        let deleted = self
            .repo
            .delete(notification_id)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;
        if !deleted {
            return Err(DomainError::notification_not_found(notification_id));
        }
        Ok(())
    }

    /// Clear the caller's whole notification list; returns rows deleted.
    #[instrument(name = "notifications.service.delete_all", skip(self, caller))]
    pub async fn delete_all(&self, caller: Option<&CallerContext>) -> Result<u64, DomainError> {
        let ctx = caller.ok_or_else(DomainError::unauthenticated)?;
        let deleted = self
            .repo
            .delete_all(ctx.user_id)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;
        info!(deleted, "Cleared notification list");
        Ok(deleted)
    }

    /// Load a row and check the caller owns it.
    async fn owned(
        &self,
        caller: Option<&CallerContext>,
        notification_id: Uuid,
    ) -> Result<Notification, DomainError> {
        let ctx = caller.ok_or_else(DomainError::unauthenticated)?;
        let row = self
            .repo
            .find_by_id(notification_id)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?
            .ok_or_else(|| DomainError::notification_not_found(notification_id))?;
        if row.user_id != ctx.user_id {
            return Err(DomainError::Forbidden);
        }
        Ok(row)
    }

    /// Attach the originating user's summary. Rows whose actor vanished from
    /// the directory are dropped rather than served half-empty.
    async fn enrich(
        &self,
        rows: Vec<Notification>,
    ) -> Result<Vec<NotificationWithUser>, DomainError> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        let mut from_ids: Vec<Uuid> = rows.iter().map(|n| n.from_user_id).collect();
        from_ids.sort_unstable();
        from_ids.dedup();

        let users = self
            .directory
            .get_users(&from_ids)
            .await
            .map_err(|_| DomainError::database("directory lookup failed"))?;
        let by_id: HashMap<Uuid, UserSummary> =
            users.iter().map(|u| (u.id, UserSummary::from(u))).collect();

        Ok(rows
            .into_iter()
            .filter_map(|notification| {
                let from_user = by_id.get(&notification.from_user_id)?.clone();
                Some(NotificationWithUser {
                    notification,
                    from_user,
                })
            })
            .collect())
    }
}
