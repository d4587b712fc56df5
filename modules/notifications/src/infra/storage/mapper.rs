use crate::contract::model::{Notification, NotificationKind};
use crate::infra::storage::entity::Model as NotificationEntity;

/// Rows with a kind this build does not know are skipped rather than
/// failing the whole listing.
pub fn entity_to_contract(entity: NotificationEntity) -> Option<Notification> {
    let kind = NotificationKind::parse(&entity.kind)?;
    Some(Notification {
        id: entity.id,
        user_id: entity.user_id,
        kind,
        from_user_id: entity.from_user_id,
        title: entity.title,
        body: entity.body,
        related_message_id: entity.related_message_id,
        related_connection_id: entity.related_connection_id,
        is_read: entity.is_read,
        is_starred: entity.is_starred,
        created_at: entity.created_at,
        read_at: entity.read_at,
    })
}

pub fn contract_to_entity(notification: Notification) -> NotificationEntity {
    NotificationEntity {
        id: notification.id,
        user_id: notification.user_id,
        kind: notification.kind.as_str().to_string(),
        from_user_id: notification.from_user_id,
        title: notification.title,
        body: notification.body,
        related_message_id: notification.related_message_id,
        related_connection_id: notification.related_connection_id,
        is_read: notification.is_read,
        is_starred: notification.is_starred,
        created_at: notification.created_at,
        read_at: notification.read_at,
    }
}
