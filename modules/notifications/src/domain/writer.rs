//! Writer task: subscribes to connection and message events and projects
//! them into notification rows.
//!
//! Strictly best-effort. A failed directory lookup or insert is logged and
//! the event dropped; a lagging receiver skips to the newest events. The
//! operations producing the events never see any of this.

use std::sync::Arc;

use connections::contract::events::ConnectionEvent;
use directory::contract::DirectoryApi;
use messaging::contract::events::MessageEvent;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::contract::model::NotificationKind;
use crate::domain::service::{NewNotification, Service};

/// Spawn the writer. The task ends when both event channels close.
pub fn spawn(
    service: Arc<Service>,
    directory: Arc<dyn DirectoryApi>,
    mut conn_rx: broadcast::Receiver<ConnectionEvent>,
    mut msg_rx: broadcast::Receiver<MessageEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!("Notification writer started");
        let mut conn_open = true;
        let mut msg_open = true;
        while conn_open || msg_open {
            tokio::select! {
                event = conn_rx.recv(), if conn_open => match event {
                    Ok(event) => handle_connection_event(&service, directory.as_ref(), event).await,
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(skipped, "Notification writer lagged on connection events");
                    }
                    Err(broadcast::error::RecvError::Closed) => conn_open = false,
                },
                event = msg_rx.recv(), if msg_open => match event {
                    Ok(event) => handle_message_event(&service, directory.as_ref(), event).await,
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(skipped, "Notification writer lagged on message events");
                    }
                    Err(broadcast::error::RecvError::Closed) => msg_open = false,
                },
            }
        }
        info!("Notification writer stopped");
    })
}

async fn handle_connection_event(
    service: &Service,
    directory: &dyn DirectoryApi,
    event: ConnectionEvent,
) {
    debug!(?event, "Projecting connection event");
    match event {
        ConnectionEvent::Requested {
            connection_id,
            requester_id,
            receiver_id,
            message,
        } => {
            let Some(name) = actor_name(directory, requester_id).await else {
                return;
            };
            record(
                service,
                NewNotification {
                    user_id: receiver_id,
                    kind: NotificationKind::ConnectionRequest,
                    from_user_id: requester_id,
                    title: format!("{name} sent you a connection request"),
                    body: message,
                    related_message_id: None,
                    related_connection_id: Some(connection_id),
                },
            )
            .await;
        }
        ConnectionEvent::Accepted {
            connection_id,
            requester_id,
            receiver_id,
        } => {
            let Some(name) = actor_name(directory, receiver_id).await else {
                return;
            };
            record(
                service,
                NewNotification {
                    user_id: requester_id,
                    kind: NotificationKind::ConnectionAccepted,
                    from_user_id: receiver_id,
                    title: format!("{name} accepted your connection request"),
                    body: None,
                    related_message_id: None,
                    related_connection_id: Some(connection_id),
                },
            )
            .await;
        }
        // Crossed requests: both sides learn the connection went live.
        ConnectionEvent::AutoAccepted {
            connection_id,
            requester_id,
            receiver_id,
        } => {
            for (owner, actor) in [(requester_id, receiver_id), (receiver_id, requester_id)] {
                let Some(name) = actor_name(directory, actor).await else {
                    continue;
                };
                record(
                    service,
                    NewNotification {
                        user_id: owner,
                        kind: NotificationKind::ConnectionAccepted,
                        from_user_id: actor,
                        title: format!("You are now connected with {name}"),
                        body: None,
                        related_message_id: None,
                        related_connection_id: Some(connection_id),
                    },
                )
                .await;
            }
        }
        // The row is already gone by the time this event arrives, so the
        // notification cannot reference it.
        ConnectionEvent::Removed {
            connection_id: _,
            removed_by,
            other_user_id,
        } => {
            let Some(name) = actor_name(directory, removed_by).await else {
                return;
            };
            record(
                service,
                NewNotification {
                    user_id: other_user_id,
                    kind: NotificationKind::ConnectionRemoved,
                    from_user_id: removed_by,
                    title: format!("{name} removed the connection"),
                    body: None,
                    related_message_id: None,
                    related_connection_id: None,
                },
            )
            .await;
        }
    }
}

async fn handle_message_event(
    service: &Service,
    directory: &dyn DirectoryApi,
    event: MessageEvent,
) {
    debug!(?event, "Projecting message event");
    match event {
        MessageEvent::Sent {
            message_id,
            sender_id,
            receiver_id,
        } => {
            let Some(name) = actor_name(directory, sender_id).await else {
                return;
            };
            record(
                service,
                NewNotification {
                    user_id: receiver_id,
                    kind: NotificationKind::Message,
                    from_user_id: sender_id,
                    title: format!("New message from {name}"),
                    body: None,
                    related_message_id: Some(message_id),
                    related_connection_id: None,
                },
            )
            .await;
        }
    }
}

async fn actor_name(directory: &dyn DirectoryApi, user_id: Uuid) -> Option<String> {
    match directory.get_user(user_id).await {
        Ok(user) => Some(user.name),
        Err(err) => {
            warn!(%user_id, error = %err, "Dropping event, actor lookup failed");
            None
        }
    }
}

async fn record(service: &Service, new: NewNotification) {
    if let Err(err) = service.record(new).await {
        warn!(error = %err, "Failed to record notification");
    }
}
