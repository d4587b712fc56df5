use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use api_core::{BroadcastPublisher, CallerContext};
use sea_orm::{Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use tokio::task::JoinHandle;
use uuid::Uuid;

use connections::{
    contract::events::ConnectionEvent, domain::service::Service as ConnectionsService,
    infra::storage::repository::SeaOrmConnectionsRepository,
};
use directory::{
    contract::model::SyncUser, contract::DirectoryApi,
    domain::service::Service as DirectoryService, gateways::local::DirectoryLocalClient,
    infra::storage::repository::SeaOrmUsersRepository,
};
use messaging::{
    contract::events::MessageEvent, domain::service::Service as MessagingService,
    infra::storage::repository::SeaOrmMessagesRepository,
};
use notifications::{
    contract::model::NotificationKind, domain::error::DomainError,
    domain::service::Service as NotificationsService,
    infra::storage::repository::SeaOrmNotificationsRepository, writer,
};

struct TestEnv {
    directory: Arc<DirectoryService>,
    connections: ConnectionsService,
    messaging: MessagingService,
    notifications: Arc<NotificationsService>,
    writer: JoinHandle<()>,
}

async fn create_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to connect to test database");
    directory::Migrator::up(&db, None)
        .await
        .expect("directory migrations");
    connections::Migrator::up(&db, None)
        .await
        .expect("connections migrations");
    messaging::Migrator::up(&db, None)
        .await
        .expect("messaging migrations");
    notifications::Migrator::up(&db, None)
        .await
        .expect("notifications migrations");
    db
}

/// Full wiring: real services on one database, broadcast publishers and the
/// writer task subscribed exactly as the server wires them.
async fn create_env() -> TestEnv {
    let db = create_test_db().await;
    let directory = Arc::new(DirectoryService::new(Arc::new(SeaOrmUsersRepository::new(
        db.clone(),
    ))));
    let directory_client: Arc<dyn DirectoryApi> =
        Arc::new(DirectoryLocalClient::new(directory.clone()));

    let conn_events = BroadcastPublisher::<ConnectionEvent>::new(64);
    let msg_events = BroadcastPublisher::<MessageEvent>::new(64);
    let conn_rx = conn_events.subscribe();
    let msg_rx = msg_events.subscribe();

    let connections = ConnectionsService::new(
        Arc::new(SeaOrmConnectionsRepository::new(db.clone())),
        directory_client.clone(),
        Arc::new(conn_events),
    );
    let messaging = MessagingService::new(
        Arc::new(SeaOrmMessagesRepository::new(db.clone())),
        directory_client.clone(),
        Arc::new(msg_events),
    );
    let notifications = Arc::new(NotificationsService::new(
        Arc::new(SeaOrmNotificationsRepository::new(db)),
        directory_client.clone(),
    ));
    let writer = writer::spawn(
        notifications.clone(),
        directory_client,
        conn_rx,
        msg_rx,
    );

    TestEnv {
        directory,
        connections,
        messaging,
        notifications,
        writer,
    }
}

impl TestEnv {
    async fn user(&self, subject: &str, name: &str) -> CallerContext {
        let user = self
            .directory
            .sync_user(SyncUser {
                subject: subject.to_string(),
                name: name.to_string(),
                email: format!("{}@example.com", subject),
                avatar_url: None,
            })
            .await
            .expect("sync user");
        CallerContext::new(user.id, subject)
    }

    /// The writer runs asynchronously; poll until the unread badge reaches
    /// the expected value or give up loudly.
    async fn wait_for_unread(&self, ctx: &CallerContext, expected: u64) {
        for _ in 0..100 {
            let count = self
                .notifications
                .get_unread_count(Some(ctx))
                .await
                .expect("unread count");
            if count == expected {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("unread count never reached {expected} for {}", ctx.subject);
    }
}

#[tokio::test]
async fn message_event_becomes_receiver_notification() -> Result<()> {
    let env = create_env().await;
    let a = env.user("u_a", "Ada").await;
    let b = env.user("u_b", "Bram").await;

    let message_id = env.messaging.send_message(Some(&a), b.user_id, "hi").await?;
    env.wait_for_unread(&b, 1).await;

    let rows = env.notifications.list_notifications(Some(&b), None).await?;
    assert_eq!(rows.len(), 1);
    let n = &rows[0].notification;
    assert_eq!(n.kind, NotificationKind::Message);
    assert_eq!(n.user_id, b.user_id);
    assert_eq!(n.from_user_id, a.user_id);
    assert_eq!(n.title, "New message from Ada");
    assert_eq!(n.related_message_id, Some(message_id));
    assert!(!n.is_read);
    assert_eq!(rows[0].from_user.name, "Ada");

    // The sender gets nothing.
    assert_eq!(env.notifications.get_unread_count(Some(&a)).await?, 0);
    Ok(())
}

#[tokio::test]
async fn request_and_accept_notify_the_right_parties() -> Result<()> {
    let env = create_env().await;
    let a = env.user("u_a", "Ada").await;
    let b = env.user("u_b", "Bram").await;

    let outcome = env
        .connections
        .send_connection_request(Some(&a), b.user_id, Some("let's connect".to_string()))
        .await?;
    env.wait_for_unread(&b, 1).await;

    let inbox = env.notifications.list_notifications(Some(&b), None).await?;
    assert_eq!(inbox[0].notification.kind, NotificationKind::ConnectionRequest);
    assert_eq!(inbox[0].notification.title, "Ada sent you a connection request");
    // The request message travels with the notification.
    assert_eq!(
        inbox[0].notification.body.as_deref(),
        Some("let's connect")
    );
    assert_eq!(
        inbox[0].notification.related_connection_id,
        Some(outcome.connection_id)
    );

    env.connections
        .accept_connection_request(Some(&b), outcome.connection_id)
        .await?;
    env.wait_for_unread(&a, 1).await;

    let requester_inbox = env.notifications.list_notifications(Some(&a), None).await?;
    assert_eq!(
        requester_inbox[0].notification.kind,
        NotificationKind::ConnectionAccepted
    );
    assert_eq!(
        requester_inbox[0].notification.title,
        "Bram accepted your connection request"
    );
    assert_eq!(requester_inbox[0].notification.body, None);
    Ok(())
}

#[tokio::test]
async fn auto_accept_notifies_both_parties() -> Result<()> {
    let env = create_env().await;
    let a = env.user("u_a", "Ada").await;
    let b = env.user("u_b", "Bram").await;

    env.connections
        .send_connection_request(Some(&a), b.user_id, None)
        .await?;
    let outcome = env
        .connections
        .send_connection_request(Some(&b), a.user_id, None)
        .await?;
    assert!(outcome.auto_accepted);

    // Request notification plus connected notification for B's counterpart.
    env.wait_for_unread(&a, 1).await;
    env.wait_for_unread(&b, 2).await;

    let for_a = env.notifications.list_unread(Some(&a)).await?;
    assert_eq!(for_a.len(), 1);
    assert_eq!(for_a[0].notification.kind, NotificationKind::ConnectionAccepted);
    assert_eq!(for_a[0].notification.title, "You are now connected with Bram");

    let kinds: Vec<NotificationKind> = env
        .notifications
        .list_unread(Some(&b))
        .await?
        .iter()
        .map(|n| n.notification.kind)
        .collect();
    assert!(kinds.contains(&NotificationKind::ConnectionAccepted));
    assert!(kinds.contains(&NotificationKind::ConnectionRequest));
    Ok(())
}

#[tokio::test]
async fn rejection_stays_silent_and_removal_notifies_other_party() -> Result<()> {
    let env = create_env().await;
    let a = env.user("u_a", "Ada").await;
    let b = env.user("u_b", "Bram").await;
    let c = env.user("u_c", "Cleo").await;

    // Rejection: the requester is never told.
    let rejected = env
        .connections
        .send_connection_request(Some(&a), c.user_id, None)
        .await?;
    env.connections
        .reject_connection_request(Some(&c), rejected.connection_id)
        .await?;

    // Accepted edge, then removed by A.
    let outcome = env
        .connections
        .send_connection_request(Some(&a), b.user_id, None)
        .await?;
    env.connections
        .accept_connection_request(Some(&b), outcome.connection_id)
        .await?;
    env.wait_for_unread(&a, 1).await;
    env.wait_for_unread(&b, 1).await;

    env.connections
        .remove_connection(Some(&a), outcome.connection_id)
        .await?;

    // Deleting the connection cascades away the request and accepted
    // notifications; only the removal notice survives, as it carries no
    // connection reference.
    env.wait_for_unread(&a, 0).await;
    env.wait_for_unread(&b, 1).await;

    let removed = env.notifications.list_notifications(Some(&b), None).await?;
    assert_eq!(removed.len(), 1);
    assert_eq!(
        removed[0].notification.kind,
        NotificationKind::ConnectionRemoved
    );
    assert_eq!(removed[0].notification.title, "Ada removed the connection");
    assert_eq!(removed[0].notification.related_connection_id, None);

    // Nothing about the rejection anywhere.
    let all_a = env.notifications.list_notifications(Some(&a), None).await?;
    assert!(all_a
        .iter()
        .all(|n| n.notification.from_user_id != c.user_id));
    assert_eq!(env.notifications.get_unread_count(Some(&c)).await?, 1);
    Ok(())
}

#[tokio::test]
async fn read_flags_star_and_delete_are_owner_scoped() -> Result<()> {
    let env = create_env().await;
    let a = env.user("u_a", "Ada").await;
    let b = env.user("u_b", "Bram").await;

    env.messaging.send_message(Some(&a), b.user_id, "one").await?;
    env.messaging.send_message(Some(&a), b.user_id, "two").await?;
    env.wait_for_unread(&b, 2).await;

    let rows = env.notifications.list_notifications(Some(&b), None).await?;
    let first = rows[0].notification.id;

    // Only the owner may touch a notification.
    assert!(matches!(
        env.notifications.mark_read(Some(&a), first).await,
        Err(DomainError::Forbidden)
    ));
    assert!(matches!(
        env.notifications.mark_read(Some(&b), Uuid::new_v4()).await,
        Err(DomainError::NotificationNotFound { .. })
    ));

    env.notifications.mark_read(Some(&b), first).await?;
    // Idempotent; read_at survives the second call.
    env.notifications.mark_read(Some(&b), first).await?;
    assert_eq!(env.notifications.get_unread_count(Some(&b)).await?, 1);
    let reread = env.notifications.list_notifications(Some(&b), None).await?;
    let read_row = reread
        .iter()
        .find(|n| n.notification.id == first)
        .expect("row still listed");
    assert!(read_row.notification.is_read);
    assert!(read_row.notification.read_at.is_some());

    env.notifications.mark_unread(Some(&b), first).await?;
    assert_eq!(env.notifications.get_unread_count(Some(&b)).await?, 2);

    assert!(env.notifications.toggle_star(Some(&b), first).await?);
    let starred = env.notifications.list_starred(Some(&b)).await?;
    assert_eq!(starred.len(), 1);
    assert_eq!(starred[0].notification.id, first);
    assert!(!env.notifications.toggle_star(Some(&b), first).await?);
    assert!(env.notifications.list_starred(Some(&b)).await?.is_empty());

    assert_eq!(env.notifications.mark_all_read(Some(&b)).await?, 2);
    assert_eq!(env.notifications.mark_all_read(Some(&b)).await?, 0);

    env.notifications.delete_notification(Some(&b), first).await?;
    assert!(matches!(
        env.notifications.delete_notification(Some(&b), first).await,
        Err(DomainError::NotificationNotFound { .. })
    ));
    assert_eq!(env.notifications.delete_all(Some(&b)).await?, 1);
    assert!(env
        .notifications
        .list_notifications(Some(&b), None)
        .await?
        .is_empty());
    Ok(())
}

#[tokio::test]
async fn list_is_newest_first_and_limited() -> Result<()> {
    let env = create_env().await;
    let a = env.user("u_a", "Ada").await;
    let b = env.user("u_b", "Bram").await;

    for text in ["one", "two", "three"] {
        env.messaging.send_message(Some(&a), b.user_id, text).await?;
    }
    env.wait_for_unread(&b, 3).await;

    let all = env.notifications.list_notifications(Some(&b), None).await?;
    assert_eq!(all.len(), 3);
    assert!(all
        .windows(2)
        .all(|w| w[0].notification.created_at >= w[1].notification.created_at));

    let page = env
        .notifications
        .list_notifications(Some(&b), Some(2))
        .await?;
    assert_eq!(page.len(), 2);
    assert_eq!(page[0].notification.id, all[0].notification.id);
    Ok(())
}

#[tokio::test]
async fn anonymous_callers_read_empty_and_cannot_mutate() -> Result<()> {
    let env = create_env().await;

    assert!(env.notifications.list_notifications(None, None).await?.is_empty());
    assert!(env.notifications.list_unread(None).await?.is_empty());
    assert!(env.notifications.list_starred(None).await?.is_empty());
    assert_eq!(env.notifications.get_unread_count(None).await?, 0);

    assert!(matches!(
        env.notifications.mark_all_read(None).await,
        Err(DomainError::Unauthenticated)
    ));
    assert!(matches!(
        env.notifications.delete_all(None).await,
        Err(DomainError::Unauthenticated)
    ));
    assert!(matches!(
        env.notifications.mark_read(None, Uuid::new_v4()).await,
        Err(DomainError::Unauthenticated)
    ));
    Ok(())
}

#[tokio::test]
async fn writer_stops_when_publishers_drop() -> Result<()> {
    let env = create_env().await;

    // Drop every publisher by dropping the services that hold them.
    let TestEnv {
        directory: _directory,
        connections,
        messaging,
        notifications: _notifications,
        writer,
    } = env;
    drop(connections);
    drop(messaging);

    tokio::time::timeout(Duration::from_secs(2), writer)
        .await
        .expect("writer should stop once channels close")
        .expect("writer task should not panic");
    Ok(())
}
