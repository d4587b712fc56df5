use std::sync::Arc;

use anyhow::Result;
use api_core::{CallerContext, NoopPublisher};
use sea_orm::{Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use uuid::Uuid;

use directory::{
    contract::model::SyncUser, domain::service::Service as DirectoryService,
    gateways::local::DirectoryLocalClient, infra::storage::repository::SeaOrmUsersRepository,
};
use messaging::{
    domain::error::DomainError, domain::service::Service,
    infra::storage::repository::SeaOrmMessagesRepository,
};

struct TestEnv {
    directory: Arc<DirectoryService>,
    service: Service,
}

async fn create_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to connect to test database");
    directory::Migrator::up(&db, None)
        .await
        .expect("directory migrations");
    messaging::Migrator::up(&db, None)
        .await
        .expect("messaging migrations");
    db
}

async fn create_env() -> TestEnv {
    let db = create_test_db().await;
    let directory = Arc::new(DirectoryService::new(Arc::new(SeaOrmUsersRepository::new(
        db.clone(),
    ))));
    let service = Service::new(
        Arc::new(SeaOrmMessagesRepository::new(db)),
        Arc::new(DirectoryLocalClient::new(directory.clone())),
        Arc::new(NoopPublisher),
    );
    TestEnv { directory, service }
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
}

#[tokio::test]
async fn content_is_trimmed_and_empty_content_rejected() -> Result<()> {
    let env = create_env().await;
    let a = env.user("u_a", "Ada").await;
    let b = env.user("u_b", "Bram").await;

    let id = env
        .service
        .send_message(Some(&a), b.user_id, "  hello there  ")
        .await?;
    let conversation = env.service.get_conversation(Some(&a), b.user_id).await?;
    assert_eq!(conversation.len(), 1);
    assert_eq!(conversation[0].id, id);
    assert_eq!(conversation[0].content, "hello there");
    assert!(!conversation[0].is_read);

    assert!(matches!(
        env.service.send_message(Some(&a), b.user_id, "   ").await,
        Err(DomainError::EmptyContent)
    ));
    assert!(matches!(
        env.service.send_message(Some(&a), a.user_id, "hi").await,
        Err(DomainError::SelfMessage)
    ));
    assert!(matches!(
        env.service.send_message(None, b.user_id, "hi").await,
        Err(DomainError::Unauthenticated)
    ));
    Ok(())
}

#[tokio::test]
async fn conversation_is_ascending_for_any_interleaving() -> Result<()> {
    let env = create_env().await;
    let a = env.user("u_a", "Ada").await;
    let b = env.user("u_b", "Bram").await;

    env.service.send_message(Some(&a), b.user_id, "one").await?;
    env.service.send_message(Some(&b), a.user_id, "two").await?;
    env.service.send_message(Some(&a), b.user_id, "three").await?;
    env.service.send_message(Some(&b), a.user_id, "four").await?;

    // Same view from both sides, non-decreasing timestamps.
    for ctx in [&a, &b] {
        let other = if ctx.user_id == a.user_id {
            b.user_id
        } else {
            a.user_id
        };
        let messages = env.service.get_conversation(Some(ctx), other).await?;
        let contents: Vec<&str> = messages.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, ["one", "two", "three", "four"]);
        assert!(messages.windows(2).all(|w| w[0].sent_at <= w[1].sent_at));
    }
    Ok(())
}

#[tokio::test]
async fn unread_accounting_across_multiple_senders() -> Result<()> {
    let env = create_env().await;
    let u = env.user("u_u", "Uma").await;
    let s1 = env.user("u_s1", "Sender One").await;
    let s2 = env.user("u_s2", "Sender Two").await;

    env.service.send_message(Some(&s1), u.user_id, "m1").await?;
    env.service.send_message(Some(&s1), u.user_id, "m2").await?;
    env.service.send_message(Some(&s2), u.user_id, "m3").await?;
    assert_eq!(env.service.get_unread_count(Some(&u)).await?, 3);

    // Bulk read for one sender patches exactly that sender's messages.
    let patched = env
        .service
        .mark_conversation_read(Some(&u), s1.user_id)
        .await?;
    assert_eq!(patched, 2);
    assert_eq!(env.service.get_unread_count(Some(&u)).await?, 1);

    // Idempotent: nothing left to patch, no error.
    let again = env
        .service
        .mark_conversation_read(Some(&u), s1.user_id)
        .await?;
    assert_eq!(again, 0);
    Ok(())
}

#[tokio::test]
async fn single_message_read_is_receiver_only() -> Result<()> {
    let env = create_env().await;
    let a = env.user("u_a", "Ada").await;
    let b = env.user("u_b", "Bram").await;

    let id = env.service.send_message(Some(&a), b.user_id, "hi").await?;

    assert!(matches!(
        env.service.mark_message_read(Some(&a), id).await,
        Err(DomainError::Forbidden)
    ));
    assert!(matches!(
        env.service.mark_message_read(Some(&b), Uuid::new_v4()).await,
        Err(DomainError::MessageNotFound { .. })
    ));

    env.service.mark_message_read(Some(&b), id).await?;
    // Marking twice is fine.
    env.service.mark_message_read(Some(&b), id).await?;
    assert_eq!(env.service.get_unread_count(Some(&b)).await?, 0);
    Ok(())
}

#[tokio::test]
async fn conversations_group_by_partner_most_recent_first() -> Result<()> {
    let env = create_env().await;
    let u = env.user("u_u", "Uma").await;
    let p1 = env.user("u_p1", "Pia").await;
    let p2 = env.user("u_p2", "Quin").await;
    let p3 = env.user("u_p3", "Rae").await;

    env.service.send_message(Some(&p1), u.user_id, "from p1").await?;
    env.service.send_message(Some(&u), p2.user_id, "to p2").await?;
    env.service.send_message(Some(&p2), u.user_id, "from p2").await?;
    env.service.send_message(Some(&p3), u.user_id, "from p3 a").await?;
    env.service.send_message(Some(&p3), u.user_id, "from p3 b").await?;

    let conversations = env.service.get_user_conversations(Some(&u)).await?;
    assert_eq!(conversations.len(), 3);

    // Most recent conversation first.
    assert_eq!(conversations[0].other_user.name, "Rae");
    assert_eq!(conversations[0].last_message.content, "from p3 b");
    assert_eq!(conversations[0].unread_count, 2);

    assert_eq!(conversations[1].other_user.name, "Quin");
    assert_eq!(conversations[1].last_message.content, "from p2");
    assert_eq!(conversations[1].unread_count, 1);

    assert_eq!(conversations[2].other_user.name, "Pia");
    assert_eq!(conversations[2].unread_count, 1);

    assert!(conversations
        .windows(2)
        .all(|w| w[0].last_message.sent_at >= w[1].last_message.sent_at));
    Ok(())
}

#[tokio::test]
async fn hi_hello_scenario() -> Result<()> {
    let env = create_env().await;
    let a = env.user("u_a", "Ada").await;
    let b = env.user("u_b", "Bram").await;

    env.service.send_message(Some(&a), b.user_id, "hi").await?;
    env.service.send_message(Some(&b), a.user_id, "hello").await?;
    env.service
        .send_message(Some(&b), a.user_id, "how are you")
        .await?;

    for ctx in [&a, &b] {
        let other = if ctx.user_id == a.user_id {
            b.user_id
        } else {
            a.user_id
        };
        let contents: Vec<String> = env
            .service
            .get_conversation(Some(ctx), other)
            .await?
            .into_iter()
            .map(|m| m.content)
            .collect();
        assert_eq!(contents, ["hi", "hello", "how are you"]);
    }

    assert_eq!(env.service.get_unread_count(Some(&a)).await?, 2);
    assert_eq!(env.service.get_unread_count(Some(&b)).await?, 1);

    env.service.mark_conversation_read(Some(&a), b.user_id).await?;
    assert_eq!(env.service.get_unread_count(Some(&a)).await?, 0);
    assert_eq!(env.service.get_unread_count(Some(&b)).await?, 1);
    Ok(())
}

#[tokio::test]
async fn anonymous_reads_degrade_to_empty() -> Result<()> {
    let env = create_env().await;
    let a = env.user("u_a", "Ada").await;

    assert!(env.service.get_conversation(None, a.user_id).await?.is_empty());
    assert!(env.service.get_user_conversations(None).await?.is_empty());
    assert_eq!(env.service.get_unread_count(None).await?, 0);
    assert!(matches!(
        env.service.mark_conversation_read(None, a.user_id).await,
        Err(DomainError::Unauthenticated)
    ));
    Ok(())
}
