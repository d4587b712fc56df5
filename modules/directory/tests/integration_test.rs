use std::sync::Arc;

use anyhow::Result;
use api_core::{CallerContext, CallerIdentity};
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Extension, Router,
};
use sea_orm::{Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use tower::ServiceExt;
use uuid::Uuid;

use directory::{
    api::rest::dto::UserDto,
    config::DirectoryConfig,
    contract::client::DirectoryApi,
    contract::model::{ProfilePatch, Role, SyncUser, UserSearch},
    domain::service::Service,
    gateways::local::DirectoryLocalClient,
    infra::storage::{migrations::Migrator, repository::SeaOrmUsersRepository},
};

async fn create_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to connect to test database");
    Migrator::up(&db, None).await.expect("Failed to run migrations");
    db
}

async fn create_test_service() -> Arc<Service> {
    let db = create_test_db().await;
    Arc::new(Service::new(Arc::new(SeaOrmUsersRepository::new(db))))
}

fn sync(subject: &str, name: &str, email: &str) -> SyncUser {
    SyncUser {
        subject: subject.to_string(),
        name: name.to_string(),
        email: email.to_string(),
        avatar_url: None,
    }
}

#[tokio::test]
async fn sync_creates_then_refreshes() -> Result<()> {
    let service = create_test_service().await;

    let created = service.sync_user(sync("user_1", "Ada", "ada@example.com")).await?;
    assert_eq!(created.name, "Ada");
    assert_eq!(created.role, Role::Student);

    // Re-sync with new provider data keeps the same row.
    let updated = service
        .sync_user(sync("user_1", "Ada L.", "ada@newmail.com"))
        .await?;
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.name, "Ada L.");
    assert_eq!(updated.email, "ada@newmail.com");
    Ok(())
}

#[tokio::test]
async fn sync_derives_name_from_email_local_part() -> Result<()> {
    let service = create_test_service().await;
    let user = service.sync_user(sync("user_2", "", "grace@example.com")).await?;
    assert_eq!(user.name, "grace");
    Ok(())
}

#[tokio::test]
async fn resync_preserves_in_app_profile_edits() -> Result<()> {
    let service = create_test_service().await;
    let created = service.sync_user(sync("user_3", "Lin", "lin@example.com")).await?;

    let caller = CallerContext::new(created.id, "user_3");
    service
        .update_profile(
            Some(&caller),
            ProfilePatch {
                bio: Some("Mentoring embedded Rust".into()),
                skills: Some(vec!["rust".into(), "c".into()]),
                role: Some(Role::Mentor),
                ..Default::default()
            },
        )
        .await?;

    let after = service.sync_user(sync("user_3", "Lin Q.", "lin@example.com")).await?;
    assert_eq!(after.name, "Lin Q.");
    assert_eq!(after.bio.as_deref(), Some("Mentoring embedded Rust"));
    assert_eq!(after.skills, vec!["rust".to_string(), "c".to_string()]);
    assert_eq!(after.role, Role::Mentor);
    Ok(())
}

#[tokio::test]
async fn resolve_subject_round_trip() -> Result<()> {
    let service = create_test_service().await;
    let user = service.sync_user(sync("user_4", "Niko", "niko@example.com")).await?;

    let client = DirectoryLocalClient::new(service.clone());
    let ctx = client.resolve_subject("user_4").await?.expect("known subject");
    assert_eq!(ctx.user_id, user.id);
    assert_eq!(ctx.subject, "user_4");

    assert!(client.resolve_subject("user_unknown").await?.is_none());
    assert!(client.resolve_subject("").await?.is_none());
    Ok(())
}

#[tokio::test]
async fn delete_user_removes_the_row() -> Result<()> {
    let service = create_test_service().await;
    service.sync_user(sync("user_5", "Sam", "sam@example.com")).await?;

    service.delete_user("user_5").await?;
    assert!(service.resolve_subject("user_5").await?.is_none());

    // Deleting again reports the missing subject.
    assert!(service.delete_user("user_5").await.is_err());
    Ok(())
}

#[tokio::test]
async fn search_filters_by_role_and_substring() -> Result<()> {
    let service = create_test_service().await;
    let ada = service.sync_user(sync("u_a", "Ada", "ada@example.com")).await?;
    service.sync_user(sync("u_b", "Grace", "grace@example.com")).await?;

    let caller = CallerContext::new(ada.id, "u_a");
    service
        .update_profile(Some(&caller), ProfilePatch { role: Some(Role::Mentor), ..Default::default() })
        .await?;

    let mentors = service
        .search_users(
            Some(&caller),
            UserSearch { role: Some(Role::Mentor), query: None },
        )
        .await?;
    assert_eq!(mentors.len(), 1);
    assert_eq!(mentors[0].name, "Ada");

    let by_email = service
        .search_users(
            Some(&caller),
            UserSearch { role: None, query: Some("GRACE@".into()) },
        )
        .await?;
    assert_eq!(by_email.len(), 1);
    assert_eq!(by_email[0].name, "Grace");

    // Anonymous searches degrade to empty, not an error.
    let anon = service
        .search_users(None, UserSearch::default())
        .await?;
    assert!(anon.is_empty());
    Ok(())
}

#[tokio::test]
async fn get_users_skips_unknown_ids() -> Result<()> {
    let service = create_test_service().await;
    let ada = service.sync_user(sync("u_c", "Ada", "ada@example.com")).await?;

    let client = DirectoryLocalClient::new(service);
    let users = client.get_users(&[ada.id, Uuid::new_v4()]).await?;
    assert_eq!(users.len(), 1);
    Ok(())
}

// --- REST surface ---

fn test_router(service: Arc<Service>, identity: CallerIdentity, token: Option<&str>) -> Router {
    let config = Arc::new(DirectoryConfig {
        sync_token: token.map(str::to_string),
    });
    directory::api::rest::router(service, config).layer(Extension(identity))
}

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn rest_me_requires_identity() {
    let service = create_test_service().await;
    let app = test_router(service, CallerIdentity::anonymous(), None);

    let response = app
        .oneshot(Request::builder().uri("/directory/me").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn rest_me_returns_profile() -> Result<()> {
    let service = create_test_service().await;
    let user = service.sync_user(sync("user_9", "Maya", "maya@example.com")).await?;

    let identity = CallerIdentity::authenticated(CallerContext::new(user.id, "user_9"));
    let app = test_router(service, identity, None);

    let response = app
        .oneshot(Request::builder().uri("/directory/me").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let dto: UserDto = body_json(response).await;
    assert_eq!(dto.name, "Maya");
    assert_eq!(dto.role, "student");
    Ok(())
}

#[tokio::test]
async fn rest_sync_enforces_bearer_token() -> Result<()> {
    let service = create_test_service().await;
    let app = test_router(service.clone(), CallerIdentity::anonymous(), Some("s3cr3t"));

    let payload = serde_json::json!({
        "subject": "user_10",
        "name": "Omar",
        "email": "omar@example.com",
    });

    let unauthorized = app
        .clone()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/directory/sync")
                .header("content-type", "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(unauthorized.status(), StatusCode::UNAUTHORIZED);

    let authorized = app
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/directory/sync")
                .header("content-type", "application/json")
                .header("authorization", "Bearer s3cr3t")
                .body(Body::from(payload.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(authorized.status(), StatusCode::OK);
    assert!(service.resolve_subject("user_10").await?.is_some());
    Ok(())
}

#[tokio::test]
async fn rest_sync_disabled_without_token() {
    let service = create_test_service().await;
    let app = test_router(service, CallerIdentity::anonymous(), None);

    let response = app
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/directory/sync")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"subject":"x","email":"x@y.z"}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn rest_unknown_user_is_problem_404() {
    let service = create_test_service().await;
    let app = test_router(service, CallerIdentity::anonymous(), None);

    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/directory/users/{}", Uuid::new_v4()))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let problem: serde_json::Value = body_json(response).await;
    assert_eq!(problem["code"], "not_found");
}
