//! User service tests against an in-memory SQLite database with the real
//! migrations applied.

use std::sync::Arc;

use sea_orm::{ConnectionTrait, DatabaseConnection, EntityTrait, PaginatorTrait};
use uuid::Uuid;

use auth_service_lib::{AuthServiceConfig, Authenticator, CredentialService};
use common::{AppError, DatabaseConfig};
use domain::{CreateUser, NewAddress, UpdateUser};
use user_service_lib::infra::{Database, Persistence};
use user_service_lib::repository::entities::{address, user};
use user_service_lib::service::{UserManager, UserService};

struct TestContext {
    db: DatabaseConnection,
    credentials: Arc<Authenticator>,
    service: UserManager<Persistence>,
}

impl TestContext {
    async fn new() -> Self {
        // One connection: every in-memory SQLite connection is its own database
        let config = DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            min_connections: 1,
        };
        let db = Database::connect(&config).await.unwrap().get_connection();

        let auth_config =
            AuthServiceConfig::new("integration-test-secret-0123456789abcdef", 1).unwrap();
        let credentials = Arc::new(Authenticator::new(auth_config));
        let service = UserManager::new(
            Arc::new(Persistence::new(db.clone())),
            credentials.clone() as Arc<dyn CredentialService>,
        );

        Self {
            db,
            credentials,
            service,
        }
    }

    async fn counts(&self) -> (u64, u64) {
        let users = user::Entity::find().count(&self.db).await.unwrap();
        let addresses = address::Entity::find().count(&self.db).await.unwrap();
        (users, addresses)
    }
}

fn input(email: &str) -> CreateUser {
    CreateUser {
        email: email.to_string(),
        password: "p".to_string(),
        name: "A".to_string(),
        age: 20,
        address: NewAddress {
            country: "KR".to_string(),
            city: "Seoul".to_string(),
            street: "Main".to_string(),
            zip_code: "000".to_string(),
        },
    }
}

#[tokio::test]
async fn test_create_user_persists_user_and_address() {
    let ctx = TestContext::new().await;

    let created = ctx.service.create_user(input("a@x.com")).await.unwrap();

    assert_eq!(ctx.counts().await, (1, 1));
    assert_ne!(created.password_hash, "p");
    assert!(ctx.credentials.verify_password("p", &created.password_hash));

    let found = ctx.service.find_user_by_id(created.id).await.unwrap();
    assert_eq!(found, created);
    assert_eq!(found.address.zip_code, "000");
}

#[tokio::test]
async fn test_duplicate_email_conflicts_without_writes() {
    let ctx = TestContext::new().await;
    ctx.service.create_user(input("a@x.com")).await.unwrap();

    let result = ctx.service.create_user(input("a@x.com")).await;

    match result {
        Err(AppError::Conflict(msg)) => assert!(msg.contains("a@x.com")),
        other => panic!("expected conflict, got {:?}", other),
    }
    assert_eq!(ctx.counts().await, (1, 1));
}

#[tokio::test]
async fn test_find_unknown_user_is_not_found() {
    let ctx = TestContext::new().await;

    let by_id = ctx.service.find_user_by_id(Uuid::new_v4()).await;
    assert!(matches!(by_id, Err(AppError::NotFound(_))));

    let by_email = ctx.service.find_user_by_email("ghost@x.com").await;
    assert!(matches!(by_email, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn test_batch_creates_every_user() {
    let ctx = TestContext::new().await;

    let batch = vec![input("c@x.com"), input("a@x.com"), input("b@x.com")];
    let created = ctx.service.create_many_users(batch).await.unwrap();

    assert_eq!(created.len(), 3);
    assert_eq!(ctx.counts().await, (3, 3));

    let emails: Vec<String> = ctx
        .service
        .find_all()
        .await
        .unwrap()
        .into_iter()
        .map(|u| u.email)
        .collect();
    assert_eq!(emails, vec!["a@x.com", "b@x.com", "c@x.com"]);
}

#[tokio::test]
async fn test_batch_with_internal_duplicate_rolls_back() {
    let ctx = TestContext::new().await;

    let batch = vec![input("a@x.com"), input("b@x.com"), input("a@x.com")];
    let result = ctx.service.create_many_users(batch).await;

    assert!(matches!(result, Err(AppError::Conflict(_))));
    assert_eq!(ctx.counts().await, (0, 0));
}

#[tokio::test]
async fn test_batch_clashing_with_existing_user_rolls_back() {
    let ctx = TestContext::new().await;
    ctx.service.create_user(input("taken@x.com")).await.unwrap();

    let batch = vec![input("new@x.com"), input("taken@x.com")];
    let result = ctx.service.create_many_users(batch).await;

    assert!(matches!(result, Err(AppError::Conflict(_))));
    assert_eq!(ctx.counts().await, (1, 1));
    assert!(ctx.service.find_user_by_email("new@x.com").await.is_err());
}

#[tokio::test]
async fn test_remove_user_deletes_owned_address() {
    let ctx = TestContext::new().await;
    let created = ctx.service.create_user(input("a@x.com")).await.unwrap();

    ctx.service.remove_user_by_id(created.id).await.unwrap();

    assert_eq!(ctx.counts().await, (0, 0));
    let again = ctx.service.remove_user_by_id(created.id).await;
    assert!(matches!(again, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn test_failed_address_delete_keeps_user() {
    let ctx = TestContext::new().await;
    let created = ctx.service.create_user(input("a@x.com")).await.unwrap();

    ctx.db
        .execute_unprepared(
            "CREATE TRIGGER keep_addresses BEFORE DELETE ON address_korean \
             BEGIN SELECT RAISE(ABORT, 'address locked'); END;",
        )
        .await
        .unwrap();

    let result = ctx.service.remove_user_by_id(created.id).await;

    assert!(matches!(result, Err(AppError::Database(_))));
    assert_eq!(ctx.counts().await, (1, 1));
    let still_there = ctx.service.find_user_by_id(created.id).await.unwrap();
    assert_eq!(still_there, created);
}

#[tokio::test]
async fn test_update_user_by_id() {
    let ctx = TestContext::new().await;
    let first = ctx.service.create_user(input("a@x.com")).await.unwrap();
    ctx.service.create_user(input("b@x.com")).await.unwrap();

    let patch = UpdateUser {
        name: Some("Renamed".to_string()),
        age: Some(31),
        ..Default::default()
    };
    let result = ctx.service.update_user_by_id(first.id, patch).await.unwrap();
    assert_eq!(result.rows_affected, 1);

    let reloaded = ctx.service.find_user_by_id(first.id).await.unwrap();
    assert_eq!(reloaded.name, "Renamed");
    assert_eq!(reloaded.age, 31);
    assert_eq!(reloaded.email, "a@x.com");

    // Unknown id is not an error
    let patch = UpdateUser {
        age: Some(40),
        ..Default::default()
    };
    let result = ctx
        .service
        .update_user_by_id(Uuid::new_v4(), patch)
        .await
        .unwrap();
    assert_eq!(result.rows_affected, 0);

    let empty = ctx
        .service
        .update_user_by_id(first.id, UpdateUser::default())
        .await
        .unwrap();
    assert_eq!(empty.rows_affected, 0);

    let steal_email = UpdateUser {
        email: Some("b@x.com".to_string()),
        ..Default::default()
    };
    let result = ctx.service.update_user_by_id(first.id, steal_email).await;
    assert!(matches!(result, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn test_authenticate_checks_stored_hash() {
    let ctx = TestContext::new().await;
    let created = ctx.service.create_user(input("a@x.com")).await.unwrap();

    let token = ctx.service.authenticate("a@x.com", "p").await.unwrap();
    let claims = ctx.credentials.verify_token(&token.access_token).unwrap();
    assert_eq!(claims.sub, created.id);

    let wrong = ctx.service.authenticate("a@x.com", "q").await;
    assert!(matches!(wrong, Err(AppError::InvalidCredentials)));

    let unknown = ctx.service.authenticate("ghost@x.com", "p").await;
    assert!(matches!(unknown, Err(AppError::InvalidCredentials)));
}

#[tokio::test]
async fn test_registration_lifecycle() {
    let ctx = TestContext::new().await;

    let created = ctx.service.create_user(input("a@x.com")).await.unwrap();
    assert_ne!(created.password_hash, "p");

    let duplicate = ctx.service.create_user(input("a@x.com")).await;
    assert!(matches!(duplicate, Err(AppError::Conflict(_))));

    let found = ctx.service.find_user_by_email("a@x.com").await.unwrap();
    assert_eq!(found.id, created.id);

    let token = ctx.service.login(&found).await.unwrap();
    assert_eq!(token.token_type, "Bearer");

    ctx.service.remove_user_by_id(created.id).await.unwrap();
    let gone = ctx.service.find_user_by_id(created.id).await;
    assert!(matches!(gone, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn test_migration_status_lists_applied_migrations() {
    let config = DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
        min_connections: 1,
    };
    let db = Database::connect(&config).await.unwrap();

    let status = db.migration_status().await.unwrap();

    assert_eq!(
        status,
        vec![
            ("m20240101_000001_create_address_table".to_string(), true),
            ("m20240101_000002_create_users_table".to_string(), true),
        ]
    );
}
