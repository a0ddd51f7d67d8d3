//! Integration tests for the user service
//!
//! These run the service against the in-memory repository, plus wrappers
//! that fail, slow down or lose rows, to cover storage errors and
//! interleaved writes.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use common::{DatabaseError, DatabaseResult};
use serde_json::json;
use uuid::Uuid;

use users::{
    UserService, UserServiceError,
    config::UserServiceConfig,
    models::{NewUser, User, UserChanges, UserRole},
    repositories::{InMemoryUserRepository, UserRepository},
    schemas::{UserCreate, UserResponse, UserUpdate},
    security::verify_password,
    validation::{ValidationError, validate_nickname},
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn service() -> UserService {
    init_tracing();
    UserService::new(
        Arc::new(InMemoryUserRepository::new()),
        UserServiceConfig::default(),
    )
}

fn create_payload(value: serde_json::Value) -> UserCreate {
    serde_json::from_value(value).expect("valid create payload")
}

fn update_payload(value: serde_json::Value) -> UserUpdate {
    serde_json::from_value(value).expect("valid update payload")
}

async fn create(service: &UserService, email: &str) -> User {
    service
        .create_user(create_payload(json!({
            "email": email,
            "password": "Secure*1234",
            "role": "USER",
            "github_profile_url": "https://github.com/johndoe",
            "linkedin_profile_url": "https://linkedin.com/in/johndoe",
            "profile_picture_url": "https://example.com/profiles/john.jpg",
        })))
        .await
        .expect("user is created")
}

/// Repository standing in for an unreachable database
struct UnavailableRepository;

fn unavailable() -> DatabaseError {
    DatabaseError::Connection(sqlx::Error::PoolTimedOut)
}

#[async_trait]
impl UserRepository for UnavailableRepository {
    async fn find_by_id(&self, _id: Uuid) -> DatabaseResult<Option<User>> {
        Err(unavailable())
    }

    async fn find_by_email(&self, _email: &str) -> DatabaseResult<Option<User>> {
        Err(unavailable())
    }

    async fn insert(&self, _new_user: &NewUser) -> DatabaseResult<User> {
        Err(unavailable())
    }

    async fn update_columns(
        &self,
        _id: Uuid,
        _changes: &UserChanges,
    ) -> DatabaseResult<Option<User>> {
        Err(unavailable())
    }

    async fn list(&self, _limit: i64, _offset: i64) -> DatabaseResult<(Vec<User>, i64)> {
        Err(unavailable())
    }
}

/// In-memory store where reads hand back a snapshot late and writes land
/// late, as under a loaded database
#[derive(Default)]
struct SlowRepository {
    inner: InMemoryUserRepository,
}

const STORE_LATENCY: Duration = Duration::from_millis(100);

#[async_trait]
impl UserRepository for SlowRepository {
    async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<User>> {
        let user = self.inner.find_by_id(id).await;
        tokio::time::sleep(STORE_LATENCY).await;
        user
    }

    async fn find_by_email(&self, email: &str) -> DatabaseResult<Option<User>> {
        self.inner.find_by_email(email).await
    }

    async fn insert(&self, new_user: &NewUser) -> DatabaseResult<User> {
        self.inner.insert(new_user).await
    }

    async fn update_columns(
        &self,
        id: Uuid,
        changes: &UserChanges,
    ) -> DatabaseResult<Option<User>> {
        tokio::time::sleep(STORE_LATENCY).await;
        self.inner.update_columns(id, changes).await
    }

    async fn list(&self, limit: i64, offset: i64) -> DatabaseResult<(Vec<User>, i64)> {
        self.inner.list(limit, offset).await
    }
}

/// Store whose rows disappear between lookup and write
#[derive(Default)]
struct VanishingRowRepository {
    inner: InMemoryUserRepository,
}

#[async_trait]
impl UserRepository for VanishingRowRepository {
    async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<User>> {
        self.inner.find_by_id(id).await
    }

    async fn find_by_email(&self, email: &str) -> DatabaseResult<Option<User>> {
        self.inner.find_by_email(email).await
    }

    async fn insert(&self, new_user: &NewUser) -> DatabaseResult<User> {
        self.inner.insert(new_user).await
    }

    async fn update_columns(
        &self,
        _id: Uuid,
        _changes: &UserChanges,
    ) -> DatabaseResult<Option<User>> {
        Ok(None)
    }

    async fn list(&self, limit: i64, offset: i64) -> DatabaseResult<(Vec<User>, i64)> {
        self.inner.list(limit, offset).await
    }
}

#[tokio::test]
async fn test_create_user_hashes_password_and_generates_identity() {
    let service = service();

    let user = service
        .create_user(create_payload(json!({
            "email": "a@b.com",
            "password": "Secure*1234",
            "role": "USER",
        })))
        .await
        .unwrap();

    assert_eq!(user.email, "a@b.com");
    assert_ne!(user.hashed_password, "Secure*1234");
    assert!(verify_password("Secure*1234", &user.hashed_password).unwrap());
    assert_eq!(user.role, UserRole::User);
    assert!(validate_nickname(&user.nickname).is_ok());
    assert!(!user.verification_token.clone().unwrap_or_default().is_empty());
    assert!(!user.is_professional);

    let response = serde_json::to_value(UserResponse::from(&user)).unwrap();
    let object = response.as_object().unwrap();
    assert!(!object.contains_key("password"));
    assert!(!object.contains_key("hashed_password"));
}

#[tokio::test]
async fn test_create_user_forces_default_role() {
    let service = service();

    let user = service
        .create_user(create_payload(json!({
            "email": "admin@example.com",
            "password": "Secure*1234",
            "role": "ADMIN",
        })))
        .await
        .unwrap();

    assert_eq!(user.role, UserRole::User);
}

#[tokio::test]
async fn test_create_user_ignores_requested_nickname() {
    let service = service();

    let user = service
        .create_user(create_payload(json!({
            "email": "a@b.com",
            "password": "Secure*1234",
            "role": "USER",
            "nickname": "chosen_name",
        })))
        .await
        .unwrap();

    assert!(validate_nickname(&user.nickname).is_ok());
    assert_ne!(user.nickname, "chosen_name");
}

#[tokio::test]
async fn test_create_user_rejects_invalid_payload() {
    let service = service();

    let result = service
        .create_user(create_payload(json!({
            "email": "a@b.com",
            "password": "Secure*1234",
            "role": "USER",
            "profile_picture_url": "ftp://example.com/john.jpg",
        })))
        .await;

    match result {
        Err(UserServiceError::Validation(error)) => {
            assert_eq!(error.kind(), &ValidationError::InvalidUrl);
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_create_user_duplicate_email_conflicts() {
    let service = service();
    create(&service, "a@b.com").await;

    let result = service
        .create_user(create_payload(json!({
            "email": "a@b.com",
            "password": "Secure*1234",
            "role": "USER",
        })))
        .await;

    assert!(matches!(result, Err(UserServiceError::Conflict(_))));
}

#[tokio::test]
async fn test_get_by_id() {
    let service = service();
    let user = create(&service, "a@b.com").await;

    assert_eq!(service.get_by_id(user.id).await.unwrap(), user);
}

#[tokio::test]
async fn test_get_by_id_missing_user_is_not_found() {
    let service = service();

    let result = service.get_by_id(Uuid::new_v4()).await;
    assert!(matches!(result, Err(UserServiceError::NotFound(_))));
    assert!(result.ok().is_none());
}

#[tokio::test]
async fn test_find_by_email() {
    let service = service();
    let user = create(&service, "a@b.com").await;

    assert_eq!(service.find_by_email("a@b.com").await.unwrap().id, user.id);
    assert!(matches!(
        service.find_by_email("missing@b.com").await,
        Err(UserServiceError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_update_user_profile_only_touches_supplied_links() {
    let service = service();
    let user = create(&service, "a@b.com").await;

    let updated = service
        .update_user_profile(
            user.id,
            &update_payload(json!({ "github_profile_url": "https://github.com/janedoe" })),
        )
        .await
        .unwrap();

    assert_eq!(
        updated.github_profile_url.as_deref(),
        Some("https://github.com/janedoe")
    );
    assert_eq!(updated.linkedin_profile_url, user.linkedin_profile_url);
    assert_eq!(updated.profile_picture_url, user.profile_picture_url);
    assert_eq!(service.get_by_id(user.id).await.unwrap(), updated);
}

#[tokio::test]
async fn test_update_user_profile_clears_link_with_null() {
    let service = service();
    let user = create(&service, "a@b.com").await;

    let updated = service
        .update_user_profile(user.id, &update_payload(json!({ "linkedin_profile_url": null })))
        .await
        .unwrap();

    assert_eq!(updated.linkedin_profile_url, None);
    assert_eq!(updated.github_profile_url, user.github_profile_url);
}

#[tokio::test]
async fn test_update_user_profile_ignores_non_link_fields() {
    let service = service();
    let user = create(&service, "a@b.com").await;

    let updated = service
        .update_user_profile(user.id, &update_payload(json!({ "bio": "New bio" })))
        .await
        .unwrap();

    assert_eq!(updated, user);
    assert_eq!(service.get_by_id(user.id).await.unwrap().updated_at, user.updated_at);
}

#[tokio::test]
async fn test_update_user_profile_rejects_empty_update() {
    let service = service();
    let user = create(&service, "a@b.com").await;

    let result = service
        .update_user_profile(user.id, &UserUpdate::default())
        .await;

    assert!(matches!(
        result,
        Err(UserServiceError::Validation(ValidationError::EmptyUpdate))
    ));
}

#[tokio::test]
async fn test_update_user_profile_missing_user_is_not_found() {
    let service = service();

    let result = service
        .update_user_profile(
            Uuid::new_v4(),
            &update_payload(json!({ "github_profile_url": "https://github.com/janedoe" })),
        )
        .await;

    assert!(matches!(result, Err(UserServiceError::NotFound(_))));
}

#[tokio::test]
async fn test_update_user_applies_every_supplied_field() {
    let service = service();
    let user = create(&service, "a@b.com").await;

    let updated = service
        .update_user(
            user.id,
            &update_payload(json!({
                "email": "new@b.com",
                "nickname": "john_doe123",
                "first_name": "  John ",
                "last_name": "Doe",
                "bio": "",
                "role": "AUTHENTICATED",
                "password": "Another*5678",
                "profile_picture_url": null,
            })),
        )
        .await
        .unwrap();

    assert_eq!(updated.email, "new@b.com");
    assert_eq!(updated.nickname, "john_doe123");
    assert_eq!(updated.first_name.as_deref(), Some("John"));
    assert_eq!(updated.last_name.as_deref(), Some("Doe"));
    assert_eq!(updated.bio.as_deref(), Some(""));
    assert_eq!(updated.role, UserRole::Authenticated);
    assert!(verify_password("Another*5678", &updated.hashed_password).unwrap());
    assert_eq!(updated.profile_picture_url, None);
    assert_eq!(updated.github_profile_url, user.github_profile_url);
    assert_eq!(updated.created_at, user.created_at);
}

#[tokio::test]
async fn test_update_user_email_conflict() {
    let service = service();
    create(&service, "taken@b.com").await;
    let user = create(&service, "a@b.com").await;

    let result = service
        .update_user(user.id, &update_payload(json!({ "email": "taken@b.com" })))
        .await;

    assert!(matches!(result, Err(UserServiceError::Conflict(_))));
}

#[tokio::test]
async fn test_upgrade_user_to_pro_is_idempotent() {
    let service = service();
    let user = create(&service, "a@b.com").await;

    let first = service.upgrade_user_to_pro(user.id).await.unwrap();
    assert!(first.is_professional);

    let second = service.upgrade_user_to_pro(user.id).await.unwrap();
    assert!(second.is_professional);
    assert!(service.get_by_id(user.id).await.unwrap().is_professional);
}

#[tokio::test]
async fn test_upgrade_missing_user_is_not_found() {
    let service = service();

    let result = service.upgrade_user_to_pro(Uuid::new_v4()).await;
    assert!(matches!(result, Err(UserServiceError::NotFound(_))));
}

#[tokio::test]
async fn test_interleaved_profile_update_and_upgrade_keep_both_changes() {
    init_tracing();
    let service = UserService::new(
        Arc::new(SlowRepository::default()),
        UserServiceConfig::default(),
    );
    let user_id = create(&service, "a@b.com").await.id;

    let profile_update = tokio::spawn({
        let service = service.clone();
        async move {
            service
                .update_user_profile(
                    user_id,
                    &update_payload(json!({ "github_profile_url": "https://github.com/janedoe" })),
                )
                .await
        }
    });
    tokio::time::sleep(Duration::from_millis(20)).await;
    service.upgrade_user_to_pro(user_id).await.unwrap();
    profile_update.await.unwrap().unwrap();

    let stored = service.get_by_id(user_id).await.unwrap();
    assert!(stored.is_professional);
    assert_eq!(
        stored.github_profile_url.as_deref(),
        Some("https://github.com/janedoe")
    );
}

#[tokio::test]
async fn test_row_missing_at_write_time_is_not_found() {
    init_tracing();
    let service = UserService::new(
        Arc::new(VanishingRowRepository::default()),
        UserServiceConfig::default(),
    );
    let user = create(&service, "a@b.com").await;

    assert!(matches!(
        service.upgrade_user_to_pro(user.id).await,
        Err(UserServiceError::NotFound(_))
    ));
    assert!(matches!(
        service
            .update_user_profile(
                user.id,
                &update_payload(json!({ "github_profile_url": "https://github.com/janedoe" }))
            )
            .await,
        Err(UserServiceError::NotFound(_))
    ));
    assert!(matches!(
        service
            .update_user(user.id, &update_payload(json!({ "bio": "New bio" })))
            .await,
        Err(UserServiceError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_list_users_paginates() {
    let service = service();
    for i in 0..3 {
        create(&service, &format!("user{i}@example.com")).await;
    }

    let page = service.list_users(Some(1), Some(2)).await.unwrap();
    assert_eq!(page.total, 3);
    assert_eq!(page.page, 1);
    assert_eq!(page.size, 2);
    assert_eq!(page.items.len(), 2);

    let page = service.list_users(Some(2), Some(2)).await.unwrap();
    assert_eq!(page.items.len(), 1);
}

#[tokio::test]
async fn test_list_users_clamps_arguments() {
    init_tracing();
    let service = UserService::new(
        Arc::new(InMemoryUserRepository::new()),
        UserServiceConfig {
            default_page_size: 5,
            max_page_size: 20,
        },
    );

    let page = service.list_users(None, None).await.unwrap();
    assert_eq!((page.page, page.size), (1, 5));

    let page = service.list_users(Some(0), Some(1000)).await.unwrap();
    assert_eq!((page.page, page.size), (1, 20));

    let page = service.list_users(Some(3), Some(0)).await.unwrap();
    assert_eq!((page.page, page.size), (3, 1));
}

#[tokio::test]
async fn test_storage_failures_are_reported_distinctly() {
    init_tracing();
    let service = UserService::with_span(
        Arc::new(UnavailableRepository),
        UserServiceConfig::default(),
        tracing::info_span!("unavailable_store"),
    );
    let id = Uuid::new_v4();

    assert!(matches!(
        service.get_by_id(id).await,
        Err(UserServiceError::Storage(_))
    ));
    assert!(matches!(
        service.upgrade_user_to_pro(id).await,
        Err(UserServiceError::Storage(_))
    ));
    assert!(matches!(
        service
            .update_user_profile(
                id,
                &update_payload(json!({ "github_profile_url": "https://github.com/x" }))
            )
            .await,
        Err(UserServiceError::Storage(_))
    ));
    assert!(matches!(
        service
            .create_user(create_payload(json!({
                "email": "a@b.com",
                "password": "Secure*1234",
                "role": "USER",
            })))
            .await,
        Err(UserServiceError::Storage(_))
    ));
    assert!(matches!(
        service.list_users(None, None).await,
        Err(UserServiceError::Storage(_))
    ));
}
