// Test utilities shared by the unit tests
// Only compiled when running tests

use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use migration::{Migrator, MigratorTrait};
use sea_orm::{ActiveModelTrait, ActiveValue::Set, Database, DatabaseConnection};
use uuid::Uuid;

use crate::app_data::AppData;
use crate::config::{MockEnvironment, SecretManager};
use crate::services::{AverageMaintainer, RatingStatistics};
use crate::stores::{CatalogStore, CollectionStore, CredentialStore, RatingStore};
use crate::types::db::role::RoleName;
use crate::types::db::{movie, rating, user};
use crate::types::internal::account::NewUser;
use crate::types::internal::auth::Claims;
use crate::types::internal::context::RequestContext;

pub const TEST_PASSWORD: &str = "correct-horse-battery";
pub const TEST_PEPPER: &str = "test-pepper-for-unit-tests";

/// Fresh in-memory database with all migrations applied
pub async fn setup_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}

/// File-backed database with migrations applied, for tests that need
/// several pooled connections; remove the returned path when done
pub async fn setup_file_test_db() -> (DatabaseConnection, PathBuf) {
    let path = std::env::temp_dir().join(format!("cinemet-test-{}.db", Uuid::new_v4()));
    let url = format!("sqlite://{}?mode=rwc", path.display());

    let db = Database::connect(url.as_str())
        .await
        .expect("Failed to create file test database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    (db, path)
}

/// Stores wired the same way AppData wires them
pub struct TestStores {
    pub db: DatabaseConnection,
    pub average_maintainer: Arc<AverageMaintainer>,
    pub rating_statistics: Arc<RatingStatistics>,
    pub rating_store: Arc<RatingStore>,
    pub catalog_store: Arc<CatalogStore>,
    pub collection_store: Arc<CollectionStore>,
    pub credential_store: Arc<CredentialStore>,
}

pub async fn setup_test_stores() -> TestStores {
    let db = setup_test_db().await;

    let average_maintainer = Arc::new(AverageMaintainer::new(db.clone()));
    let rating_store = Arc::new(RatingStore::new(db.clone(), average_maintainer.clone()));
    let credential_store = Arc::new(CredentialStore::new(
        db.clone(),
        TEST_PEPPER.to_string(),
        rating_store.clone(),
    ));

    TestStores {
        rating_statistics: Arc::new(RatingStatistics::new(db.clone())),
        catalog_store: Arc::new(CatalogStore::new(db.clone())),
        collection_store: Arc::new(CollectionStore::new(db.clone())),
        db,
        average_maintainer,
        rating_store,
        credential_store,
    }
}

/// Full AppData over an in-memory database and the mock secrets
pub async fn setup_test_app_data() -> Arc<AppData> {
    let db = setup_test_db().await;
    let secret_manager = SecretManager::from_env_provider(&MockEnvironment::with_test_secrets())
        .expect("Failed to load test secrets");

    Arc::new(AppData::with_secrets(db, Arc::new(secret_manager)))
}

/// Account creation input with the shared test password
pub fn new_user(username: &str, role: RoleName) -> NewUser {
    NewUser {
        username: username.to_string(),
        email: format!("{}@example.com", username),
        first_name: "Test".to_string(),
        last_name: "User".to_string(),
        password: TEST_PASSWORD.to_string(),
        role,
    }
}

/// Create an account through the credential store and return an authenticated context for it
pub async fn authenticated_context(app_data: &AppData, username: &str, role: RoleName) -> (user::Model, RequestContext) {
    let user = app_data
        .credential_store
        .create_user(new_user(username, role))
        .await
        .expect("Failed to create test user");
    let now = Utc::now().timestamp();
    let ctx = RequestContext::new().with_auth(Claims {
        sub: user.id.to_string(),
        exp: now + 900,
        iat: now,
        jti: None,
    });

    (user, ctx)
}

/// Insert a movie row directly, bypassing validation
pub async fn insert_movie(db: &DatabaseConnection, title: &str) -> i32 {
    let now = Utc::now().timestamp();
    movie::ActiveModel {
        title: Set(title.to_string()),
        description: Set(String::new()),
        release_date: Set(None),
        duration: Set(120),
        url_trailer: Set(String::new()),
        average_rating: Set(0.0),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to insert test movie")
    .id
}

/// Insert a role-less account row directly
pub async fn insert_user(db: &DatabaseConnection, username: &str) -> i32 {
    let now = Utc::now().timestamp();
    user::ActiveModel {
        username: Set(username.to_string()),
        email: Set(format!("{}@example.com", username)),
        first_name: Set(String::new()),
        last_name: Set(String::new()),
        password_hash: Set("not-a-real-hash".to_string()),
        role_id: Set(None),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to insert test user")
    .id
}

/// Insert a rating row directly; the cached average is left untouched
pub async fn insert_rating(db: &DatabaseConnection, user_id: i32, movie_id: i32, value: i32) {
    let now = Utc::now().timestamp();
    rating::ActiveModel {
        user_id: Set(user_id),
        movie_id: Set(movie_id),
        rating: Set(value),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to insert test rating");
}
