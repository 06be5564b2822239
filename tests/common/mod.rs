// Common test utilities for integration tests
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::Utc;
use cinemet_backend::AppData;
use cinemet_backend::config::{EnvironmentProvider, SecretManager};
use cinemet_backend::types::db::role::RoleName;
use cinemet_backend::types::db::user;
use cinemet_backend::types::internal::account::NewUser;
use cinemet_backend::types::internal::auth::Claims;
use cinemet_backend::types::internal::catalog::MovieInput;
use cinemet_backend::types::internal::context::RequestContext;
use migration::{Migrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection};

pub const TEST_PASSWORD: &str = "correct-horse-battery";

/// In-memory environment for secrets and settings
#[derive(Default)]
pub struct TestEnvironment {
    vars: HashMap<String, String>,
}

impl TestEnvironment {
    pub fn with_test_secrets() -> Self {
        let mut vars = HashMap::new();
        vars.insert("JWT_SECRET".to_string(), "integration-jwt-secret-minimum-32-chars".to_string());
        vars.insert("PASSWORD_PEPPER".to_string(), "integration-pepper-value".to_string());
        vars.insert("REFRESH_TOKEN_SECRET".to_string(), "integration-refresh-secret-32-characters".to_string());
        Self { vars }
    }
}

impl EnvironmentProvider for TestEnvironment {
    fn get_var(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}

/// Creates a test database with migrations applied
pub async fn setup_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}

/// Fully wired application data over a fresh database
pub async fn setup_app_data() -> Arc<AppData> {
    let db = setup_test_db().await;
    let secret_manager = SecretManager::from_env_provider(&TestEnvironment::with_test_secrets())
        .expect("Failed to load test secrets");

    Arc::new(AppData::with_secrets(db, Arc::new(secret_manager)))
}

/// Create an account and return a context authenticated as it
pub async fn login_as(app_data: &AppData, username: &str, role: RoleName) -> (user::Model, RequestContext) {
    let user = app_data
        .credential_store
        .create_user(NewUser {
            username: username.to_string(),
            email: format!("{}@example.com", username),
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            password: TEST_PASSWORD.to_string(),
            role,
        })
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

/// Create a movie through the catalog store
pub async fn create_movie(app_data: &AppData, title: &str) -> i32 {
    app_data
        .catalog_store
        .create_movie(&MovieInput {
            title: title.to_string(),
            duration: 120,
            ..Default::default()
        })
        .await
        .expect("Failed to create test movie")
        .movie
        .id
}

/// Helper to manage environment variables in tests
///
/// Cleans up specified environment variables on creation and drop,
/// ensuring test isolation when dealing with global environment state.
pub struct EnvGuard {
    vars: Vec<String>,
}

impl EnvGuard {
    pub fn new(vars: Vec<&str>) -> Self {
        for var in &vars {
            unsafe {
                std::env::remove_var(var);
            }
        }
        Self {
            vars: vars.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for var in &self.vars {
            unsafe {
                std::env::remove_var(var);
            }
        }
    }
}

/// Global mutex for tests that modify environment variables
///
/// Environment variables are process-global, so tests that modify them
/// must run serially to avoid race conditions.
pub static ENV_TEST_MUTEX: Mutex<()> = Mutex::new(());
