use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::config::SecretManager;
use crate::errors::InternalError;
use crate::providers::TokenProvider;
use crate::services::{AverageMaintainer, RatingStatistics};
use crate::stores::{CatalogStore, CollectionStore, CredentialStore, RatingStore};

/// Centralized application data following the main-owned stores pattern
///
/// All dependencies are created once in main.rs and shared across coordinators.
///
/// ```text
/// main.rs
///   ↓
/// AppData::init(db)
///   ↓ creates once
///   ├─ secret_manager (Arc<SecretManager>)
///   ├─ average_maintainer (Arc<AverageMaintainer>)
///   ├─ rating_statistics (Arc<RatingStatistics>)
///   ├─ rating_store (Arc<RatingStore>)      uses average_maintainer
///   ├─ catalog_store (Arc<CatalogStore>)
///   ├─ collection_store (Arc<CollectionStore>)
///   ├─ credential_store (Arc<CredentialStore>)  uses rating_store
///   └─ token_provider (Arc<TokenProvider>)
///   ↓ wrapped in Arc<AppData>
///   ↓ passed to coordinators, which extract what they need
/// ```
pub struct AppData {
    pub db: DatabaseConnection,
    pub secret_manager: Arc<SecretManager>,
    pub average_maintainer: Arc<AverageMaintainer>,
    pub rating_statistics: Arc<RatingStatistics>,
    pub rating_store: Arc<RatingStore>,
    pub catalog_store: Arc<CatalogStore>,
    pub collection_store: Arc<CollectionStore>,
    pub credential_store: Arc<CredentialStore>,
    pub token_provider: Arc<TokenProvider>,
}

impl AppData {
    /// Initialize all application data from the process environment
    ///
    /// The database should be connected and migrated before calling this.
    ///
    /// # Errors
    ///
    /// Returns `InternalError` when secret manager initialization fails
    pub async fn init(db: DatabaseConnection) -> Result<Self, InternalError> {
        tracing::info!("Initializing AppData...");

        tracing::debug!("Initializing secret manager...");
        let secret_manager = Arc::new(SecretManager::init().map_err(|e| {
            InternalError::parse("secret_manager", format!("Secret manager init failed: {}", e))
        })?);
        tracing::debug!("Secret manager initialized");

        let app_data = Self::with_secrets(db, secret_manager);
        tracing::info!("AppData initialization complete");
        Ok(app_data)
    }

    /// Wire every store and provider around an existing secret manager
    pub fn with_secrets(db: DatabaseConnection, secret_manager: Arc<SecretManager>) -> Self {
        // Order matters: the rating store needs the maintainer, the credential store needs the rating store
        let average_maintainer = Arc::new(AverageMaintainer::new(db.clone()));
        let rating_statistics = Arc::new(RatingStatistics::new(db.clone()));
        let rating_store = Arc::new(RatingStore::new(db.clone(), average_maintainer.clone()));
        let catalog_store = Arc::new(CatalogStore::new(db.clone()));
        let collection_store = Arc::new(CollectionStore::new(db.clone()));
        let credential_store = Arc::new(CredentialStore::new(
            db.clone(),
            secret_manager.password_pepper().to_string(),
            rating_store.clone(),
        ));
        let token_provider = Arc::new(TokenProvider::new(secret_manager.clone()));
        tracing::debug!("Stores created");

        Self {
            db,
            secret_manager,
            average_maintainer,
            rating_statistics,
            rating_store,
            catalog_store,
            collection_store,
            credential_store,
            token_provider,
        }
    }
}
