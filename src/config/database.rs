use migration::{Migrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection};

use crate::config::{ApplicationError, BootstrapSettings};

/// Connect to the database named by `DATABASE_URL`
///
/// Does NOT run migrations; call [`migrate_database`] separately.
pub async fn connect_database(settings: &BootstrapSettings) -> Result<DatabaseConnection, ApplicationError> {
    let database_url = settings.database_url();

    let db = Database::connect(database_url)
        .await
        .map_err(|e| ApplicationError::DatabaseConnection(e.to_string()))?;

    tracing::debug!("Connected to database: {}", database_url);
    Ok(db)
}

/// Apply all pending migrations
pub async fn migrate_database(db: &DatabaseConnection) -> Result<(), ApplicationError> {
    Migrator::up(db, None)
        .await
        .map_err(|e| ApplicationError::Migration(e.to_string()))?;

    tracing::info!("Database migrations completed");
    Ok(())
}
