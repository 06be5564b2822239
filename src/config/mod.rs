// Configuration layer - environment, secrets, logging and database bootstrap
pub mod bootstrap_settings;
pub mod database;
pub mod env_provider;
pub mod errors;
pub mod logging;
pub mod secret_manager;

pub use bootstrap_settings::BootstrapSettings;
pub use database::{connect_database, migrate_database};
pub use env_provider::{EnvironmentProvider, SystemEnvironment};
#[cfg(test)]
pub use env_provider::MockEnvironment;
pub use errors::{ApplicationError, SecretError};
pub use logging::init_logging;
pub use secret_manager::SecretManager;
