// Stores layer - Data access and repository pattern
pub mod catalog_store;
pub mod collection_store;
pub mod credential_store;
pub mod rating_store;

pub use catalog_store::CatalogStore;
pub use collection_store::CollectionStore;
pub use credential_store::CredentialStore;
pub use rating_store::RatingStore;
