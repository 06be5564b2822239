// Coordinators layer - Workflow orchestration
//
// Coordinators handle workflow orchestration by composing store, service and
// provider operations for specific API endpoints. They resolve the caller from
// the RequestContext and enforce capabilities; stores never see the context.

pub mod admin_coordinator;
pub mod auth_coordinator;
pub mod catalog_coordinator;
pub mod collection_coordinator;
pub mod rating_coordinator;

mod caller;

pub use admin_coordinator::AdminCoordinator;
pub use auth_coordinator::AuthCoordinator;
pub use catalog_coordinator::CatalogCoordinator;
pub use collection_coordinator::CollectionCoordinator;
pub use rating_coordinator::RatingCoordinator;
