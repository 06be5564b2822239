use std::sync::Arc;

use crate::app_data::AppData;
use crate::coordinators::caller::resolve_caller;
use crate::errors::InternalError;
use crate::stores::{CollectionStore, CredentialStore};
use crate::types::internal::collection::{Collection, CollectionEntry};
use crate::types::internal::context::RequestContext;

/// Favorites and watchlist of the calling user
pub struct CollectionCoordinator {
    collection_store: Arc<CollectionStore>,
    credential_store: Arc<CredentialStore>,
}

impl CollectionCoordinator {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            collection_store: app_data.collection_store.clone(),
            credential_store: app_data.credential_store.clone(),
        }
    }

    /// Returns false when the movie was already in the collection
    pub async fn add(&self, ctx: &RequestContext, collection: Collection, movie_id: i32) -> Result<bool, InternalError> {
        let caller = resolve_caller(&self.credential_store, ctx).await?;
        self.collection_store.add(collection, caller.id, movie_id).await
    }

    pub async fn remove(&self, ctx: &RequestContext, collection: Collection, movie_id: i32) -> Result<(), InternalError> {
        let caller = resolve_caller(&self.credential_store, ctx).await?;
        self.collection_store.remove(collection, caller.id, movie_id).await
    }

    pub async fn contains(&self, ctx: &RequestContext, collection: Collection, movie_id: i32) -> Result<bool, InternalError> {
        let caller = resolve_caller(&self.credential_store, ctx).await?;
        self.collection_store.contains(collection, caller.id, movie_id).await
    }

    pub async fn list(&self, ctx: &RequestContext, collection: Collection) -> Result<Vec<CollectionEntry>, InternalError> {
        let caller = resolve_caller(&self.credential_store, ctx).await?;
        self.collection_store.list(collection, caller.id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::internal::CollectionError;
    use crate::test::utils::{authenticated_context, insert_movie, setup_test_app_data};
    use crate::types::db::role::RoleName;

    #[tokio::test]
    async fn test_collections_are_per_user_and_per_kind() {
        let app_data = setup_test_app_data().await;
        let coordinator = CollectionCoordinator::new(app_data.clone());
        let movie_id = insert_movie(&app_data.db, "Heat").await;
        let (_, alice) = authenticated_context(&app_data, "alice", RoleName::User).await;
        let (_, bob) = authenticated_context(&app_data, "bob", RoleName::User).await;

        assert!(coordinator.add(&alice, Collection::Favorites, movie_id).await.unwrap());
        assert!(!coordinator.add(&alice, Collection::Favorites, movie_id).await.unwrap());

        assert!(coordinator.contains(&alice, Collection::Favorites, movie_id).await.unwrap());
        assert!(!coordinator.contains(&alice, Collection::Watchlist, movie_id).await.unwrap());
        assert!(!coordinator.contains(&bob, Collection::Favorites, movie_id).await.unwrap());
        assert_eq!(coordinator.list(&alice, Collection::Favorites).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_remove_missing_membership_is_not_found() {
        let app_data = setup_test_app_data().await;
        let coordinator = CollectionCoordinator::new(app_data.clone());
        let movie_id = insert_movie(&app_data.db, "Heat").await;
        let (_, ctx) = authenticated_context(&app_data, "alice", RoleName::User).await;

        assert!(matches!(
            coordinator.remove(&ctx, Collection::Watchlist, movie_id).await,
            Err(InternalError::Collection(CollectionError::NotInCollection { .. }))
        ));
    }
}
