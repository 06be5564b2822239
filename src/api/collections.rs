use std::sync::Arc;

use poem::Request;
use poem_openapi::param::Path;
use poem_openapi::{OpenApi, Tags, payload::Json};

use crate::AppData;
use crate::api::helpers::{BearerAuth, create_request_context};
use crate::coordinators::CollectionCoordinator;
use crate::errors::MovieError;
use crate::providers::TokenProvider;
use crate::types::dto::collection::{CollectionAddResponse, CollectionEntryResponse, CollectionStatusResponse};
use crate::types::dto::common::MessageResponse;
use crate::types::internal::collection::Collection;

/// Favorites and watchlist endpoints; all require a bearer token
pub struct CollectionsApi {
    collection_coordinator: CollectionCoordinator,
    token_provider: Arc<TokenProvider>,
}

impl CollectionsApi {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            token_provider: app_data.token_provider.clone(),
            collection_coordinator: CollectionCoordinator::new(app_data),
        }
    }

    async fn list(
        &self,
        req: &Request,
        auth: &BearerAuth,
        collection: Collection,
    ) -> Result<Json<Vec<CollectionEntryResponse>>, MovieError> {
        let ctx = create_request_context(req, Some(auth), &self.token_provider);
        let entries = self.collection_coordinator.list(&ctx, collection).await?;
        Ok(Json(entries.into_iter().map(Into::into).collect()))
    }

    async fn add(
        &self,
        req: &Request,
        auth: &BearerAuth,
        collection: Collection,
        movie_id: i32,
    ) -> Result<Json<CollectionAddResponse>, MovieError> {
        let ctx = create_request_context(req, Some(auth), &self.token_provider);
        let added = self.collection_coordinator.add(&ctx, collection, movie_id).await?;

        let message = if added {
            format!("Movie {} added to {}", movie_id, collection)
        } else {
            format!("Movie {} is already in {}", movie_id, collection)
        };
        Ok(Json(CollectionAddResponse { movie_id, added, message }))
    }

    async fn remove(
        &self,
        req: &Request,
        auth: &BearerAuth,
        collection: Collection,
        movie_id: i32,
    ) -> Result<Json<MessageResponse>, MovieError> {
        let ctx = create_request_context(req, Some(auth), &self.token_provider);
        self.collection_coordinator.remove(&ctx, collection, movie_id).await?;
        Ok(Json(MessageResponse::new(format!("Movie {} removed from {}", movie_id, collection))))
    }

    async fn check(
        &self,
        req: &Request,
        auth: &BearerAuth,
        collection: Collection,
        movie_id: i32,
    ) -> Result<Json<CollectionStatusResponse>, MovieError> {
        let ctx = create_request_context(req, Some(auth), &self.token_provider);
        let in_collection = self.collection_coordinator.contains(&ctx, collection, movie_id).await?;
        Ok(Json(CollectionStatusResponse { movie_id, in_collection }))
    }
}

#[derive(Tags)]
enum CollectionTags {
    Favorites,
    Watchlist,
}

#[OpenApi]
impl CollectionsApi {
    #[oai(path = "/favorites", method = "get", tag = "CollectionTags::Favorites")]
    async fn list_favorites(&self, req: &Request, auth: BearerAuth) -> Result<Json<Vec<CollectionEntryResponse>>, MovieError> {
        self.list(req, &auth, Collection::Favorites).await
    }

    /// Add to favorites; adding twice is not an error
    #[oai(path = "/favorites/:movie_id", method = "post", tag = "CollectionTags::Favorites")]
    async fn add_favorite(
        &self,
        req: &Request,
        auth: BearerAuth,
        movie_id: Path<i32>,
    ) -> Result<Json<CollectionAddResponse>, MovieError> {
        self.add(req, &auth, Collection::Favorites, movie_id.0).await
    }

    #[oai(path = "/favorites/:movie_id", method = "delete", tag = "CollectionTags::Favorites")]
    async fn remove_favorite(&self, req: &Request, auth: BearerAuth, movie_id: Path<i32>) -> Result<Json<MessageResponse>, MovieError> {
        self.remove(req, &auth, Collection::Favorites, movie_id.0).await
    }

    #[oai(path = "/favorites/:movie_id/check", method = "get", tag = "CollectionTags::Favorites")]
    async fn check_favorite(
        &self,
        req: &Request,
        auth: BearerAuth,
        movie_id: Path<i32>,
    ) -> Result<Json<CollectionStatusResponse>, MovieError> {
        self.check(req, &auth, Collection::Favorites, movie_id.0).await
    }

    #[oai(path = "/watchlist", method = "get", tag = "CollectionTags::Watchlist")]
    async fn list_watchlist(&self, req: &Request, auth: BearerAuth) -> Result<Json<Vec<CollectionEntryResponse>>, MovieError> {
        self.list(req, &auth, Collection::Watchlist).await
    }

    #[oai(path = "/watchlist/:movie_id", method = "post", tag = "CollectionTags::Watchlist")]
    async fn add_to_watchlist(
        &self,
        req: &Request,
        auth: BearerAuth,
        movie_id: Path<i32>,
    ) -> Result<Json<CollectionAddResponse>, MovieError> {
        self.add(req, &auth, Collection::Watchlist, movie_id.0).await
    }

    #[oai(path = "/watchlist/:movie_id", method = "delete", tag = "CollectionTags::Watchlist")]
    async fn remove_from_watchlist(
        &self,
        req: &Request,
        auth: BearerAuth,
        movie_id: Path<i32>,
    ) -> Result<Json<MessageResponse>, MovieError> {
        self.remove(req, &auth, Collection::Watchlist, movie_id.0).await
    }

    #[oai(path = "/watchlist/:movie_id/check", method = "get", tag = "CollectionTags::Watchlist")]
    async fn check_watchlist(
        &self,
        req: &Request,
        auth: BearerAuth,
        movie_id: Path<i32>,
    ) -> Result<Json<CollectionStatusResponse>, MovieError> {
        self.check(req, &auth, Collection::Watchlist, movie_id.0).await
    }
}
