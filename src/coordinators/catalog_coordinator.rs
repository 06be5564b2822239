use std::sync::Arc;

use crate::app_data::AppData;
use crate::coordinators::caller::require_admin;
use crate::errors::InternalError;
use crate::stores::{CatalogStore, CredentialStore};
use crate::types::db::{actor, director, genre, movie};
use crate::types::internal::catalog::{MovieDetail, MovieFilter, MovieInput, Page, PageRequest};
use crate::types::internal::context::RequestContext;

/// Catalog coordinator: public reads, admin-only writes
pub struct CatalogCoordinator {
    catalog_store: Arc<CatalogStore>,
    credential_store: Arc<CredentialStore>,
}

impl CatalogCoordinator {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            catalog_store: app_data.catalog_store.clone(),
            credential_store: app_data.credential_store.clone(),
        }
    }

    pub async fn list_movies(&self, filter: &MovieFilter, page: PageRequest) -> Result<Page<movie::Model>, InternalError> {
        self.catalog_store.list_movies(filter, page).await
    }

    pub async fn get_movie(&self, movie_id: i32) -> Result<MovieDetail, InternalError> {
        self.catalog_store.get_movie_detail(movie_id).await
    }

    pub async fn create_movie(&self, ctx: &RequestContext, input: MovieInput) -> Result<MovieDetail, InternalError> {
        let admin = require_admin(&self.credential_store, ctx).await?;
        let detail = self.catalog_store.create_movie(&input).await?;
        tracing::info!(request_id = %ctx.request_id, "Movie {} created by {}", detail.movie.id, admin.id);
        Ok(detail)
    }

    pub async fn update_movie(
        &self,
        ctx: &RequestContext,
        movie_id: i32,
        input: MovieInput,
    ) -> Result<MovieDetail, InternalError> {
        require_admin(&self.credential_store, ctx).await?;
        self.catalog_store.update_movie(movie_id, &input).await
    }

    /// Delete a movie together with its ratings, memberships and links
    pub async fn delete_movie(&self, ctx: &RequestContext, movie_id: i32) -> Result<(), InternalError> {
        let admin = require_admin(&self.credential_store, ctx).await?;
        self.catalog_store.delete_movie(movie_id).await?;
        tracing::info!(request_id = %ctx.request_id, "Movie {} deleted by {}", movie_id, admin.id);
        Ok(())
    }

    pub async fn list_genres(&self) -> Result<Vec<genre::Model>, InternalError> {
        self.catalog_store.list_genres().await
    }

    pub async fn create_genre(&self, ctx: &RequestContext, name: &str) -> Result<genre::Model, InternalError> {
        require_admin(&self.credential_store, ctx).await?;
        self.catalog_store.create_genre(name).await
    }

    pub async fn update_genre(&self, ctx: &RequestContext, genre_id: i32, name: &str) -> Result<genre::Model, InternalError> {
        require_admin(&self.credential_store, ctx).await?;
        self.catalog_store.update_genre(genre_id, name).await
    }

    pub async fn delete_genre(&self, ctx: &RequestContext, genre_id: i32) -> Result<(), InternalError> {
        require_admin(&self.credential_store, ctx).await?;
        self.catalog_store.delete_genre(genre_id).await
    }

    pub async fn list_directors(&self) -> Result<Vec<director::Model>, InternalError> {
        self.catalog_store.list_directors().await
    }

    pub async fn create_director(
        &self,
        ctx: &RequestContext,
        firstname: &str,
        lastname: &str,
    ) -> Result<director::Model, InternalError> {
        require_admin(&self.credential_store, ctx).await?;
        self.catalog_store.create_director(firstname, lastname).await
    }

    pub async fn update_director(
        &self,
        ctx: &RequestContext,
        director_id: i32,
        firstname: &str,
        lastname: &str,
    ) -> Result<director::Model, InternalError> {
        require_admin(&self.credential_store, ctx).await?;
        self.catalog_store.update_director(director_id, firstname, lastname).await
    }

    pub async fn delete_director(&self, ctx: &RequestContext, director_id: i32) -> Result<(), InternalError> {
        require_admin(&self.credential_store, ctx).await?;
        self.catalog_store.delete_director(director_id).await
    }

    pub async fn list_actors(&self) -> Result<Vec<actor::Model>, InternalError> {
        self.catalog_store.list_actors().await
    }

    pub async fn create_actor(
        &self,
        ctx: &RequestContext,
        firstname: &str,
        lastname: &str,
    ) -> Result<actor::Model, InternalError> {
        require_admin(&self.credential_store, ctx).await?;
        self.catalog_store.create_actor(firstname, lastname).await
    }

    pub async fn update_actor(
        &self,
        ctx: &RequestContext,
        actor_id: i32,
        firstname: &str,
        lastname: &str,
    ) -> Result<actor::Model, InternalError> {
        require_admin(&self.credential_store, ctx).await?;
        self.catalog_store.update_actor(actor_id, firstname, lastname).await
    }

    pub async fn delete_actor(&self, ctx: &RequestContext, actor_id: i32) -> Result<(), InternalError> {
        require_admin(&self.credential_store, ctx).await?;
        self.catalog_store.delete_actor(actor_id).await
    }
}
