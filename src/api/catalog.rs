use std::sync::Arc;

use poem::Request;
use poem_openapi::param::Path;
use poem_openapi::{OpenApi, Tags, payload::Json};

use crate::AppData;
use crate::api::helpers::{BearerAuth, create_request_context};
use crate::coordinators::CatalogCoordinator;
use crate::errors::MovieError;
use crate::providers::TokenProvider;
use crate::types::dto::catalog::{
    CreateGenreApiResponse, CreatePersonApiResponse, GenreRequest, GenreResponse, PersonRequest, PersonResponse,
};
use crate::types::dto::common::MessageResponse;

/// Genres, directors and actors; listing is public, writes need the admin role
pub struct CatalogApi {
    catalog_coordinator: CatalogCoordinator,
    token_provider: Arc<TokenProvider>,
}

impl CatalogApi {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            token_provider: app_data.token_provider.clone(),
            catalog_coordinator: CatalogCoordinator::new(app_data),
        }
    }
}

#[derive(Tags)]
enum CatalogTags {
    Genres,
    Directors,
    Actors,
}

#[OpenApi]
impl CatalogApi {
    #[oai(path = "/genres", method = "get", tag = "CatalogTags::Genres")]
    async fn list_genres(&self) -> Result<Json<Vec<GenreResponse>>, MovieError> {
        let genres = self.catalog_coordinator.list_genres().await?;
        Ok(Json(genres.into_iter().map(Into::into).collect()))
    }

    #[oai(path = "/genres", method = "post", tag = "CatalogTags::Genres")]
    async fn create_genre(
        &self,
        req: &Request,
        auth: BearerAuth,
        body: Json<GenreRequest>,
    ) -> Result<CreateGenreApiResponse, MovieError> {
        let ctx = create_request_context(req, Some(&auth), &self.token_provider);
        let genre = self.catalog_coordinator.create_genre(&ctx, &body.genre).await?;
        Ok(CreateGenreApiResponse::Created(Json(genre.into())))
    }

    #[oai(path = "/genres/:id", method = "put", tag = "CatalogTags::Genres")]
    async fn update_genre(
        &self,
        req: &Request,
        auth: BearerAuth,
        id: Path<i32>,
        body: Json<GenreRequest>,
    ) -> Result<Json<GenreResponse>, MovieError> {
        let ctx = create_request_context(req, Some(&auth), &self.token_provider);
        let genre = self.catalog_coordinator.update_genre(&ctx, id.0, &body.genre).await?;
        Ok(Json(genre.into()))
    }

    /// Delete a genre; movies lose the link but are kept
    #[oai(path = "/genres/:id", method = "delete", tag = "CatalogTags::Genres")]
    async fn delete_genre(&self, req: &Request, auth: BearerAuth, id: Path<i32>) -> Result<Json<MessageResponse>, MovieError> {
        let ctx = create_request_context(req, Some(&auth), &self.token_provider);
        self.catalog_coordinator.delete_genre(&ctx, id.0).await?;
        Ok(Json(MessageResponse::new(format!("Genre {} deleted", id.0))))
    }

    #[oai(path = "/directors", method = "get", tag = "CatalogTags::Directors")]
    async fn list_directors(&self) -> Result<Json<Vec<PersonResponse>>, MovieError> {
        let directors = self.catalog_coordinator.list_directors().await?;
        Ok(Json(directors.into_iter().map(Into::into).collect()))
    }

    #[oai(path = "/directors", method = "post", tag = "CatalogTags::Directors")]
    async fn create_director(
        &self,
        req: &Request,
        auth: BearerAuth,
        body: Json<PersonRequest>,
    ) -> Result<CreatePersonApiResponse, MovieError> {
        let ctx = create_request_context(req, Some(&auth), &self.token_provider);
        let director = self
            .catalog_coordinator
            .create_director(&ctx, &body.firstname, &body.lastname)
            .await?;
        Ok(CreatePersonApiResponse::Created(Json(director.into())))
    }

    #[oai(path = "/directors/:id", method = "put", tag = "CatalogTags::Directors")]
    async fn update_director(
        &self,
        req: &Request,
        auth: BearerAuth,
        id: Path<i32>,
        body: Json<PersonRequest>,
    ) -> Result<Json<PersonResponse>, MovieError> {
        let ctx = create_request_context(req, Some(&auth), &self.token_provider);
        let director = self
            .catalog_coordinator
            .update_director(&ctx, id.0, &body.firstname, &body.lastname)
            .await?;
        Ok(Json(director.into()))
    }

    #[oai(path = "/directors/:id", method = "delete", tag = "CatalogTags::Directors")]
    async fn delete_director(&self, req: &Request, auth: BearerAuth, id: Path<i32>) -> Result<Json<MessageResponse>, MovieError> {
        let ctx = create_request_context(req, Some(&auth), &self.token_provider);
        self.catalog_coordinator.delete_director(&ctx, id.0).await?;
        Ok(Json(MessageResponse::new(format!("Director {} deleted", id.0))))
    }

    #[oai(path = "/actors", method = "get", tag = "CatalogTags::Actors")]
    async fn list_actors(&self) -> Result<Json<Vec<PersonResponse>>, MovieError> {
        let actors = self.catalog_coordinator.list_actors().await?;
        Ok(Json(actors.into_iter().map(Into::into).collect()))
    }

    #[oai(path = "/actors", method = "post", tag = "CatalogTags::Actors")]
    async fn create_actor(
        &self,
        req: &Request,
        auth: BearerAuth,
        body: Json<PersonRequest>,
    ) -> Result<CreatePersonApiResponse, MovieError> {
        let ctx = create_request_context(req, Some(&auth), &self.token_provider);
        let actor = self
            .catalog_coordinator
            .create_actor(&ctx, &body.firstname, &body.lastname)
            .await?;
        Ok(CreatePersonApiResponse::Created(Json(actor.into())))
    }

    #[oai(path = "/actors/:id", method = "put", tag = "CatalogTags::Actors")]
    async fn update_actor(
        &self,
        req: &Request,
        auth: BearerAuth,
        id: Path<i32>,
        body: Json<PersonRequest>,
    ) -> Result<Json<PersonResponse>, MovieError> {
        let ctx = create_request_context(req, Some(&auth), &self.token_provider);
        let actor = self
            .catalog_coordinator
            .update_actor(&ctx, id.0, &body.firstname, &body.lastname)
            .await?;
        Ok(Json(actor.into()))
    }

    #[oai(path = "/actors/:id", method = "delete", tag = "CatalogTags::Actors")]
    async fn delete_actor(&self, req: &Request, auth: BearerAuth, id: Path<i32>) -> Result<Json<MessageResponse>, MovieError> {
        let ctx = create_request_context(req, Some(&auth), &self.token_provider);
        self.catalog_coordinator.delete_actor(&ctx, id.0).await?;
        Ok(Json(MessageResponse::new(format!("Actor {} deleted", id.0))))
    }
}
