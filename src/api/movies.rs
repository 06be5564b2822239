use std::sync::Arc;

use poem::Request;
use poem_openapi::param::{Path, Query};
use poem_openapi::{OpenApi, Tags, payload::Json};

use crate::AppData;
use crate::api::helpers::{BearerAuth, create_request_context};
use crate::coordinators::CatalogCoordinator;
use crate::errors::MovieError;
use crate::providers::TokenProvider;
use crate::types::dto::common::MessageResponse;
use crate::types::dto::movie::{CreateMovieApiResponse, MovieDetailResponse, MoviePageResponse, MovieRequest};
use crate::types::internal::catalog::{MovieFilter, PageRequest};

/// Movie browsing and admin movie management
pub struct MoviesApi {
    catalog_coordinator: CatalogCoordinator,
    token_provider: Arc<TokenProvider>,
}

impl MoviesApi {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            token_provider: app_data.token_provider.clone(),
            catalog_coordinator: CatalogCoordinator::new(app_data),
        }
    }
}

#[derive(Tags)]
enum MovieTags {
    /// Movie catalog
    Movies,
}

#[OpenApi]
impl MoviesApi {
    /// List movies, newest first
    ///
    /// `search` matches the title; `genre` filters by genre id.
    #[oai(path = "/movies", method = "get", tag = "MovieTags::Movies")]
    async fn list_movies(
        &self,
        page: Query<Option<u64>>,
        limit: Query<Option<u64>>,
        search: Query<Option<String>>,
        genre: Query<Option<i32>>,
    ) -> Result<Json<MoviePageResponse>, MovieError> {
        let filter = MovieFilter {
            search: search.0,
            genre_id: genre.0,
        };

        let movies = self
            .catalog_coordinator
            .list_movies(&filter, PageRequest::new(page.0, limit.0))
            .await?;

        Ok(Json(movies.into()))
    }

    /// Movie detail with genres, directors and actors
    #[oai(path = "/movies/:id", method = "get", tag = "MovieTags::Movies")]
    async fn get_movie(&self, id: Path<i32>) -> Result<Json<MovieDetailResponse>, MovieError> {
        let detail = self.catalog_coordinator.get_movie(id.0).await?;
        Ok(Json(detail.into()))
    }

    /// Create a movie (admin)
    #[oai(path = "/movies", method = "post", tag = "MovieTags::Movies")]
    async fn create_movie(
        &self,
        req: &Request,
        auth: BearerAuth,
        body: Json<MovieRequest>,
    ) -> Result<CreateMovieApiResponse, MovieError> {
        let ctx = create_request_context(req, Some(&auth), &self.token_provider);

        let detail = self.catalog_coordinator.create_movie(&ctx, body.0.into()).await?;

        Ok(CreateMovieApiResponse::Created(Json(detail.into())))
    }

    /// Replace a movie's fields and links (admin)
    #[oai(path = "/movies/:id", method = "put", tag = "MovieTags::Movies")]
    async fn update_movie(
        &self,
        req: &Request,
        auth: BearerAuth,
        id: Path<i32>,
        body: Json<MovieRequest>,
    ) -> Result<Json<MovieDetailResponse>, MovieError> {
        let ctx = create_request_context(req, Some(&auth), &self.token_provider);

        let detail = self.catalog_coordinator.update_movie(&ctx, id.0, body.0.into()).await?;

        Ok(Json(detail.into()))
    }

    /// Delete a movie with its ratings and memberships (admin)
    #[oai(path = "/movies/:id", method = "delete", tag = "MovieTags::Movies")]
    async fn delete_movie(&self, req: &Request, auth: BearerAuth, id: Path<i32>) -> Result<Json<MessageResponse>, MovieError> {
        let ctx = create_request_context(req, Some(&auth), &self.token_provider);

        self.catalog_coordinator.delete_movie(&ctx, id.0).await?;

        Ok(Json(MessageResponse::new(format!("Movie {} deleted", id.0))))
    }
}
