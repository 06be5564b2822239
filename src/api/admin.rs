use std::sync::Arc;

use poem::Request;
use poem_openapi::param::{Path, Query};
use poem_openapi::{OpenApi, Tags, payload::Json};

use crate::AppData;
use crate::api::helpers::{BearerAuth, create_request_context};
use crate::coordinators::AdminCoordinator;
use crate::errors::AdminError;
use crate::providers::TokenProvider;
use crate::types::dto::admin::{AdminCreateUserRequest, AdminUpdateUserRequest, CreateUserApiResponse};
use crate::types::dto::common::MessageResponse;
use crate::types::dto::movie::MoviePageResponse;
use crate::types::dto::user::{RoleResponse, UserPageResponse, UserResponse};
use crate::types::internal::catalog::{MovieFilter, PageRequest};

/// Admin account management API endpoints
pub struct AdminApi {
    admin_coordinator: AdminCoordinator,
    token_provider: Arc<TokenProvider>,
}

impl AdminApi {
    /// Create a new AdminApi from AppData
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            token_provider: app_data.token_provider.clone(),
            admin_coordinator: AdminCoordinator::new(app_data),
        }
    }
}

/// API tags for admin endpoints
#[derive(Tags)]
enum AdminTags {
    /// Account and catalog administration
    Admin,
}

#[OpenApi(prefix_path = "/admin")]
impl AdminApi {
    /// Paginated account list; `search` matches username, email and names
    #[oai(path = "/users", method = "get", tag = "AdminTags::Admin")]
    async fn list_users(
        &self,
        req: &Request,
        auth: BearerAuth,
        page: Query<Option<u64>>,
        limit: Query<Option<u64>>,
        search: Query<Option<String>>,
    ) -> Result<Json<UserPageResponse>, AdminError> {
        let ctx = create_request_context(req, Some(&auth), &self.token_provider);

        let users = self
            .admin_coordinator
            .list_users(&ctx, search.0.as_deref(), PageRequest::new(page.0, limit.0))
            .await?;

        Ok(Json(users.map(|(user, role)| UserResponse::from_model(user, role)).into()))
    }

    #[oai(path = "/users", method = "post", tag = "AdminTags::Admin")]
    async fn create_user(
        &self,
        req: &Request,
        auth: BearerAuth,
        body: Json<AdminCreateUserRequest>,
    ) -> Result<CreateUserApiResponse, AdminError> {
        let ctx = create_request_context(req, Some(&auth), &self.token_provider);

        let (user, role) = self.admin_coordinator.create_user(&ctx, body.0.into()).await?;

        Ok(CreateUserApiResponse::Created(Json(UserResponse::from_model(user, role))))
    }

    #[oai(path = "/users/:id", method = "get", tag = "AdminTags::Admin")]
    async fn get_user(&self, req: &Request, auth: BearerAuth, id: Path<i32>) -> Result<Json<UserResponse>, AdminError> {
        let ctx = create_request_context(req, Some(&auth), &self.token_provider);

        let (user, role) = self.admin_coordinator.get_user(&ctx, id.0).await?;

        Ok(Json(UserResponse::from_model(user, role)))
    }

    #[oai(path = "/users/:id", method = "put", tag = "AdminTags::Admin")]
    async fn update_user(
        &self,
        req: &Request,
        auth: BearerAuth,
        id: Path<i32>,
        body: Json<AdminUpdateUserRequest>,
    ) -> Result<Json<UserResponse>, AdminError> {
        let ctx = create_request_context(req, Some(&auth), &self.token_provider);

        let (user, role) = self.admin_coordinator.update_user(&ctx, id.0, body.0.into()).await?;

        Ok(Json(UserResponse::from_model(user, role)))
    }

    /// Delete an account with its ratings and collections; not allowed on yourself
    #[oai(path = "/users/:id", method = "delete", tag = "AdminTags::Admin")]
    async fn delete_user(&self, req: &Request, auth: BearerAuth, id: Path<i32>) -> Result<Json<MessageResponse>, AdminError> {
        let ctx = create_request_context(req, Some(&auth), &self.token_provider);

        self.admin_coordinator.delete_user(&ctx, id.0).await?;

        Ok(Json(MessageResponse::new(format!("User {} deleted", id.0))))
    }

    #[oai(path = "/roles", method = "get", tag = "AdminTags::Admin")]
    async fn list_roles(&self, req: &Request, auth: BearerAuth) -> Result<Json<Vec<RoleResponse>>, AdminError> {
        let ctx = create_request_context(req, Some(&auth), &self.token_provider);

        let roles = self.admin_coordinator.list_roles(&ctx).await?;

        Ok(Json(roles.into_iter().map(Into::into).collect()))
    }

    #[oai(path = "/movies", method = "get", tag = "AdminTags::Admin")]
    async fn list_movies(
        &self,
        req: &Request,
        auth: BearerAuth,
        page: Query<Option<u64>>,
        limit: Query<Option<u64>>,
        search: Query<Option<String>>,
        genre: Query<Option<i32>>,
    ) -> Result<Json<MoviePageResponse>, AdminError> {
        let ctx = create_request_context(req, Some(&auth), &self.token_provider);
        let filter = MovieFilter {
            search: search.0,
            genre_id: genre.0,
        };

        let movies = self
            .admin_coordinator
            .list_movies(&ctx, &filter, PageRequest::new(page.0, limit.0))
            .await?;

        Ok(Json(movies.into()))
    }
}
