use std::sync::Arc;

use poem::Request;
use poem_openapi::{OpenApi, Tags, payload::Json};

use crate::AppData;
use crate::api::helpers::{BearerAuth, create_request_context};
use crate::coordinators::AuthCoordinator;
use crate::coordinators::auth_coordinator::ProfileUpdate;
use crate::errors::AuthError;
use crate::types::dto::auth::{
    ChangePasswordRequest, LoginRequest, LogoutRequest, RefreshRequest, RefreshResponse, RegisterApiResponse,
    RegisterRequest, TokenResponse, UpdateProfileRequest,
};
use crate::types::dto::common::MessageResponse;
use crate::types::dto::user::UserResponse;
use crate::types::db::role::RoleName;
use crate::types::internal::account::NewUser;

/// Authentication API endpoints
pub struct AuthApi {
    auth_coordinator: AuthCoordinator,
}

impl AuthApi {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            auth_coordinator: AuthCoordinator::new(app_data),
        }
    }
}

/// API tags for authentication endpoints
#[derive(Tags)]
enum AuthTags {
    /// Authentication endpoints
    Authentication,
}

#[OpenApi(prefix_path = "/auth")]
impl AuthApi {
    /// Register a new account with the `user` role
    #[oai(path = "/register", method = "post", tag = "AuthTags::Authentication")]
    async fn register(&self, req: &Request, body: Json<RegisterRequest>) -> Result<RegisterApiResponse, AuthError> {
        let ctx = create_request_context(req, None, &self.auth_coordinator.token_provider());
        let body = body.0;

        let (user, role) = self
            .auth_coordinator
            .register(
                &ctx,
                NewUser {
                    username: body.username,
                    email: body.email,
                    first_name: body.first_name,
                    last_name: body.last_name,
                    password: body.password,
                    role: RoleName::User,
                },
            )
            .await?;

        Ok(RegisterApiResponse::Created(Json(UserResponse::from_model(user, role))))
    }

    /// Login with email and password to receive authentication tokens
    #[oai(path = "/login", method = "post", tag = "AuthTags::Authentication")]
    async fn login(&self, req: &Request, body: Json<LoginRequest>) -> Result<Json<TokenResponse>, AuthError> {
        let ctx = create_request_context(req, None, &self.auth_coordinator.token_provider());

        let tokens = self.auth_coordinator.login(&ctx, &body.email, &body.password).await?;

        Ok(Json(TokenResponse::bearer(tokens.access_token, tokens.refresh_token, tokens.expires_in)))
    }

    /// Refresh access token using a refresh token
    #[oai(path = "/refresh", method = "post", tag = "AuthTags::Authentication")]
    async fn refresh(&self, req: &Request, body: Json<RefreshRequest>) -> Result<Json<RefreshResponse>, AuthError> {
        let token_provider = self.auth_coordinator.token_provider();
        let ctx = create_request_context(req, None, &token_provider);

        let access_token = self.auth_coordinator.refresh(&ctx, &body.refresh_token).await?;

        Ok(Json(RefreshResponse {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: token_provider.jwt_expires_in(),
        }))
    }

    /// Logout and revoke refresh token
    #[oai(path = "/logout", method = "post", tag = "AuthTags::Authentication")]
    async fn logout(&self, req: &Request, auth: BearerAuth, body: Json<LogoutRequest>) -> Result<Json<MessageResponse>, AuthError> {
        let ctx = create_request_context(req, Some(&auth), &self.auth_coordinator.token_provider());

        self.auth_coordinator.logout(&ctx, &body.refresh_token).await?;

        Ok(Json(MessageResponse::new("Logged out successfully")))
    }

    /// Own profile
    #[oai(path = "/profile", method = "get", tag = "AuthTags::Authentication")]
    async fn profile(&self, req: &Request, auth: BearerAuth) -> Result<Json<UserResponse>, AuthError> {
        let ctx = create_request_context(req, Some(&auth), &self.auth_coordinator.token_provider());

        let (user, role) = self.auth_coordinator.profile(&ctx).await?;

        Ok(Json(UserResponse::from_model(user, role)))
    }

    /// Edit own profile
    #[oai(path = "/profile", method = "patch", tag = "AuthTags::Authentication")]
    async fn update_profile(
        &self,
        req: &Request,
        auth: BearerAuth,
        body: Json<UpdateProfileRequest>,
    ) -> Result<Json<UserResponse>, AuthError> {
        let ctx = create_request_context(req, Some(&auth), &self.auth_coordinator.token_provider());
        let body = body.0;

        let (user, role) = self
            .auth_coordinator
            .update_profile(
                &ctx,
                ProfileUpdate {
                    username: body.username,
                    email: body.email,
                    first_name: body.first_name,
                    last_name: body.last_name,
                },
            )
            .await?;

        Ok(Json(UserResponse::from_model(user, role)))
    }

    /// Change own password; returns a fresh token pair
    #[oai(path = "/change-password", method = "post", tag = "AuthTags::Authentication")]
    async fn change_password(
        &self,
        req: &Request,
        auth: BearerAuth,
        body: Json<ChangePasswordRequest>,
    ) -> Result<Json<TokenResponse>, AuthError> {
        let ctx = create_request_context(req, Some(&auth), &self.auth_coordinator.token_provider());

        let tokens = self
            .auth_coordinator
            .change_password(&ctx, &body.current_password, &body.new_password)
            .await?;

        Ok(Json(TokenResponse::bearer(tokens.access_token, tokens.refresh_token, tokens.expires_in)))
    }
}
