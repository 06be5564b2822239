use std::sync::Arc;

use crate::app_data::AppData;
use crate::coordinators::caller::resolve_caller;
use crate::errors::InternalError;
use crate::providers::TokenProvider;
use crate::stores::CredentialStore;
use crate::types::db::role::RoleName;
use crate::types::db::user;
use crate::types::internal::account::{NewUser, UserUpdate};
use crate::types::internal::context::RequestContext;

/// Access and refresh token issued together
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
}

/// Fields a user may edit on their own profile
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub username: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// Authentication coordinator that orchestrates registration, login, logout,
/// token refresh and self-service profile workflows
pub struct AuthCoordinator {
    credential_store: Arc<CredentialStore>,
    token_provider: Arc<TokenProvider>,
}

impl AuthCoordinator {
    /// Create AuthCoordinator from AppData
    ///
    /// # Arguments
    /// * `app_data` - Application data containing all stores and providers
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            credential_store: app_data.credential_store.clone(),
            token_provider: app_data.token_provider.clone(),
        }
    }

    /// Get a reference to the internal TokenProvider
    ///
    /// Useful for API layer that needs direct access to token validation
    pub fn token_provider(&self) -> Arc<TokenProvider> {
        self.token_provider.clone()
    }

    /// Create a self-registered account; always gets the `user` role
    pub async fn register(
        &self,
        ctx: &RequestContext,
        mut new_user: NewUser,
    ) -> Result<(user::Model, Option<RoleName>), InternalError> {
        new_user.role = RoleName::User;
        let user = self.credential_store.create_user(new_user).await?;

        tracing::info!(request_id = %ctx.request_id, "Account registered: {}", user.id);
        Ok((user, Some(RoleName::User)))
    }

    /// Orchestrate a complete login workflow
    ///
    /// Coordinates the sequence of operations:
    /// 1. Verify credentials via credential store
    /// 2. Generate JWT via token provider
    /// 3. Generate and hash a refresh token
    /// 4. Store the refresh token hash
    pub async fn login(
        &self,
        ctx: &RequestContext,
        email: &str,
        password: &str,
    ) -> Result<TokenPair, InternalError> {
        // Step 1: Verify credentials
        let user = self.credential_store.verify_credentials(email, password).await?;

        // Step 2-4: Issue tokens
        let tokens = self.issue_tokens(user.id).await?;

        tracing::info!(request_id = %ctx.request_id, ip = ?ctx.ip_address, "User {} logged in", user.id);
        Ok(tokens)
    }

    /// Exchange a refresh token for a new access token
    ///
    /// The refresh token stays valid until it expires or is revoked.
    pub async fn refresh(&self, ctx: &RequestContext, refresh_token: &str) -> Result<String, InternalError> {
        let token_hash = self.token_provider.hash_refresh_token(refresh_token)?;
        let user_id = self.credential_store.validate_refresh_token(&token_hash).await?;

        // Deactivated accounts cannot mint new access tokens
        self.credential_store.get_authenticated_user(user_id).await?;

        let (access_token, _jti) = self.token_provider.generate_jwt(user_id)?;
        tracing::debug!(request_id = %ctx.request_id, "Access token refreshed for user {}", user_id);
        Ok(access_token)
    }

    /// Revoke one of the caller's refresh tokens
    pub async fn logout(&self, ctx: &RequestContext, refresh_token: &str) -> Result<(), InternalError> {
        let caller = resolve_caller(&self.credential_store, ctx).await?;
        let token_hash = self.token_provider.hash_refresh_token(refresh_token)?;

        self.credential_store.revoke_refresh_token(&token_hash, caller.id).await?;

        tracing::info!(request_id = %ctx.request_id, "User {} logged out", caller.id);
        Ok(())
    }

    /// The caller's own account
    pub async fn profile(&self, ctx: &RequestContext) -> Result<(user::Model, Option<RoleName>), InternalError> {
        let caller = resolve_caller(&self.credential_store, ctx).await?;
        let user = self.credential_store.get_user_by_id(caller.id).await?;
        Ok((user, caller.role))
    }

    /// Edit the caller's own names and login fields
    pub async fn update_profile(
        &self,
        ctx: &RequestContext,
        update: ProfileUpdate,
    ) -> Result<(user::Model, Option<RoleName>), InternalError> {
        let caller = resolve_caller(&self.credential_store, ctx).await?;

        let user = self
            .credential_store
            .update_user(
                caller.id,
                UserUpdate {
                    username: update.username,
                    email: update.email,
                    first_name: update.first_name,
                    last_name: update.last_name,
                    ..Default::default()
                },
            )
            .await?;

        Ok((user, caller.role))
    }

    /// Change the caller's password and hand out a fresh token pair
    ///
    /// Every refresh token issued before the change is revoked.
    pub async fn change_password(
        &self,
        ctx: &RequestContext,
        current_password: &str,
        new_password: &str,
    ) -> Result<TokenPair, InternalError> {
        let caller = resolve_caller(&self.credential_store, ctx).await?;

        self.credential_store
            .change_password(caller.id, current_password, new_password)
            .await?;

        self.issue_tokens(caller.id).await
    }

    async fn issue_tokens(&self, user_id: i32) -> Result<TokenPair, InternalError> {
        let (access_token, _jti) = self.token_provider.generate_jwt(user_id)?;

        let refresh_token = self.token_provider.generate_refresh_token();
        let token_hash = self.token_provider.hash_refresh_token(&refresh_token)?;
        let expires_at = self.token_provider.get_refresh_expiration();
        self.credential_store
            .store_refresh_token(token_hash, user_id, expires_at)
            .await?;

        Ok(TokenPair {
            access_token,
            refresh_token,
            expires_in: self.token_provider.jwt_expires_in(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::internal::{AccessError, CredentialError};
    use crate::test::utils::{TEST_PASSWORD, authenticated_context, new_user, setup_test_app_data};

    async fn setup() -> (Arc<AppData>, AuthCoordinator) {
        let app_data = setup_test_app_data().await;
        let coordinator = AuthCoordinator::new(app_data.clone());
        (app_data, coordinator)
    }

    #[tokio::test]
    async fn test_register_forces_user_role() {
        let (_app_data, coordinator) = setup().await;
        let ctx = RequestContext::new();

        let (user, role) = coordinator
            .register(&ctx, new_user("neo", RoleName::Admin))
            .await
            .unwrap();

        assert_eq!(user.username, "neo");
        assert_eq!(role, Some(RoleName::User));
    }

    #[tokio::test]
    async fn test_login_issues_tokens_for_subject() {
        let (_app_data, coordinator) = setup().await;
        let ctx = RequestContext::new();
        let (user, _) = coordinator.register(&ctx, new_user("neo", RoleName::User)).await.unwrap();

        let tokens = coordinator.login(&ctx, "NEO@example.com", TEST_PASSWORD).await.unwrap();

        let claims = coordinator.token_provider().validate_jwt(&tokens.access_token).unwrap();
        assert_eq!(claims.user_id(), Some(user.id));
        assert_eq!(tokens.expires_in, 900);
    }

    #[tokio::test]
    async fn test_login_with_wrong_password_fails() {
        let (_app_data, coordinator) = setup().await;
        let ctx = RequestContext::new();
        coordinator.register(&ctx, new_user("neo", RoleName::User)).await.unwrap();

        let result = coordinator.login(&ctx, "neo@example.com", "wrong-password").await;

        assert!(matches!(result, Err(InternalError::Credential(CredentialError::InvalidCredentials))));
    }

    #[tokio::test]
    async fn test_refresh_then_logout_revokes_token() {
        let (app_data, coordinator) = setup().await;
        let (_, ctx) = authenticated_context(&app_data, "neo", RoleName::User).await;
        let tokens = coordinator.login(&ctx, "neo@example.com", TEST_PASSWORD).await.unwrap();

        assert!(coordinator.refresh(&ctx, &tokens.refresh_token).await.is_ok());

        coordinator.logout(&ctx, &tokens.refresh_token).await.unwrap();

        assert!(coordinator.refresh(&ctx, &tokens.refresh_token).await.is_err());
    }

    #[tokio::test]
    async fn test_logout_requires_authentication() {
        let (_app_data, coordinator) = setup().await;

        let result = coordinator.logout(&RequestContext::new(), "whatever").await;

        assert!(matches!(result, Err(InternalError::Access(AccessError::Unauthenticated))));
    }

    #[tokio::test]
    async fn test_update_profile_only_touches_profile_fields() {
        let (app_data, coordinator) = setup().await;
        let (_, ctx) = authenticated_context(&app_data, "neo", RoleName::User).await;

        let (user, role) = coordinator
            .update_profile(
                &ctx,
                ProfileUpdate {
                    first_name: Some("Thomas".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(user.first_name, "Thomas");
        assert_eq!(user.username, "neo");
        assert_eq!(role, Some(RoleName::User));
    }

    #[tokio::test]
    async fn test_change_password_revokes_old_refresh_tokens() {
        let (app_data, coordinator) = setup().await;
        let (_, ctx) = authenticated_context(&app_data, "neo", RoleName::User).await;
        let old = coordinator.login(&ctx, "neo@example.com", TEST_PASSWORD).await.unwrap();

        let fresh = coordinator
            .change_password(&ctx, TEST_PASSWORD, "a-brand-new-passphrase")
            .await
            .unwrap();

        assert!(coordinator.refresh(&ctx, &old.refresh_token).await.is_err());
        assert!(coordinator.refresh(&ctx, &fresh.refresh_token).await.is_ok());
        assert!(coordinator.login(&ctx, "neo@example.com", "a-brand-new-passphrase").await.is_ok());
    }
}
