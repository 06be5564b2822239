use std::collections::HashMap;
use std::sync::Arc;

use crate::app_data::AppData;
use crate::coordinators::caller::require_admin;
use crate::errors::InternalError;
use crate::errors::internal::AccessError;
use crate::stores::{CatalogStore, CredentialStore};
use crate::types::db::role::{self, RoleName};
use crate::types::db::{movie, user};
use crate::types::internal::account::{NewUser, UserUpdate};
use crate::types::internal::catalog::{MovieFilter, Page, PageRequest};
use crate::types::internal::context::RequestContext;

/// Admin coordinator that orchestrates account management workflows
///
/// Every operation requires the caller to hold the admin role.
pub struct AdminCoordinator {
    credential_store: Arc<CredentialStore>,
    catalog_store: Arc<CatalogStore>,
}

impl AdminCoordinator {
    /// Create AdminCoordinator from AppData
    ///
    /// # Arguments
    /// * `app_data` - Application data containing all stores and providers
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            credential_store: app_data.credential_store.clone(),
            catalog_store: app_data.catalog_store.clone(),
        }
    }

    /// Paginated account listing with optional search
    pub async fn list_users(
        &self,
        ctx: &RequestContext,
        search: Option<&str>,
        page: PageRequest,
    ) -> Result<Page<(user::Model, Option<RoleName>)>, InternalError> {
        require_admin(&self.credential_store, ctx).await?;

        let roles: HashMap<i32, RoleName> = self
            .credential_store
            .list_roles()
            .await?
            .into_iter()
            .map(|role| (role.id, role.role))
            .collect();
        let users = self.credential_store.list_users(search, page).await?;

        Ok(users.map(|user| {
            let role = user.role_id.and_then(|id| roles.get(&id).copied());
            (user, role)
        }))
    }

    pub async fn get_user(
        &self,
        ctx: &RequestContext,
        user_id: i32,
    ) -> Result<(user::Model, Option<RoleName>), InternalError> {
        require_admin(&self.credential_store, ctx).await?;
        self.user_with_role(user_id).await
    }

    /// Create an account with an explicit role
    pub async fn create_user(
        &self,
        ctx: &RequestContext,
        new_user: NewUser,
    ) -> Result<(user::Model, Option<RoleName>), InternalError> {
        let admin = require_admin(&self.credential_store, ctx).await?;
        let role = new_user.role;
        let user = self.credential_store.create_user(new_user).await?;

        tracing::info!(request_id = %ctx.request_id, "User {} created by admin {} with role {:?}", user.id, admin.id, role);
        Ok((user, Some(role)))
    }

    /// Update any account field
    ///
    /// Deactivating an account or setting its password revokes its refresh tokens.
    pub async fn update_user(
        &self,
        ctx: &RequestContext,
        user_id: i32,
        update: UserUpdate,
    ) -> Result<(user::Model, Option<RoleName>), InternalError> {
        let admin = require_admin(&self.credential_store, ctx).await?;
        let revoke_sessions = update.is_active == Some(false) || update.password.is_some();

        self.credential_store.update_user(user_id, update).await?;
        if revoke_sessions {
            let revoked = self.credential_store.revoke_all_refresh_tokens(user_id).await?;
            tracing::info!(request_id = %ctx.request_id, "Revoked {} refresh tokens of user {}", revoked, user_id);
        }

        tracing::info!(request_id = %ctx.request_id, "User {} updated by admin {}", user_id, admin.id);
        self.user_with_role(user_id).await
    }

    /// Delete an account and everything it owns; admins cannot delete themselves
    pub async fn delete_user(&self, ctx: &RequestContext, user_id: i32) -> Result<(), InternalError> {
        let admin = require_admin(&self.credential_store, ctx).await?;
        if admin.id == user_id {
            return Err(AccessError::SelfDeletion.into());
        }

        self.credential_store.delete_user(user_id).await?;

        tracing::info!(request_id = %ctx.request_id, "User {} deleted by admin {}", user_id, admin.id);
        Ok(())
    }

    pub async fn list_roles(&self, ctx: &RequestContext) -> Result<Vec<role::Model>, InternalError> {
        require_admin(&self.credential_store, ctx).await?;
        self.credential_store.list_roles().await
    }

    /// Movie listing for the admin panel, same filters as the public one
    pub async fn list_movies(
        &self,
        ctx: &RequestContext,
        filter: &MovieFilter,
        page: PageRequest,
    ) -> Result<Page<movie::Model>, InternalError> {
        require_admin(&self.credential_store, ctx).await?;
        self.catalog_store.list_movies(filter, page).await
    }

    async fn user_with_role(&self, user_id: i32) -> Result<(user::Model, Option<RoleName>), InternalError> {
        let user = self.credential_store.get_user_by_id(user_id).await?;
        let role = self.credential_store.role_of(&user).await?;
        Ok((user, role))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::internal::CredentialError;
    use crate::test::utils::{TEST_PASSWORD, authenticated_context, new_user, setup_test_app_data};

    async fn setup() -> (Arc<AppData>, AdminCoordinator, RequestContext) {
        let app_data = setup_test_app_data().await;
        let coordinator = AdminCoordinator::new(app_data.clone());
        let (_, admin_ctx) = authenticated_context(&app_data, "root", RoleName::Admin).await;
        (app_data, coordinator, admin_ctx)
    }

    #[tokio::test]
    async fn test_admin_cannot_delete_self() {
        let (_app_data, coordinator, ctx) = setup().await;
        let own_id = ctx.user_id().unwrap();

        let result = coordinator.delete_user(&ctx, own_id).await;

        assert!(matches!(result, Err(InternalError::Access(AccessError::SelfDeletion))));
        assert!(coordinator.get_user(&ctx, own_id).await.is_ok());
    }

    #[tokio::test]
    async fn test_admin_deletes_other_account() {
        let (_app_data, coordinator, ctx) = setup().await;
        let (user, _) = coordinator.create_user(&ctx, new_user("neo", RoleName::User)).await.unwrap();

        coordinator.delete_user(&ctx, user.id).await.unwrap();

        assert!(matches!(
            coordinator.get_user(&ctx, user.id).await,
            Err(InternalError::Credential(CredentialError::UserNotFound(_)))
        ));
    }

    #[tokio::test]
    async fn test_list_users_carries_roles() {
        let (_app_data, coordinator, ctx) = setup().await;
        coordinator.create_user(&ctx, new_user("neo", RoleName::User)).await.unwrap();

        let page = coordinator.list_users(&ctx, Some("neo"), PageRequest::default()).await.unwrap();

        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].0.username, "neo");
        assert_eq!(page.items[0].1, Some(RoleName::User));
    }

    #[tokio::test]
    async fn test_promote_user_to_admin() {
        let (_app_data, coordinator, ctx) = setup().await;
        let (user, _) = coordinator.create_user(&ctx, new_user("neo", RoleName::User)).await.unwrap();

        let (_, role) = coordinator
            .update_user(&ctx, user.id, UserUpdate { role: Some(RoleName::Admin), ..Default::default() })
            .await
            .unwrap();

        assert_eq!(role, Some(RoleName::Admin));
    }

    #[tokio::test]
    async fn test_deactivated_user_cannot_log_in() {
        let (app_data, coordinator, ctx) = setup().await;
        let (user, _) = coordinator.create_user(&ctx, new_user("neo", RoleName::User)).await.unwrap();

        coordinator
            .update_user(&ctx, user.id, UserUpdate { is_active: Some(false), ..Default::default() })
            .await
            .unwrap();

        assert!(app_data.credential_store.verify_credentials("neo@example.com", TEST_PASSWORD).await.is_err());
    }

    #[tokio::test]
    async fn test_non_admin_is_rejected() {
        let (app_data, coordinator, _) = setup().await;
        let (_, user_ctx) = authenticated_context(&app_data, "neo", RoleName::User).await;

        assert!(matches!(
            coordinator.list_roles(&user_ctx).await,
            Err(InternalError::Access(AccessError::AdminRequired))
        ));
    }
}
