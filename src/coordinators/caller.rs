use crate::errors::InternalError;
use crate::errors::internal::{AccessError, CredentialError};
use crate::stores::CredentialStore;
use crate::types::internal::auth::{AuthenticatedUser, is_admin};
use crate::types::internal::context::RequestContext;

/// Resolve the bearer of the request into an active account
///
/// A missing token, an unparsable subject and a deleted or deactivated
/// account all count as unauthenticated.
pub(crate) async fn resolve_caller(
    credential_store: &CredentialStore,
    ctx: &RequestContext,
) -> Result<AuthenticatedUser, InternalError> {
    let user_id = ctx.user_id().ok_or(AccessError::Unauthenticated)?;

    match credential_store.get_authenticated_user(user_id).await {
        Err(InternalError::Credential(CredentialError::UserNotFound(_))) => {
            tracing::warn!(request_id = %ctx.request_id, "Token subject {} no longer resolves to an active account", user_id);
            Err(AccessError::Unauthenticated.into())
        }
        other => other,
    }
}

/// Resolve the caller and require the admin role
pub(crate) async fn require_admin(
    credential_store: &CredentialStore,
    ctx: &RequestContext,
) -> Result<AuthenticatedUser, InternalError> {
    let user = resolve_caller(credential_store, ctx).await?;
    if !is_admin(&user) {
        tracing::warn!(request_id = %ctx.request_id, "Admin operation denied for user {}", user.id);
        return Err(AccessError::AdminRequired.into());
    }
    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::utils::{authenticated_context, setup_test_app_data};
    use crate::types::db::role::RoleName;

    #[tokio::test]
    async fn test_anonymous_context_is_unauthenticated() {
        let app_data = setup_test_app_data().await;

        let result = resolve_caller(&app_data.credential_store, &RequestContext::new()).await;

        assert!(matches!(result, Err(InternalError::Access(AccessError::Unauthenticated))));
    }

    #[tokio::test]
    async fn test_require_admin_checks_role() {
        let app_data = setup_test_app_data().await;
        let (_, admin_ctx) = authenticated_context(&app_data, "root", RoleName::Admin).await;
        let (_, user_ctx) = authenticated_context(&app_data, "neo", RoleName::User).await;

        assert!(require_admin(&app_data.credential_store, &admin_ctx).await.is_ok());
        assert!(matches!(
            require_admin(&app_data.credential_store, &user_ctx).await,
            Err(InternalError::Access(AccessError::AdminRequired))
        ));
    }

    #[tokio::test]
    async fn test_deleted_account_is_unauthenticated() {
        let app_data = setup_test_app_data().await;
        let (user, ctx) = authenticated_context(&app_data, "neo", RoleName::User).await;
        app_data.credential_store.delete_user(user.id).await.unwrap();

        let result = resolve_caller(&app_data.credential_store, &ctx).await;

        assert!(matches!(result, Err(InternalError::Access(AccessError::Unauthenticated))));
    }
}
