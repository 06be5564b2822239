use crate::errors::internal::{AccessError, CredentialError, InternalError};
use crate::types::dto::common::ErrorResponse;
use poem_openapi::{ApiResponse, payload::Json};
use std::fmt;

use super::error_body;

/// Admin user management error types
#[derive(ApiResponse, Debug)]
pub enum AdminError {
    /// Request payload failed validation
    #[oai(status = 400)]
    ValidationFailed(Json<ErrorResponse>),

    /// Cannot delete your own account
    #[oai(status = 400)]
    SelfDeletionDenied(Json<ErrorResponse>),

    /// Authentication required
    #[oai(status = 401)]
    Unauthorized(Json<ErrorResponse>),

    /// Admin role required
    #[oai(status = 403)]
    AdminRequired(Json<ErrorResponse>),

    /// User not found
    #[oai(status = 404)]
    UserNotFound(Json<ErrorResponse>),

    /// Email or username already in use
    #[oai(status = 409)]
    DuplicateAccount(Json<ErrorResponse>),

    /// Internal server error
    #[oai(status = 500)]
    InternalError(Json<ErrorResponse>),
}

impl AdminError {
    pub fn validation_failed(message: String) -> Self {
        AdminError::ValidationFailed(error_body("validation_failed", message, 400))
    }

    pub fn self_deletion_denied() -> Self {
        AdminError::SelfDeletionDenied(error_body("self_deletion_denied", "Cannot delete your own account", 400))
    }

    pub fn unauthorized() -> Self {
        AdminError::Unauthorized(error_body("unauthorized", "Authentication required", 401))
    }

    pub fn admin_required() -> Self {
        AdminError::AdminRequired(error_body("admin_required", "Admin role required", 403))
    }

    pub fn user_not_found(user_id: i32) -> Self {
        AdminError::UserNotFound(error_body("user_not_found", format!("User not found: {}", user_id), 404))
    }

    pub fn duplicate_account(message: String) -> Self {
        AdminError::DuplicateAccount(error_body("duplicate_account", message, 409))
    }

    fn internal_server_error() -> Self {
        AdminError::InternalError(error_body("internal_error", "An internal error occurred", 500))
    }

    /// Convert InternalError to AdminError
    ///
    /// This is the explicit conversion point from internal errors to API errors.
    /// Internal error details are logged but not exposed to clients.
    pub fn from_internal_error(err: InternalError) -> Self {
        match &err {
            InternalError::Access(AccessError::Unauthenticated) => Self::unauthorized(),
            InternalError::Access(AccessError::AdminRequired) => Self::admin_required(),
            InternalError::Access(AccessError::SelfDeletion) => Self::self_deletion_denied(),
            InternalError::Credential(CredentialError::UserNotFound(user_id)) => Self::user_not_found(*user_id),
            InternalError::Credential(CredentialError::DuplicateEmail(_))
            | InternalError::Credential(CredentialError::DuplicateUsername(_)) => {
                Self::duplicate_account(err.to_string())
            }
            InternalError::Credential(CredentialError::InvalidField { .. }) => {
                Self::validation_failed(err.to_string())
            }
            _ => {
                tracing::error!("Unexpected error in admin operation: {}", err);
                Self::internal_server_error()
            }
        }
    }

    /// Get the error payload from the error variant
    pub fn body(&self) -> &ErrorResponse {
        match self {
            AdminError::ValidationFailed(json)
            | AdminError::SelfDeletionDenied(json)
            | AdminError::Unauthorized(json)
            | AdminError::AdminRequired(json)
            | AdminError::UserNotFound(json)
            | AdminError::DuplicateAccount(json)
            | AdminError::InternalError(json) => &json.0,
        }
    }

    pub fn message(&self) -> String {
        self.body().message.clone()
    }

    pub fn status_code(&self) -> u16 {
        self.body().status_code
    }
}

impl From<InternalError> for AdminError {
    fn from(err: InternalError) -> Self {
        Self::from_internal_error(err)
    }
}

impl fmt::Display for AdminError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}
