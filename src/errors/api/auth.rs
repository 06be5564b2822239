use crate::errors::internal::{AccessError, CredentialError, InternalError};
use crate::types::dto::common::ErrorResponse;
use poem_openapi::{ApiResponse, payload::Json};
use std::fmt;

use super::error_body;

/// Authentication and account error types
#[derive(ApiResponse, Debug)]
pub enum AuthError {
    /// Invalid email or password
    #[oai(status = 401)]
    InvalidCredentials(Json<ErrorResponse>),

    /// Current password is incorrect
    #[oai(status = 400)]
    IncorrectPassword(Json<ErrorResponse>),

    /// Email or username already in use
    #[oai(status = 409)]
    DuplicateAccount(Json<ErrorResponse>),

    /// Request payload failed validation
    #[oai(status = 400)]
    ValidationFailed(Json<ErrorResponse>),

    /// Invalid or malformed token
    #[oai(status = 401)]
    InvalidToken(Json<ErrorResponse>),

    /// Token has expired
    #[oai(status = 401)]
    ExpiredToken(Json<ErrorResponse>),

    /// Authentication required
    #[oai(status = 401)]
    Unauthorized(Json<ErrorResponse>),

    /// User not found
    #[oai(status = 404)]
    UserNotFound(Json<ErrorResponse>),

    /// Internal server error
    #[oai(status = 500)]
    InternalError(Json<ErrorResponse>),
}

impl AuthError {
    pub fn invalid_credentials() -> Self {
        AuthError::InvalidCredentials(error_body("invalid_credentials", "Invalid email or password", 401))
    }

    pub fn incorrect_password() -> Self {
        AuthError::IncorrectPassword(error_body("incorrect_password", "Current password is incorrect", 400))
    }

    pub fn duplicate_account(message: String) -> Self {
        AuthError::DuplicateAccount(error_body("duplicate_account", message, 409))
    }

    pub fn validation_failed(message: String) -> Self {
        AuthError::ValidationFailed(error_body("validation_failed", message, 400))
    }

    pub fn invalid_token() -> Self {
        AuthError::InvalidToken(error_body("invalid_token", "Invalid or malformed token", 401))
    }

    pub fn expired_token() -> Self {
        AuthError::ExpiredToken(error_body("expired_token", "Token has expired", 401))
    }

    pub fn unauthorized() -> Self {
        AuthError::Unauthorized(error_body("unauthorized", "Authentication required", 401))
    }

    pub fn user_not_found(user_id: i32) -> Self {
        AuthError::UserNotFound(error_body("user_not_found", format!("User not found: {}", user_id), 404))
    }

    fn internal_server_error() -> Self {
        AuthError::InternalError(error_body("internal_error", "An internal error occurred", 500))
    }

    /// Convert InternalError to AuthError
    ///
    /// Infrastructure details are logged here and never sent to the client.
    pub fn from_internal_error(err: InternalError) -> Self {
        match &err {
            InternalError::Credential(CredentialError::InvalidCredentials) => Self::invalid_credentials(),
            InternalError::Credential(CredentialError::IncorrectPassword) => Self::incorrect_password(),
            InternalError::Credential(CredentialError::DuplicateEmail(_))
            | InternalError::Credential(CredentialError::DuplicateUsername(_)) => {
                Self::duplicate_account(err.to_string())
            }
            InternalError::Credential(CredentialError::InvalidField { .. }) => {
                Self::validation_failed(err.to_string())
            }
            InternalError::Credential(CredentialError::UserNotFound(user_id)) => Self::user_not_found(*user_id),
            InternalError::Credential(CredentialError::InvalidToken { .. }) => Self::invalid_token(),
            InternalError::Credential(CredentialError::ExpiredToken(_)) => Self::expired_token(),
            InternalError::Access(AccessError::Unauthenticated) => Self::unauthorized(),
            _ => {
                tracing::error!("Unexpected error in auth operation: {}", err);
                Self::internal_server_error()
            }
        }
    }

    /// Get the error payload from the error variant
    pub fn body(&self) -> &ErrorResponse {
        match self {
            AuthError::InvalidCredentials(json)
            | AuthError::IncorrectPassword(json)
            | AuthError::DuplicateAccount(json)
            | AuthError::ValidationFailed(json)
            | AuthError::InvalidToken(json)
            | AuthError::ExpiredToken(json)
            | AuthError::Unauthorized(json)
            | AuthError::UserNotFound(json)
            | AuthError::InternalError(json) => &json.0,
        }
    }

    pub fn message(&self) -> String {
        self.body().message.clone()
    }

    pub fn status_code(&self) -> u16 {
        self.body().status_code
    }
}

impl From<InternalError> for AuthError {
    fn from(err: InternalError) -> Self {
        Self::from_internal_error(err)
    }
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}
