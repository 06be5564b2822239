use crate::errors::internal::{AccessError, CatalogError, CollectionError, InternalError, RatingError};
use crate::types::dto::common::ErrorResponse;
use poem_openapi::{ApiResponse, payload::Json};
use std::fmt;

use super::error_body;

/// Errors for the movie-facing endpoints: catalog, ratings and collections
#[derive(ApiResponse, Debug)]
pub enum MovieError {
    /// Request payload failed validation
    #[oai(status = 400)]
    ValidationFailed(Json<ErrorResponse>),

    /// Authentication required
    #[oai(status = 401)]
    Unauthorized(Json<ErrorResponse>),

    /// Admin role required
    #[oai(status = 403)]
    Forbidden(Json<ErrorResponse>),

    /// Referenced movie, catalog entry, rating or membership does not exist
    #[oai(status = 404)]
    NotFound(Json<ErrorResponse>),

    /// Uniqueness conflict
    #[oai(status = 409)]
    Conflict(Json<ErrorResponse>),

    /// Internal server error
    #[oai(status = 500)]
    InternalError(Json<ErrorResponse>),
}

impl MovieError {
    pub fn validation_failed(message: String) -> Self {
        MovieError::ValidationFailed(error_body("validation_failed", message, 400))
    }

    pub fn unauthorized() -> Self {
        MovieError::Unauthorized(error_body("unauthorized", "Authentication required", 401))
    }

    pub fn forbidden() -> Self {
        MovieError::Forbidden(error_body("forbidden", "Admin role required", 403))
    }

    pub fn not_found(message: String) -> Self {
        MovieError::NotFound(error_body("not_found", message, 404))
    }

    pub fn conflict(message: String) -> Self {
        MovieError::Conflict(error_body("conflict", message, 409))
    }

    fn internal_server_error() -> Self {
        MovieError::InternalError(error_body("internal_error", "An internal error occurred", 500))
    }

    /// Convert InternalError to MovieError
    ///
    /// Infrastructure details are logged here and never sent to the client.
    pub fn from_internal_error(err: InternalError) -> Self {
        match &err {
            InternalError::Rating(RatingError::InvalidValue(_))
            | InternalError::Catalog(CatalogError::InvalidField { .. }) => {
                Self::validation_failed(err.to_string())
            }
            InternalError::Rating(RatingError::NotFound { .. })
            | InternalError::Catalog(CatalogError::MovieNotFound(_))
            | InternalError::Catalog(CatalogError::GenreNotFound(_))
            | InternalError::Catalog(CatalogError::DirectorNotFound(_))
            | InternalError::Catalog(CatalogError::ActorNotFound(_))
            | InternalError::Collection(CollectionError::NotInCollection { .. }) => {
                Self::not_found(err.to_string())
            }
            InternalError::Catalog(CatalogError::DuplicateGenre(_)) => Self::conflict(err.to_string()),
            InternalError::Access(AccessError::Unauthenticated) => Self::unauthorized(),
            InternalError::Access(AccessError::AdminRequired) => Self::forbidden(),
            _ => {
                tracing::error!("Unexpected error in movie operation: {}", err);
                Self::internal_server_error()
            }
        }
    }

    /// Get the error payload from the error variant
    pub fn body(&self) -> &ErrorResponse {
        match self {
            MovieError::ValidationFailed(json)
            | MovieError::Unauthorized(json)
            | MovieError::Forbidden(json)
            | MovieError::NotFound(json)
            | MovieError::Conflict(json)
            | MovieError::InternalError(json) => &json.0,
        }
    }

    pub fn message(&self) -> String {
        self.body().message.clone()
    }

    pub fn status_code(&self) -> u16 {
        self.body().status_code
    }
}

impl From<InternalError> for MovieError {
    fn from(err: InternalError) -> Self {
        Self::from_internal_error(err)
    }
}

impl fmt::Display for MovieError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}
