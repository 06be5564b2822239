use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Movie not found: {0}")]
    MovieNotFound(i32),

    #[error("Genre not found: {0}")]
    GenreNotFound(i32),

    #[error("Director not found: {0}")]
    DirectorNotFound(i32),

    #[error("Actor not found: {0}")]
    ActorNotFound(i32),

    #[error("Genre already exists: {0}")]
    DuplicateGenre(String),

    #[error("Invalid {field}: {reason}")]
    InvalidField { field: String, reason: String },
}

impl CatalogError {
    pub fn invalid_field(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Favorites and watchlist membership errors
#[derive(Error, Debug)]
pub enum CollectionError {
    #[error("Movie {movie_id} is not in the {collection}")]
    NotInCollection {
        collection: &'static str,
        movie_id: i32,
    },
}
