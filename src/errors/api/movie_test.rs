#[cfg(test)]
mod tests {
    use crate::errors::MovieError;
    use crate::errors::internal::{AccessError, CatalogError, CollectionError, InternalError, RatingError};
    use sea_orm::DbErr;

    #[test]
    fn test_invalid_rating_is_validation_failure() {
        let movie_err = MovieError::from_internal_error(RatingError::InvalidValue(11).into());

        assert!(matches!(movie_err, MovieError::ValidationFailed(_)));
        assert_eq!(movie_err.message(), "Rating must be between 0 and 10, got 11");
    }

    #[test]
    fn test_missing_rating_is_not_found() {
        let movie_err =
            MovieError::from_internal_error(RatingError::NotFound { user_id: 1, movie_id: 2 }.into());

        assert_eq!(movie_err.status_code(), 404);
    }

    #[test]
    fn test_missing_catalog_entries_are_not_found() {
        for err in [
            CatalogError::MovieNotFound(1),
            CatalogError::GenreNotFound(2),
            CatalogError::DirectorNotFound(3),
            CatalogError::ActorNotFound(4),
        ] {
            let movie_err = MovieError::from_internal_error(err.into());
            assert!(matches!(movie_err, MovieError::NotFound(_)));
        }
    }

    #[test]
    fn test_collection_membership_missing_is_not_found() {
        let movie_err = MovieError::from_internal_error(
            CollectionError::NotInCollection { collection: "watchlist", movie_id: 5 }.into(),
        );

        assert_eq!(movie_err.message(), "Movie 5 is not in the watchlist");
        assert_eq!(movie_err.status_code(), 404);
    }

    #[test]
    fn test_duplicate_genre_is_conflict() {
        let movie_err = MovieError::from_internal_error(CatalogError::DuplicateGenre("Drama".to_string()).into());

        assert_eq!(movie_err.status_code(), 409);
    }

    #[test]
    fn test_access_errors_map_to_401_and_403() {
        let unauthenticated = MovieError::from_internal_error(AccessError::Unauthenticated.into());
        let forbidden = MovieError::from_internal_error(AccessError::AdminRequired.into());

        assert_eq!(unauthenticated.status_code(), 401);
        assert_eq!(forbidden.status_code(), 403);
    }

    #[test]
    fn test_database_error_hides_details() {
        let movie_err = MovieError::from_internal_error(InternalError::database(
            "recompute_average",
            DbErr::Custom("disk I/O error".to_string()),
        ));

        assert_eq!(movie_err.status_code(), 500);
        assert_eq!(movie_err.message(), "An internal error occurred");
    }
}
