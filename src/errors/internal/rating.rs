use thiserror::Error;

#[derive(Error, Debug)]
pub enum RatingError {
    /// Score outside 0..=10
    #[error("Rating must be between 0 and 10, got {0}")]
    InvalidValue(i64),

    #[error("No rating found for user {user_id} on movie {movie_id}")]
    NotFound { user_id: i32, movie_id: i32 },
}
