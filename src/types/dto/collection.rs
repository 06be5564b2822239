use poem_openapi::Object;

use crate::types::dto::movie::MovieResponse;
use crate::types::internal::collection::CollectionEntry;

#[derive(Object, Debug)]
pub struct CollectionEntryResponse {
    pub movie: MovieResponse,
    /// Unix seconds
    pub added_at: i64,
}

impl From<CollectionEntry> for CollectionEntryResponse {
    fn from(entry: CollectionEntry) -> Self {
        Self {
            movie: entry.movie.into(),
            added_at: entry.added_at,
        }
    }
}

/// Result of adding a movie to favorites or the watchlist
#[derive(Object, Debug)]
pub struct CollectionAddResponse {
    pub movie_id: i32,
    /// False when the movie was already in the collection
    pub added: bool,
    pub message: String,
}

#[derive(Object, Debug)]
pub struct CollectionStatusResponse {
    pub movie_id: i32,
    pub in_collection: bool,
}
