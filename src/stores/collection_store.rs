use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{
    ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, SqlErr,
};

use crate::errors::InternalError;
use crate::errors::internal::CollectionError;
use crate::stores::catalog_store::require_movie;
use crate::types::db::{favorite, movie, watchlist};
use crate::types::internal::collection::{Collection, CollectionEntry};

/// Favorites and watchlist membership, one row per (user, movie) and list
pub struct CollectionStore {
    db: DatabaseConnection,
}

impl CollectionStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Add a movie to a user's list
    ///
    /// Adding a movie that is already present is a no-op.
    ///
    /// # Returns
    /// * `Ok(true)` - A membership row was created
    /// * `Ok(false)` - The movie was already in the list
    pub async fn add(&self, collection: Collection, user_id: i32, movie_id: i32) -> Result<bool, InternalError> {
        require_movie(&self.db, movie_id).await?;
        if self.contains(collection, user_id, movie_id).await? {
            return Ok(false);
        }
        let now = Utc::now().timestamp();

        let inserted = match collection {
            Collection::Favorites => favorite::Entity::insert(favorite::ActiveModel {
                user_id: Set(user_id),
                movie_id: Set(movie_id),
                created_at: Set(now),
                ..Default::default()
            })
            .exec(&self.db)
            .await
            .map(|_| ()),
            Collection::Watchlist => watchlist::Entity::insert(watchlist::ActiveModel {
                user_id: Set(user_id),
                movie_id: Set(movie_id),
                created_at: Set(now),
                ..Default::default()
            })
            .exec(&self.db)
            .await
            .map(|_| ()),
        };

        let added = match inserted {
            Ok(()) => true,
            // A concurrent add won the unique index
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => false,
            Err(e) => return Err(InternalError::database("add_to_collection", e)),
        };
        if added {
            tracing::debug!(user_id, movie_id, "Movie added to {}", collection);
        }
        Ok(added)
    }

    /// Remove a movie from a user's list, failing if it is not there
    pub async fn remove(&self, collection: Collection, user_id: i32, movie_id: i32) -> Result<(), InternalError> {
        let result = match collection {
            Collection::Favorites => {
                favorite::Entity::delete_many()
                    .filter(favorite::Column::UserId.eq(user_id))
                    .filter(favorite::Column::MovieId.eq(movie_id))
                    .exec(&self.db)
                    .await
            }
            Collection::Watchlist => {
                watchlist::Entity::delete_many()
                    .filter(watchlist::Column::UserId.eq(user_id))
                    .filter(watchlist::Column::MovieId.eq(movie_id))
                    .exec(&self.db)
                    .await
            }
        }
        .map_err(|e| InternalError::database("remove_from_collection", e))?;

        if result.rows_affected == 0 {
            return Err(CollectionError::NotInCollection {
                collection: collection.label(),
                movie_id,
            }
            .into());
        }

        tracing::debug!(user_id, movie_id, "Movie removed from {}", collection);
        Ok(())
    }

    pub async fn contains(&self, collection: Collection, user_id: i32, movie_id: i32) -> Result<bool, InternalError> {
        let count = match collection {
            Collection::Favorites => {
                favorite::Entity::find()
                    .filter(favorite::Column::UserId.eq(user_id))
                    .filter(favorite::Column::MovieId.eq(movie_id))
                    .count(&self.db)
                    .await
            }
            Collection::Watchlist => {
                watchlist::Entity::find()
                    .filter(watchlist::Column::UserId.eq(user_id))
                    .filter(watchlist::Column::MovieId.eq(movie_id))
                    .count(&self.db)
                    .await
            }
        }
        .map_err(|e| InternalError::database("check_collection", e))?;

        Ok(count > 0)
    }

    /// The user's list, most recently added first
    pub async fn list(&self, collection: Collection, user_id: i32) -> Result<Vec<CollectionEntry>, InternalError> {
        let memberships: Vec<(i32, i64)> = match collection {
            Collection::Favorites => favorite::Entity::find()
                .filter(favorite::Column::UserId.eq(user_id))
                .order_by_desc(favorite::Column::CreatedAt)
                .order_by_desc(favorite::Column::Id)
                .all(&self.db)
                .await
                .map(|rows| rows.into_iter().map(|row| (row.movie_id, row.created_at)).collect()),
            Collection::Watchlist => watchlist::Entity::find()
                .filter(watchlist::Column::UserId.eq(user_id))
                .order_by_desc(watchlist::Column::CreatedAt)
                .order_by_desc(watchlist::Column::Id)
                .all(&self.db)
                .await
                .map(|rows| rows.into_iter().map(|row| (row.movie_id, row.created_at)).collect()),
        }
        .map_err(|e| InternalError::database("list_collection", e))?;

        if memberships.is_empty() {
            return Ok(Vec::new());
        }

        let mut movies: HashMap<i32, movie::Model> = movie::Entity::find()
            .filter(movie::Column::Id.is_in(memberships.iter().map(|(movie_id, _)| *movie_id)))
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("load_collection_movies", e))?
            .into_iter()
            .map(|movie| (movie.id, movie))
            .collect();

        Ok(memberships
            .into_iter()
            .filter_map(|(movie_id, added_at)| {
                movies
                    .remove(&movie_id)
                    .map(|movie| CollectionEntry { movie, added_at })
            })
            .collect())
    }
}

impl std::fmt::Debug for CollectionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CollectionStore").field("db", &"<connection>").finish()
    }
}
