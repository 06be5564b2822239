use std::sync::Arc;

use chrono::Utc;
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, TransactionTrait,
};

use crate::errors::InternalError;
use crate::errors::internal::RatingError;
use crate::services::AverageMaintainer;
use crate::stores::catalog_store::require_movie;
use crate::types::db::rating;
use crate::types::internal::rating::{RatingDeleteOutcome, RatingValue, RatingWriteOutcome};

/// Persists one rating per (user, movie) pair
///
/// Every write path ends with an explicit call into the [`AverageMaintainer`]
/// for the affected movie, after the rating change has committed. A failed
/// recompute never undoes the rating; it is logged and reported through
/// `average_refreshed = false`.
pub struct RatingStore {
    db: DatabaseConnection,
    average_maintainer: Arc<AverageMaintainer>,
}

impl RatingStore {
    pub fn new(db: DatabaseConnection, average_maintainer: Arc<AverageMaintainer>) -> Self {
        Self {
            db,
            average_maintainer,
        }
    }

    /// Create or overwrite the caller's rating for a movie
    ///
    /// The value is validated before anything touches the database. The write
    /// starts with `INSERT ... ON CONFLICT (user_id, movie_id) DO NOTHING`; when
    /// that inserts no row the pair already exists and the value is updated in
    /// place. Whether the rating was created is decided by the insert itself,
    /// so a concurrent duplicate create lands as an update and only one of the
    /// racing writers reports `created`.
    ///
    /// # Returns
    /// * `Ok(RatingWriteOutcome)` - Stored rating, whether it was created, and the movie average
    /// * `Err(InternalError)` - Invalid value, unknown movie, or database failure
    pub async fn upsert(
        &self,
        user_id: i32,
        movie_id: i32,
        value: i64,
    ) -> Result<RatingWriteOutcome, InternalError> {
        let value = RatingValue::try_from(value)?;
        let now = Utc::now().timestamp();

        let txn = self.db.begin().await.map_err(InternalError::transaction_begin)?;

        require_movie(&txn, movie_id).await?;

        let new_rating = rating::ActiveModel {
            user_id: Set(user_id),
            movie_id: Set(movie_id),
            rating: Set(value.get()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let inserted = rating::Entity::insert(new_rating)
            .on_conflict(
                OnConflict::columns([rating::Column::UserId, rating::Column::MovieId])
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&txn)
            .await
            .map_err(|e| InternalError::database("insert_rating", e))?;

        let created = inserted > 0;
        if !created {
            rating::Entity::update_many()
                .col_expr(rating::Column::Rating, Expr::value(value.get()))
                .col_expr(rating::Column::UpdatedAt, Expr::value(now))
                .filter(rating::Column::UserId.eq(user_id))
                .filter(rating::Column::MovieId.eq(movie_id))
                .exec(&txn)
                .await
                .map_err(|e| InternalError::database("update_rating", e))?;
        }

        let stored = rating::Entity::find()
            .filter(rating::Column::UserId.eq(user_id))
            .filter(rating::Column::MovieId.eq(movie_id))
            .one(&txn)
            .await
            .map_err(|e| InternalError::database("reload_rating", e))?
            .ok_or(RatingError::NotFound { user_id, movie_id })?;

        txn.commit().await.map_err(InternalError::transaction_commit)?;

        let (movie_average, average_refreshed) = self.refresh_average(movie_id).await;

        tracing::info!(
            user_id,
            movie_id,
            rating = stored.rating,
            created,
            movie_average,
            "Rating saved"
        );

        Ok(RatingWriteOutcome {
            rating: stored,
            created,
            movie_average,
            average_refreshed,
        })
    }

    /// Remove the caller's rating for a movie
    pub async fn delete(&self, user_id: i32, movie_id: i32) -> Result<RatingDeleteOutcome, InternalError> {
        let result = rating::Entity::delete_many()
            .filter(rating::Column::UserId.eq(user_id))
            .filter(rating::Column::MovieId.eq(movie_id))
            .exec(&self.db)
            .await
            .map_err(|e| InternalError::database("delete_rating", e))?;

        if result.rows_affected == 0 {
            return Err(RatingError::NotFound { user_id, movie_id }.into());
        }

        let (movie_average, average_refreshed) = self.refresh_average(movie_id).await;

        tracing::info!(user_id, movie_id, movie_average, "Rating deleted");

        Ok(RatingDeleteOutcome {
            movie_id,
            movie_average,
            average_refreshed,
        })
    }

    pub async fn get(&self, user_id: i32, movie_id: i32) -> Result<rating::Model, InternalError> {
        rating::Entity::find()
            .filter(rating::Column::UserId.eq(user_id))
            .filter(rating::Column::MovieId.eq(movie_id))
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("get_rating", e))?
            .ok_or_else(|| RatingError::NotFound { user_id, movie_id }.into())
    }

    /// All ratings of a movie, in no particular order
    pub async fn list_for_movie(&self, movie_id: i32) -> Result<Vec<rating::Model>, InternalError> {
        rating::Entity::find()
            .filter(rating::Column::MovieId.eq(movie_id))
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("list_ratings_for_movie", e))
    }

    /// The user's ratings, most recent first
    pub async fn list_for_user(&self, user_id: i32) -> Result<Vec<rating::Model>, InternalError> {
        rating::Entity::find()
            .filter(rating::Column::UserId.eq(user_id))
            .order_by_desc(rating::Column::CreatedAt)
            .order_by_desc(rating::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("list_ratings_for_user", e))
    }

    /// Remove every rating by a user and recompute each movie they had rated
    ///
    /// Used by account deletion. Returns the affected movie ids.
    pub async fn delete_all_for_user(&self, user_id: i32) -> Result<Vec<i32>, InternalError> {
        let movie_ids: Vec<i32> = rating::Entity::find()
            .select_only()
            .column(rating::Column::MovieId)
            .filter(rating::Column::UserId.eq(user_id))
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("list_rated_movies", e))?;

        if movie_ids.is_empty() {
            return Ok(movie_ids);
        }

        rating::Entity::delete_many()
            .filter(rating::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await
            .map_err(|e| InternalError::database("delete_ratings_for_user", e))?;

        for movie_id in &movie_ids {
            self.refresh_average(*movie_id).await;
        }

        tracing::debug!(user_id, movies = movie_ids.len(), "Removed all ratings for user");

        Ok(movie_ids)
    }

    /// Run the maintainer, falling back to the stored average on failure
    ///
    /// The average is `None` only when the stored value cannot be read either.
    async fn refresh_average(&self, movie_id: i32) -> (Option<f64>, bool) {
        match self.average_maintainer.recompute(movie_id).await {
            Ok(average) => (Some(average), true),
            Err(e) => {
                tracing::error!("Average rating recompute failed for movie {}: {}", movie_id, e);
                match self.average_maintainer.stored_average(movie_id).await {
                    Ok(stored) => (Some(stored), false),
                    Err(e) => {
                        tracing::error!("Could not read stored average for movie {}: {}", movie_id, e);
                        (None, false)
                    }
                }
            }
        }
    }
}

impl std::fmt::Debug for RatingStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RatingStore")
            .field("db", &"<connection>")
            .field("average_maintainer", &self.average_maintainer)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::internal::CatalogError;
    use crate::test::utils::{insert_movie, insert_user, setup_file_test_db, setup_test_db};
    use sea_orm::{ConnectionTrait, PaginatorTrait};

    async fn setup() -> (DatabaseConnection, RatingStore) {
        let db = setup_test_db().await;
        let maintainer = Arc::new(AverageMaintainer::new(db.clone()));
        let store = RatingStore::new(db.clone(), maintainer);
        (db, store)
    }

    async fn stored_average(db: &DatabaseConnection, movie_id: i32) -> f64 {
        AverageMaintainer::new(db.clone()).stored_average(movie_id).await.unwrap()
    }

    #[tokio::test]
    async fn test_upsert_creates_then_updates() {
        let (db, store) = setup().await;
        let movie_id = insert_movie(&db, "Heat").await;
        let user_id = insert_user(&db, "alice").await;

        let first = store.upsert(user_id, movie_id, 7).await.unwrap();
        assert!(first.created);
        assert_eq!(first.rating.rating, 7);
        assert_eq!(first.movie_average, Some(7.0));
        assert!(first.average_refreshed);

        let second = store.upsert(user_id, movie_id, 9).await.unwrap();
        assert!(!second.created);
        assert_eq!(second.rating.rating, 9);
        assert_eq!(second.rating.id, first.rating.id);
        assert_eq!(second.movie_average, Some(9.0));

        let count = rating::Entity::find()
            .filter(rating::Column::UserId.eq(user_id))
            .filter(rating::Column::MovieId.eq(movie_id))
            .count(&db)
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_upsert_boundaries() {
        let (db, store) = setup().await;
        let movie_id = insert_movie(&db, "Heat").await;
        let alice = insert_user(&db, "alice").await;
        let bob = insert_user(&db, "bob").await;

        assert!(store.upsert(alice, movie_id, 0).await.is_ok());
        assert!(store.upsert(bob, movie_id, 10).await.is_ok());

        let too_high = store.upsert(alice, movie_id, 11).await;
        assert!(matches!(too_high, Err(InternalError::Rating(RatingError::InvalidValue(11)))));
        let too_low = store.upsert(alice, movie_id, -1).await;
        assert!(matches!(too_low, Err(InternalError::Rating(RatingError::InvalidValue(-1)))));

        // Rejected writes leave the stored value alone
        assert_eq!(store.get(alice, movie_id).await.unwrap().rating, 0);
        assert_eq!(stored_average(&db, movie_id).await, 5.0);
    }

    #[tokio::test]
    async fn test_upsert_unknown_movie_is_not_found() {
        let (db, store) = setup().await;
        let user_id = insert_user(&db, "alice").await;

        let result = store.upsert(user_id, 404, 5).await;
        assert!(matches!(result, Err(InternalError::Catalog(CatalogError::MovieNotFound(404)))));
    }

    #[tokio::test]
    async fn test_average_follows_writes_and_deletes() {
        let (db, store) = setup().await;
        let movie_id = insert_movie(&db, "Heat").await;
        let alice = insert_user(&db, "alice").await;
        let bob = insert_user(&db, "bob").await;

        store.upsert(alice, movie_id, 10).await.unwrap();
        let outcome = store.upsert(bob, movie_id, 0).await.unwrap();
        assert_eq!(outcome.movie_average, Some(5.0));
        assert_eq!(stored_average(&db, movie_id).await, 5.0);

        let deleted = store.delete(bob, movie_id).await.unwrap();
        assert_eq!(deleted.movie_average, Some(10.0));
        assert!(deleted.average_refreshed);
        assert_eq!(stored_average(&db, movie_id).await, 10.0);

        store.delete(alice, movie_id).await.unwrap();
        assert_eq!(stored_average(&db, movie_id).await, 0.0);
    }

    #[tokio::test]
    async fn test_delete_missing_rating_is_not_found() {
        let (db, store) = setup().await;
        let movie_id = insert_movie(&db, "Heat").await;
        let user_id = insert_user(&db, "alice").await;

        let result = store.delete(user_id, movie_id).await;
        assert!(matches!(
            result,
            Err(InternalError::Rating(RatingError::NotFound { .. }))
        ));
    }

    #[tokio::test]
    async fn test_get_round_trip_and_missing() {
        let (db, store) = setup().await;
        let movie_id = insert_movie(&db, "Heat").await;
        let user_id = insert_user(&db, "alice").await;

        assert!(store.get(user_id, movie_id).await.is_err());

        store.upsert(user_id, movie_id, 6).await.unwrap();
        let fetched = store.get(user_id, movie_id).await.unwrap();
        assert_eq!(fetched.rating, 6);
        assert_eq!(fetched.user_id, user_id);
        assert_eq!(fetched.movie_id, movie_id);
    }

    #[tokio::test]
    async fn test_list_for_user_newest_first() {
        let (db, store) = setup().await;
        let first = insert_movie(&db, "Heat").await;
        let second = insert_movie(&db, "Ronin").await;
        let user_id = insert_user(&db, "alice").await;

        store.upsert(user_id, first, 4).await.unwrap();
        store.upsert(user_id, second, 8).await.unwrap();

        // Same-second timestamps fall back to id order
        let listed = store.list_for_user(user_id).await.unwrap();
        let movie_ids: Vec<i32> = listed.iter().map(|r| r.movie_id).collect();
        assert_eq!(movie_ids, vec![second, first]);

        let for_movie = store.list_for_movie(first).await.unwrap();
        assert_eq!(for_movie.len(), 1);
    }

    #[tokio::test]
    async fn test_delete_all_for_user_recomputes_movies() {
        let (db, store) = setup().await;
        let first = insert_movie(&db, "Heat").await;
        let second = insert_movie(&db, "Ronin").await;
        let alice = insert_user(&db, "alice").await;
        let bob = insert_user(&db, "bob").await;

        store.upsert(alice, first, 2).await.unwrap();
        store.upsert(bob, first, 8).await.unwrap();
        store.upsert(alice, second, 6).await.unwrap();

        let mut affected = store.delete_all_for_user(alice).await.unwrap();
        affected.sort();

        assert_eq!(affected, vec![first, second]);
        assert_eq!(stored_average(&db, first).await, 8.0);
        assert_eq!(stored_average(&db, second).await, 0.0);
        assert!(store.list_for_user(alice).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failed_recompute_keeps_rating() {
        let (db, store) = setup().await;
        let movie_id = insert_movie(&db, "Heat").await;
        let user_id = insert_user(&db, "alice").await;

        db.execute_unprepared(
            "CREATE TRIGGER block_average BEFORE UPDATE OF average_rating ON movies \
             BEGIN SELECT RAISE(ABORT, 'average locked'); END;",
        )
        .await
        .unwrap();

        let outcome = store.upsert(user_id, movie_id, 9).await.unwrap();

        assert!(outcome.created);
        assert!(!outcome.average_refreshed);
        assert_eq!(outcome.movie_average, Some(0.0));
        assert_eq!(store.get(user_id, movie_id).await.unwrap().rating, 9);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_concurrent_first_writes_for_pair_keep_one_row() {
        let (db, path) = setup_file_test_db().await;
        let movie_id = insert_movie(&db, "Heat").await;
        let user_id = insert_user(&db, "alice").await;
        let maintainer = Arc::new(AverageMaintainer::new(db.clone()));
        let store = Arc::new(RatingStore::new(db.clone(), maintainer));

        let first = tokio::spawn({
            let store = store.clone();
            async move { store.upsert(user_id, movie_id, 3).await }
        });
        let second = tokio::spawn({
            let store = store.clone();
            async move { store.upsert(user_id, movie_id, 7).await }
        });
        let (first, second) = tokio::join!(first, second);
        let first = first.unwrap().unwrap();
        let second = second.unwrap().unwrap();

        assert_eq!(
            [first.created, second.created].iter().filter(|created| **created).count(),
            1
        );

        let rows = rating::Entity::find()
            .filter(rating::Column::UserId.eq(user_id))
            .filter(rating::Column::MovieId.eq(movie_id))
            .all(&db)
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert!(rows[0].rating == 3 || rows[0].rating == 7);

        db.close().await.unwrap();
        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn test_second_write_for_pair_is_an_update() {
        let (db, store) = setup().await;
        let movie_id = insert_movie(&db, "Heat").await;
        let user_id = insert_user(&db, "alice").await;

        let first = store.upsert(user_id, movie_id, 4).await.unwrap();
        let again = store.upsert(user_id, movie_id, 4).await.unwrap();

        assert!(first.created);
        assert!(!again.created);
        assert_eq!(again.rating.id, first.rating.id);
        assert_eq!(again.rating.created_at, first.rating.created_at);
    }

    #[tokio::test]
    async fn test_delete_without_readable_average_reports_none() {
        let (db, store) = setup().await;
        let movie_id = insert_movie(&db, "Heat").await;
        let user_id = insert_user(&db, "alice").await;
        store.upsert(user_id, movie_id, 6).await.unwrap();

        db.execute_unprepared("ALTER TABLE movies RENAME COLUMN average_rating TO average_rating_old")
            .await
            .unwrap();

        let deleted = store.delete(user_id, movie_id).await.unwrap();

        assert!(!deleted.average_refreshed);
        assert_eq!(deleted.movie_average, None);
        assert!(store.get(user_id, movie_id).await.is_err());
    }
}
