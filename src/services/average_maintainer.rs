use std::cmp::Ordering;

use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QuerySelect};

use crate::errors::InternalError;
use crate::errors::internal::CatalogError;
use crate::types::db::{movie, rating};

/// Arithmetic mean of the scores rounded to two decimals, `0.0` when empty
///
/// Computed over the exact rational `sum / count` with integer arithmetic and
/// rounded half-to-even at the hundredths digit, so `[7, 8]` is 7.50 and a
/// mean of exactly 0.125 is 0.12.
pub fn mean_two_decimals(values: &[i32]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }

    let sum: i64 = values.iter().map(|value| i64::from(*value)).sum();
    let count = values.len() as i64;
    let scaled = sum * 100;

    let mut hundredths = scaled.div_euclid(count);
    let remainder = scaled.rem_euclid(count);
    match (2 * remainder).cmp(&count) {
        Ordering::Greater => hundredths += 1,
        Ordering::Equal if hundredths % 2 != 0 => hundredths += 1,
        _ => {}
    }

    hundredths as f64 / 100.0
}

/// Keeps `movies.average_rating` in step with the ratings table
///
/// Always a full recompute from the current rows. Running it twice in a row
/// writes the same value, so callers may retry freely.
pub struct AverageMaintainer {
    db: DatabaseConnection,
}

impl AverageMaintainer {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Recompute and persist the average of one movie
    ///
    /// # Returns
    /// * `Ok(f64)` - The average now stored on the movie
    /// * `Err(InternalError)` - Movie missing or database failure
    pub async fn recompute(&self, movie_id: i32) -> Result<f64, InternalError> {
        let values: Vec<i32> = rating::Entity::find()
            .select_only()
            .column(rating::Column::Rating)
            .filter(rating::Column::MovieId.eq(movie_id))
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("load_ratings_for_average", e))?;

        let average = mean_two_decimals(&values);

        let result = movie::Entity::update_many()
            .col_expr(movie::Column::AverageRating, Expr::value(average))
            .filter(movie::Column::Id.eq(movie_id))
            .exec(&self.db)
            .await
            .map_err(|e| InternalError::database("store_average_rating", e))?;

        if result.rows_affected == 0 {
            return Err(CatalogError::MovieNotFound(movie_id).into());
        }

        tracing::debug!(movie_id, ratings = values.len(), average, "Average rating recomputed");

        Ok(average)
    }

    /// Recompute every movie, returning how many were refreshed
    pub async fn recompute_all(&self) -> Result<usize, InternalError> {
        let movie_ids: Vec<i32> = movie::Entity::find()
            .select_only()
            .column(movie::Column::Id)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("list_movie_ids", e))?;

        let mut refreshed = 0;
        for movie_id in movie_ids {
            match self.recompute(movie_id).await {
                Ok(_) => refreshed += 1,
                // Deleted since the id list was read
                Err(InternalError::Catalog(CatalogError::MovieNotFound(_))) => {}
                Err(e) => return Err(e),
            }
        }

        tracing::info!("Recomputed average ratings for {} movies", refreshed);
        Ok(refreshed)
    }

    /// Average currently stored on the movie
    pub async fn stored_average(&self, movie_id: i32) -> Result<f64, InternalError> {
        let average: Option<f64> = movie::Entity::find_by_id(movie_id)
            .select_only()
            .column(movie::Column::AverageRating)
            .into_tuple()
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("load_average_rating", e))?;

        average.ok_or_else(|| CatalogError::MovieNotFound(movie_id).into())
    }
}

impl std::fmt::Debug for AverageMaintainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AverageMaintainer").field("db", &"<connection>").finish()
    }
}
