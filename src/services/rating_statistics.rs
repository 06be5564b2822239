use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};

use crate::errors::InternalError;
use crate::stores::catalog_store::require_movie;
use crate::types::db::rating;
use crate::types::internal::rating::RatingStats;

/// Read-only aggregate over a movie's ratings
///
/// Shares its averaging function with [`AverageMaintainer`](super::AverageMaintainer),
/// so the statistics average and the stored average never disagree.
pub struct RatingStatistics {
    db: DatabaseConnection,
}

impl RatingStatistics {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Count, average and full 0..=10 distribution for a movie
    pub async fn stats(&self, movie_id: i32) -> Result<RatingStats, InternalError> {
        let (stats, _) = self.breakdown(movie_id).await?;
        Ok(stats)
    }

    /// Statistics together with the individual ratings, newest first
    pub async fn breakdown(
        &self,
        movie_id: i32,
    ) -> Result<(RatingStats, Vec<rating::Model>), InternalError> {
        require_movie(&self.db, movie_id).await?;

        let ratings = rating::Entity::find()
            .filter(rating::Column::MovieId.eq(movie_id))
            .order_by_desc(rating::Column::CreatedAt)
            .order_by_desc(rating::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("load_ratings_for_stats", e))?;

        let values: Vec<i32> = ratings.iter().map(|r| r.rating).collect();
        Ok((RatingStats::from_values(&values), ratings))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::internal::CatalogError;
    use crate::services::AverageMaintainer;
    use crate::test::utils::{insert_movie, insert_rating, insert_user, setup_test_db};

    #[tokio::test]
    async fn test_stats_for_three_ratings() {
        let db = setup_test_db().await;
        let movie_id = insert_movie(&db, "Alien").await;
        for (name, score) in [("a", 8), ("b", 6), ("c", 10)] {
            let user_id = insert_user(&db, name).await;
            insert_rating(&db, user_id, movie_id, score).await;
        }

        let stats = RatingStatistics::new(db.clone()).stats(movie_id).await.unwrap();

        assert_eq!(stats.total, 3);
        assert_eq!(stats.average, 8.0);
        assert_eq!(stats.distribution.len(), 11);
        assert_eq!(stats.distribution[&6], 1);
        assert_eq!(stats.distribution[&8], 1);
        assert_eq!(stats.distribution[&10], 1);
    }

    #[tokio::test]
    async fn test_stats_agree_with_stored_average() {
        let db = setup_test_db().await;
        let movie_id = insert_movie(&db, "Aliens").await;
        for (name, score) in [("a", 1), ("b", 1), ("c", 2)] {
            let user_id = insert_user(&db, name).await;
            insert_rating(&db, user_id, movie_id, score).await;
        }

        let stats = RatingStatistics::new(db.clone()).stats(movie_id).await.unwrap();
        let stored = AverageMaintainer::new(db.clone()).recompute(movie_id).await.unwrap();

        assert_eq!(stats.average, stored);
        assert_eq!(stats.average, 1.33);
    }

    #[tokio::test]
    async fn test_stats_for_unrated_movie() {
        let db = setup_test_db().await;
        let movie_id = insert_movie(&db, "Prometheus").await;

        let (stats, ratings) = RatingStatistics::new(db).breakdown(movie_id).await.unwrap();

        assert_eq!(stats.total, 0);
        assert_eq!(stats.average, 0.0);
        assert_eq!(stats.distribution.len(), 11);
        assert!(ratings.is_empty());
    }

    #[tokio::test]
    async fn test_stats_unknown_movie_is_not_found() {
        let db = setup_test_db().await;

        let result = RatingStatistics::new(db).stats(42).await;
        assert!(matches!(result, Err(InternalError::Catalog(CatalogError::MovieNotFound(42)))));
    }
}
