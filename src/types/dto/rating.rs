use poem_openapi::{ApiResponse, Object, payload::Json};

use crate::types::db::rating;
use crate::types::internal::rating::{RatingDeleteOutcome, RatingStats, RatingWriteOutcome};

#[derive(Object, Debug, Clone)]
pub struct RatingResponse {
    pub id: i32,
    pub user_id: i32,
    pub movie_id: i32,
    pub rating: i32,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<rating::Model> for RatingResponse {
    fn from(model: rating::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            movie_id: model.movie_id,
            rating: model.rating,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Rate a movie; replaces the caller's previous rating
#[derive(Object, Debug)]
pub struct RateMovieRequest {
    pub movie_id: i32,
    /// Integer score 0..=10
    pub rating: i64,
}

/// A stored rating plus the movie's average after the write
#[derive(Object, Debug)]
pub struct RatingWriteResponse {
    pub rating: RatingResponse,
    /// Absent when neither a fresh nor a stored average was available
    pub movie_average: Option<f64>,
    /// False when the rating was stored but the cached average could not be refreshed
    pub average_refreshed: bool,
}

impl From<RatingWriteOutcome> for RatingWriteResponse {
    fn from(outcome: RatingWriteOutcome) -> Self {
        Self {
            rating: outcome.rating.into(),
            movie_average: outcome.movie_average,
            average_refreshed: outcome.average_refreshed,
        }
    }
}

#[derive(Object, Debug)]
pub struct RatingDeleteResponse {
    pub movie_id: i32,
    pub movie_average: Option<f64>,
    pub average_refreshed: bool,
}

impl From<RatingDeleteOutcome> for RatingDeleteResponse {
    fn from(outcome: RatingDeleteOutcome) -> Self {
        Self {
            movie_id: outcome.movie_id,
            movie_average: outcome.movie_average,
            average_refreshed: outcome.average_refreshed,
        }
    }
}

#[derive(Object, Debug, PartialEq)]
pub struct DistributionBucket {
    pub score: i32,
    pub count: u64,
}

/// Public rating statistics of one movie
#[derive(Object, Debug)]
pub struct RatingStatsResponse {
    pub movie_id: i32,
    pub total: u64,
    pub average: f64,
    /// One bucket per score 0..=10, ascending
    pub distribution: Vec<DistributionBucket>,
    /// Individual ratings, newest first
    pub ratings: Vec<RatingResponse>,
}

impl RatingStatsResponse {
    pub fn new(movie_id: i32, stats: RatingStats, ratings: Vec<rating::Model>) -> Self {
        Self {
            movie_id,
            total: stats.total,
            average: stats.average,
            distribution: stats
                .distribution
                .into_iter()
                .map(|(score, count)| DistributionBucket { score, count })
                .collect(),
            ratings: ratings.into_iter().map(Into::into).collect(),
        }
    }
}

/// API response for rating upsert
#[derive(ApiResponse)]
pub enum RateMovieApiResponse {
    /// First rating of this movie by the caller
    #[oai(status = 201)]
    Created(Json<RatingWriteResponse>),

    /// Existing rating replaced
    #[oai(status = 200)]
    Updated(Json<RatingWriteResponse>),
}

impl From<RatingWriteOutcome> for RateMovieApiResponse {
    fn from(outcome: RatingWriteOutcome) -> Self {
        if outcome.created {
            RateMovieApiResponse::Created(Json(outcome.into()))
        } else {
            RateMovieApiResponse::Updated(Json(outcome.into()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn rating_model(id: i32, value: i32) -> rating::Model {
        rating::Model {
            id,
            user_id: id,
            movie_id: 5,
            rating: value,
            created_at: 100,
            updated_at: 100,
        }
    }

    #[test]
    fn test_stats_response_keeps_every_bucket_in_order() {
        let stats = RatingStats::from_values(&[8, 6, 10]);
        let response = RatingStatsResponse::new(5, stats, vec![rating_model(1, 8)]);

        assert_eq!(response.total, 3);
        assert_eq!(response.average, 8.0);
        let scores: Vec<i32> = response.distribution.iter().map(|b| b.score).collect();
        assert_eq!(scores, (0..=10).collect::<Vec<_>>());
        assert_eq!(response.distribution[8], DistributionBucket { score: 8, count: 1 });
        assert_eq!(response.distribution[0].count, 0);
    }

    #[test]
    fn test_rate_response_status_follows_created_flag() {
        let outcome = |created| RatingWriteOutcome {
            rating: rating_model(1, 7),
            created,
            movie_average: Some(7.0),
            average_refreshed: true,
        };

        assert!(matches!(RateMovieApiResponse::from(outcome(true)), RateMovieApiResponse::Created(_)));
        assert!(matches!(RateMovieApiResponse::from(outcome(false)), RateMovieApiResponse::Updated(_)));
    }

    #[test]
    fn test_empty_stats_distribution_is_all_zero() {
        let stats = RatingStats {
            total: 0,
            average: 0.0,
            distribution: (0..=10).map(|s| (s, 0)).collect::<BTreeMap<_, _>>(),
        };
        let response = RatingStatsResponse::new(1, stats, vec![]);

        assert_eq!(response.distribution.len(), 11);
        assert!(response.distribution.iter().all(|b| b.count == 0));
        assert!(response.ratings.is_empty());
    }
}
