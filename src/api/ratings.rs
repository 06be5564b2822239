use std::sync::Arc;

use poem::Request;
use poem_openapi::param::{Path, Query};
use poem_openapi::{OpenApi, Tags, payload::Json};

use crate::AppData;
use crate::api::helpers::{BearerAuth, create_request_context};
use crate::coordinators::RatingCoordinator;
use crate::errors::MovieError;
use crate::providers::TokenProvider;
use crate::types::dto::rating::{
    RateMovieApiResponse, RateMovieRequest, RatingDeleteResponse, RatingResponse, RatingStatsResponse,
};

/// Rating endpoints
///
/// Each write returns the movie's average as recomputed right after the write.
pub struct RatingsApi {
    rating_coordinator: RatingCoordinator,
    token_provider: Arc<TokenProvider>,
}

impl RatingsApi {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            token_provider: app_data.token_provider.clone(),
            rating_coordinator: RatingCoordinator::new(app_data),
        }
    }
}

#[derive(Tags)]
enum RatingTags {
    /// Movie ratings
    Ratings,
}

#[OpenApi]
impl RatingsApi {
    /// Rate a movie 0-10
    ///
    /// 201 when this is the caller's first rating of the movie, 200 when it replaces one.
    #[oai(path = "/ratings", method = "post", tag = "RatingTags::Ratings")]
    async fn rate(
        &self,
        req: &Request,
        auth: BearerAuth,
        body: Json<RateMovieRequest>,
    ) -> Result<RateMovieApiResponse, MovieError> {
        let ctx = create_request_context(req, Some(&auth), &self.token_provider);

        let outcome = self.rating_coordinator.rate(&ctx, body.movie_id, body.rating).await?;

        Ok(outcome.into())
    }

    /// The caller's rating of one movie
    #[oai(path = "/ratings/mine", method = "get", tag = "RatingTags::Ratings")]
    async fn my_rating(&self, req: &Request, auth: BearerAuth, movie_id: Query<i32>) -> Result<Json<RatingResponse>, MovieError> {
        let ctx = create_request_context(req, Some(&auth), &self.token_provider);

        let rating = self.rating_coordinator.my_rating(&ctx, movie_id.0).await?;

        Ok(Json(rating.into()))
    }

    /// Delete the caller's rating of one movie
    #[oai(path = "/ratings/mine", method = "delete", tag = "RatingTags::Ratings")]
    async fn delete_my_rating(
        &self,
        req: &Request,
        auth: BearerAuth,
        movie_id: Query<i32>,
    ) -> Result<Json<RatingDeleteResponse>, MovieError> {
        let ctx = create_request_context(req, Some(&auth), &self.token_provider);

        let outcome = self.rating_coordinator.delete_my_rating(&ctx, movie_id.0).await?;

        Ok(Json(outcome.into()))
    }

    /// All of the caller's ratings, most recent first
    #[oai(path = "/ratings/me", method = "get", tag = "RatingTags::Ratings")]
    async fn my_ratings(&self, req: &Request, auth: BearerAuth) -> Result<Json<Vec<RatingResponse>>, MovieError> {
        let ctx = create_request_context(req, Some(&auth), &self.token_provider);

        let ratings = self.rating_coordinator.my_ratings(&ctx).await?;

        Ok(Json(ratings.into_iter().map(Into::into).collect()))
    }

    /// Rating statistics of a movie: total, average, per-score distribution and the ratings
    #[oai(path = "/movies/:id/ratings", method = "get", tag = "RatingTags::Ratings")]
    async fn movie_statistics(&self, id: Path<i32>) -> Result<Json<RatingStatsResponse>, MovieError> {
        let (stats, ratings) = self.rating_coordinator.movie_statistics(id.0).await?;

        Ok(Json(RatingStatsResponse::new(id.0, stats, ratings)))
    }
}
