use std::sync::Arc;

use crate::app_data::AppData;
use crate::coordinators::caller::resolve_caller;
use crate::errors::InternalError;
use crate::services::RatingStatistics;
use crate::stores::{CredentialStore, RatingStore};
use crate::types::db::rating;
use crate::types::internal::context::RequestContext;
use crate::types::internal::rating::{RatingDeleteOutcome, RatingStats, RatingWriteOutcome};

/// Rating coordinator: the caller's own ratings plus public statistics
///
/// Every write goes through RatingStore, which refreshes the movie's cached
/// average before returning.
pub struct RatingCoordinator {
    rating_store: Arc<RatingStore>,
    rating_statistics: Arc<RatingStatistics>,
    credential_store: Arc<CredentialStore>,
}

impl RatingCoordinator {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            rating_store: app_data.rating_store.clone(),
            rating_statistics: app_data.rating_statistics.clone(),
            credential_store: app_data.credential_store.clone(),
        }
    }

    /// Create or replace the caller's rating of a movie
    pub async fn rate(&self, ctx: &RequestContext, movie_id: i32, value: i64) -> Result<RatingWriteOutcome, InternalError> {
        let caller = resolve_caller(&self.credential_store, ctx).await?;
        let outcome = self.rating_store.upsert(caller.id, movie_id, value).await?;

        tracing::info!(
            request_id = %ctx.request_id,
            movie_id,
            created = outcome.created,
            average = outcome.movie_average,
            "User {} rated movie",
            caller.id
        );
        Ok(outcome)
    }

    pub async fn my_rating(&self, ctx: &RequestContext, movie_id: i32) -> Result<rating::Model, InternalError> {
        let caller = resolve_caller(&self.credential_store, ctx).await?;
        self.rating_store.get(caller.id, movie_id).await
    }

    pub async fn delete_my_rating(&self, ctx: &RequestContext, movie_id: i32) -> Result<RatingDeleteOutcome, InternalError> {
        let caller = resolve_caller(&self.credential_store, ctx).await?;
        self.rating_store.delete(caller.id, movie_id).await
    }

    /// The caller's ratings, most recent first
    pub async fn my_ratings(&self, ctx: &RequestContext) -> Result<Vec<rating::Model>, InternalError> {
        let caller = resolve_caller(&self.credential_store, ctx).await?;
        self.rating_store.list_for_user(caller.id).await
    }

    pub async fn movie_statistics(&self, movie_id: i32) -> Result<(RatingStats, Vec<rating::Model>), InternalError> {
        self.rating_statistics.breakdown(movie_id).await
    }
}
