mod common;

use cinemet_backend::coordinators::RatingCoordinator;
use cinemet_backend::errors::InternalError;
use cinemet_backend::errors::internal::RatingError;
use cinemet_backend::types::db::role::RoleName;

#[tokio::test]
async fn test_three_ratings_average_to_eight() {
    let app_data = common::setup_app_data().await;
    let ratings = RatingCoordinator::new(app_data.clone());
    let movie_id = common::create_movie(&app_data, "Heat").await;

    for (username, score) in [("u1", 8), ("u2", 6), ("u3", 10)] {
        let (_, ctx) = common::login_as(&app_data, username, RoleName::User).await;
        ratings.rate(&ctx, movie_id, score).await.unwrap();
    }

    let movie = app_data.catalog_store.get_movie(movie_id).await.unwrap();
    assert_eq!(movie.average_rating, 8.0);

    let (stats, list) = ratings.movie_statistics(movie_id).await.unwrap();
    assert_eq!(stats.total, 3);
    assert_eq!(stats.average, 8.0);
    assert_eq!(list.len(), 3);
}

#[tokio::test]
async fn test_unrated_movie_has_zero_average_and_full_distribution() {
    let app_data = common::setup_app_data().await;
    let ratings = RatingCoordinator::new(app_data.clone());
    let movie_id = common::create_movie(&app_data, "Heat").await;

    let (stats, list) = ratings.movie_statistics(movie_id).await.unwrap();

    assert_eq!(stats.total, 0);
    assert_eq!(stats.average, 0.0);
    assert_eq!(stats.distribution.keys().copied().collect::<Vec<_>>(), (0..=10).collect::<Vec<_>>());
    assert!(stats.distribution.values().all(|count| *count == 0));
    assert!(list.is_empty());
}

#[tokio::test]
async fn test_upsert_keeps_one_rating_per_pair() {
    let app_data = common::setup_app_data().await;
    let ratings = RatingCoordinator::new(app_data.clone());
    let movie_id = common::create_movie(&app_data, "Heat").await;
    let (_, ctx) = common::login_as(&app_data, "alice", RoleName::User).await;

    ratings.rate(&ctx, movie_id, 3).await.unwrap();
    let second = ratings.rate(&ctx, movie_id, 9).await.unwrap();

    assert!(!second.created);
    let all = app_data.rating_store.list_for_movie(movie_id).await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].rating, 9);
    assert_eq!(ratings.my_rating(&ctx, movie_id).await.unwrap().rating, 9);
    assert_eq!(second.movie_average, Some(9.0));
}

#[tokio::test]
async fn test_deleting_a_rating_recomputes_the_average() {
    let app_data = common::setup_app_data().await;
    let ratings = RatingCoordinator::new(app_data.clone());
    let movie_id = common::create_movie(&app_data, "Heat").await;
    let (_, alice) = common::login_as(&app_data, "alice", RoleName::User).await;
    let (_, bob) = common::login_as(&app_data, "bob", RoleName::User).await;

    ratings.rate(&alice, movie_id, 10).await.unwrap();
    let after_second = ratings.rate(&bob, movie_id, 0).await.unwrap();
    assert_eq!(after_second.movie_average, Some(5.0));

    let deleted = ratings.delete_my_rating(&bob, movie_id).await.unwrap();

    assert_eq!(deleted.movie_average, Some(10.0));
    assert_eq!(app_data.catalog_store.get_movie(movie_id).await.unwrap().average_rating, 10.0);
}

#[tokio::test]
async fn test_recompute_is_idempotent() {
    let app_data = common::setup_app_data().await;
    let ratings = RatingCoordinator::new(app_data.clone());
    let movie_id = common::create_movie(&app_data, "Heat").await;
    for (username, score) in [("u1", 1), ("u2", 1), ("u3", 2)] {
        let (_, ctx) = common::login_as(&app_data, username, RoleName::User).await;
        ratings.rate(&ctx, movie_id, score).await.unwrap();
    }

    let first = app_data.average_maintainer.recompute(movie_id).await.unwrap();
    let second = app_data.average_maintainer.recompute(movie_id).await.unwrap();

    assert_eq!(first, 1.33);
    assert_eq!(first, second);
    assert_eq!(app_data.average_maintainer.stored_average(movie_id).await.unwrap(), 1.33);
}

#[tokio::test]
async fn test_rating_boundaries() {
    let app_data = common::setup_app_data().await;
    let ratings = RatingCoordinator::new(app_data.clone());
    let movie_id = common::create_movie(&app_data, "Heat").await;
    let (_, ctx) = common::login_as(&app_data, "alice", RoleName::User).await;

    for rejected in [11, -1] {
        assert!(matches!(
            ratings.rate(&ctx, movie_id, rejected).await,
            Err(InternalError::Rating(RatingError::InvalidValue(v))) if v == rejected
        ));
    }
    assert!(app_data.rating_store.list_for_movie(movie_id).await.unwrap().is_empty());

    assert_eq!(ratings.rate(&ctx, movie_id, 0).await.unwrap().rating.rating, 0);
    assert_eq!(ratings.rate(&ctx, movie_id, 10).await.unwrap().rating.rating, 10);
}

#[tokio::test]
async fn test_distribution_counts_every_rating() {
    let app_data = common::setup_app_data().await;
    let ratings = RatingCoordinator::new(app_data.clone());
    let movie_id = common::create_movie(&app_data, "Heat").await;
    for (username, score) in [("u1", 7), ("u2", 7), ("u3", 2), ("u4", 10)] {
        let (_, ctx) = common::login_as(&app_data, username, RoleName::User).await;
        ratings.rate(&ctx, movie_id, score).await.unwrap();
    }

    let (stats, _) = ratings.movie_statistics(movie_id).await.unwrap();

    assert_eq!(stats.distribution.len(), 11);
    assert_eq!(stats.distribution.values().sum::<u64>(), stats.total);
    assert_eq!(stats.distribution[&7], 2);
    assert_eq!(stats.distribution[&2], 1);
    assert_eq!(stats.distribution[&10], 1);
    assert_eq!(stats.average, 6.5);
}

#[tokio::test]
async fn test_rating_unknown_movie_is_not_found() {
    let app_data = common::setup_app_data().await;
    let ratings = RatingCoordinator::new(app_data.clone());
    let (_, ctx) = common::login_as(&app_data, "alice", RoleName::User).await;

    let result = ratings.rate(&ctx, 9999, 5).await;

    assert!(matches!(
        result,
        Err(InternalError::Catalog(cinemet_backend::errors::internal::CatalogError::MovieNotFound(9999)))
    ));
}
