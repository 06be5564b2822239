// Database entities - SeaORM models
pub mod actor;
pub mod director;
pub mod favorite;
pub mod genre;
pub mod movie;
pub mod movie_actor;
pub mod movie_director;
pub mod movie_genre;
pub mod rating;
pub mod refresh_token;
pub mod role;
pub mod user;
pub mod watchlist;
