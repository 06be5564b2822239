use poem_openapi::{ApiResponse, Object, payload::Json};

use crate::types::db::movie;
use crate::types::dto::catalog::{GenreResponse, PersonResponse};
use crate::types::internal::catalog::{MovieDetail, MovieInput, Page};

/// Movie as shown in listings
#[derive(Object, Debug, Clone)]
pub struct MovieResponse {
    pub id: i32,
    pub title: String,
    pub description: String,
    /// YYYY-MM-DD
    pub release_date: Option<String>,
    /// Minutes
    pub duration: i32,
    pub url_trailer: String,
    /// Mean of all ratings, two decimals
    pub average_rating: f64,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<movie::Model> for MovieResponse {
    fn from(model: movie::Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            description: model.description,
            release_date: model.release_date,
            duration: model.duration,
            url_trailer: model.url_trailer,
            average_rating: model.average_rating,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Movie with its genres, directors and actors
#[derive(Object, Debug)]
pub struct MovieDetailResponse {
    #[oai(flatten)]
    pub movie: MovieResponse,
    pub genres: Vec<GenreResponse>,
    pub directors: Vec<PersonResponse>,
    pub actors: Vec<PersonResponse>,
}

impl From<MovieDetail> for MovieDetailResponse {
    fn from(detail: MovieDetail) -> Self {
        Self {
            movie: detail.movie.into(),
            genres: detail.genres.into_iter().map(Into::into).collect(),
            directors: detail.directors.into_iter().map(Into::into).collect(),
            actors: detail.actors.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Object, Debug)]
pub struct MoviePageResponse {
    pub items: Vec<MovieResponse>,
    pub total: u64,
    pub page: u64,
    pub pages: u64,
}

impl From<Page<movie::Model>> for MoviePageResponse {
    fn from(page: Page<movie::Model>) -> Self {
        let page = page.map(MovieResponse::from);
        Self {
            items: page.items,
            total: page.total,
            page: page.page,
            pages: page.pages,
        }
    }
}

/// Create or replace a movie
#[derive(Object, Debug)]
pub struct MovieRequest {
    pub title: String,
    #[oai(default)]
    pub description: String,
    pub release_date: Option<String>,
    #[oai(default)]
    pub duration: i32,
    #[oai(default)]
    pub url_trailer: String,
    #[oai(default)]
    pub genre_ids: Vec<i32>,
    #[oai(default)]
    pub director_ids: Vec<i32>,
    #[oai(default)]
    pub actor_ids: Vec<i32>,
}

impl From<MovieRequest> for MovieInput {
    fn from(request: MovieRequest) -> Self {
        Self {
            title: request.title,
            description: request.description,
            release_date: request.release_date,
            duration: request.duration,
            url_trailer: request.url_trailer,
            genre_ids: request.genre_ids,
            director_ids: request.director_ids,
            actor_ids: request.actor_ids,
        }
    }
}

#[derive(ApiResponse)]
pub enum CreateMovieApiResponse {
    /// Movie created
    #[oai(status = 201)]
    Created(Json<MovieDetailResponse>),
}
