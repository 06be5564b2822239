use poem_openapi::{ApiResponse, Object, payload::Json};

use crate::types::db::{actor, director, genre};

#[derive(Object, Debug, Clone)]
pub struct GenreResponse {
    pub id: i32,
    pub genre: String,
}

impl From<genre::Model> for GenreResponse {
    fn from(model: genre::Model) -> Self {
        Self {
            id: model.id,
            genre: model.genre,
        }
    }
}

/// A director or an actor
#[derive(Object, Debug, Clone)]
pub struct PersonResponse {
    pub id: i32,
    pub firstname: String,
    pub lastname: String,
    pub full_name: String,
}

impl From<director::Model> for PersonResponse {
    fn from(model: director::Model) -> Self {
        Self {
            full_name: model.full_name(),
            id: model.id,
            firstname: model.firstname,
            lastname: model.lastname,
        }
    }
}

impl From<actor::Model> for PersonResponse {
    fn from(model: actor::Model) -> Self {
        Self {
            full_name: model.full_name(),
            id: model.id,
            firstname: model.firstname,
            lastname: model.lastname,
        }
    }
}

#[derive(Object, Debug)]
pub struct GenreRequest {
    pub genre: String,
}

#[derive(Object, Debug)]
pub struct PersonRequest {
    pub firstname: String,
    pub lastname: String,
}

#[derive(ApiResponse)]
pub enum CreateGenreApiResponse {
    /// Genre created
    #[oai(status = 201)]
    Created(Json<GenreResponse>),
}

#[derive(ApiResponse)]
pub enum CreatePersonApiResponse {
    /// Director or actor created
    #[oai(status = 201)]
    Created(Json<PersonResponse>),
}
