// API layer - HTTP endpoints
pub mod admin;
pub mod auth;
pub mod catalog;
pub mod collections;
pub mod health;
pub mod helpers;
pub mod movies;
pub mod ratings;

#[cfg(test)]
mod helpers_test;

pub use admin::AdminApi;
pub use auth::AuthApi;
pub use catalog::CatalogApi;
pub use collections::CollectionsApi;
pub use health::HealthApi;
pub use helpers::BearerAuth;
pub use movies::MoviesApi;
pub use ratings::RatingsApi;

use std::sync::Arc;

use poem_openapi::OpenApiService;

use crate::AppData;

/// Every endpoint group served under `/api`
pub type ApiEndpoints = (HealthApi, AuthApi, MoviesApi, CatalogApi, RatingsApi, CollectionsApi, AdminApi);

/// Assemble the OpenAPI service from shared application data
pub fn api_service(app_data: Arc<AppData>, server_url: &str) -> OpenApiService<ApiEndpoints, ()> {
    let endpoints = (
        HealthApi::new(app_data.db.clone()),
        AuthApi::new(app_data.clone()),
        MoviesApi::new(app_data.clone()),
        CatalogApi::new(app_data.clone()),
        RatingsApi::new(app_data.clone()),
        CollectionsApi::new(app_data.clone()),
        AdminApi::new(app_data),
    );

    OpenApiService::new(endpoints, "Cinemet API", env!("CARGO_PKG_VERSION")).server(server_url)
}
