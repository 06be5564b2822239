// Request/response models for the HTTP layer
pub mod admin;
pub mod auth;
pub mod catalog;
pub mod collection;
pub mod common;
pub mod movie;
pub mod rating;
pub mod user;
