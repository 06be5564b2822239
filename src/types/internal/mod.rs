// Internal types shared between stores, services and coordinators
pub mod account;
pub mod auth;
pub mod catalog;
pub mod collection;
pub mod context;
pub mod rating;
