use crate::types::db::{actor, director, genre, movie};

/// Editable movie fields plus the catalog links to set on it
#[derive(Debug, Clone, Default)]
pub struct MovieInput {
    pub title: String,
    pub description: String,
    pub release_date: Option<String>,
    pub duration: i32,
    pub url_trailer: String,
    pub genre_ids: Vec<i32>,
    pub director_ids: Vec<i32>,
    pub actor_ids: Vec<i32>,
}

/// Movie with its linked genres, directors and actors
#[derive(Debug, Clone)]
pub struct MovieDetail {
    pub movie: movie::Model,
    pub genres: Vec<genre::Model>,
    pub directors: Vec<director::Model>,
    pub actors: Vec<actor::Model>,
}

/// Filter for the public movie listing
#[derive(Debug, Clone, Default)]
pub struct MovieFilter {
    /// Case-insensitive substring of the title
    pub search: Option<String>,
    pub genre_id: Option<i32>,
}

/// Pagination request, 1-based
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub limit: u64,
}

impl PageRequest {
    pub const DEFAULT_LIMIT: u64 = 20;
    pub const MAX_LIMIT: u64 = 100;
    /// Highest page whose row offset still fits a signed 64-bit SQL offset
    pub const MAX_PAGE: u64 = i64::MAX as u64 / Self::MAX_LIMIT;

    /// Clamp raw query values into a valid request
    pub fn new(page: Option<u64>, limit: Option<u64>) -> Self {
        Self {
            page: page.unwrap_or(1).clamp(1, Self::MAX_PAGE),
            limit: limit
                .unwrap_or(Self::DEFAULT_LIMIT)
                .clamp(1, Self::MAX_LIMIT),
        }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// One page of results
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub pages: u64,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            pages: self.pages,
        }
    }
}
