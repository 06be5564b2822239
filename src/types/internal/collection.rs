use std::fmt;

use crate::types::db::movie;

/// The per-user movie lists
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Favorites,
    Watchlist,
}

impl Collection {
    pub fn label(self) -> &'static str {
        match self {
            Collection::Favorites => "favorites",
            Collection::Watchlist => "watchlist",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A movie in a collection together with when it was added
#[derive(Debug, Clone)]
pub struct CollectionEntry {
    pub movie: movie::Model,
    pub added_at: i64,
}
