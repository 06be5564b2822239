use chrono::{NaiveDate, Utc};
use sea_orm::sea_query::Query;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, TransactionTrait,
};

use crate::errors::InternalError;
use crate::errors::internal::CatalogError;
use crate::types::db::{
    actor, director, favorite, genre, movie, movie_actor, movie_director, movie_genre, rating,
    watchlist,
};
use crate::types::internal::catalog::{MovieDetail, MovieFilter, MovieInput, Page, PageRequest};

const MAX_TITLE_LENGTH: usize = 100;
const MAX_NAME_LENGTH: usize = 50;

/// Load a movie or fail with `MovieNotFound`
///
/// Takes any connection so it can run inside a caller's transaction.
pub(crate) async fn require_movie<C: ConnectionTrait>(
    conn: &C,
    movie_id: i32,
) -> Result<movie::Model, InternalError> {
    movie::Entity::find_by_id(movie_id)
        .one(conn)
        .await
        .map_err(|e| InternalError::database("find_movie", e))?
        .ok_or_else(|| CatalogError::MovieNotFound(movie_id).into())
}

/// Trim a name field and check it is non-empty and within `max` characters
fn clean_name(field: &str, value: &str, max: usize) -> Result<String, CatalogError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(CatalogError::invalid_field(field, "must not be empty"));
    }
    if value.chars().count() > max {
        return Err(CatalogError::invalid_field(
            field,
            format!("must be at most {} characters", max),
        ));
    }
    Ok(value.to_string())
}

fn validate_movie_input(input: &MovieInput) -> Result<MovieInput, CatalogError> {
    let title = clean_name("title", &input.title, MAX_TITLE_LENGTH)?;

    if input.duration < 0 {
        return Err(CatalogError::invalid_field("duration", "must not be negative"));
    }

    let release_date = match input.release_date.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(date) => {
            NaiveDate::parse_from_str(date, "%Y-%m-%d")
                .map_err(|_| CatalogError::invalid_field("release_date", "expected YYYY-MM-DD"))?;
            Some(date.to_string())
        }
    };

    let dedup = |ids: &[i32]| {
        let mut ids = ids.to_vec();
        ids.sort_unstable();
        ids.dedup();
        ids
    };

    Ok(MovieInput {
        title,
        description: input.description.trim().to_string(),
        release_date,
        duration: input.duration,
        url_trailer: input.url_trailer.trim().to_string(),
        genre_ids: dedup(&input.genre_ids),
        director_ids: dedup(&input.director_ids),
        actor_ids: dedup(&input.actor_ids),
    })
}

/// Catalog persistence: movies, genres, directors, actors and their links
pub struct CatalogStore {
    db: DatabaseConnection,
}

impl CatalogStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    // ----- movies -----

    /// Public movie listing, newest first
    ///
    /// `search` matches the title by substring; `genre_id` restricts to
    /// movies linked to that genre. Pages past the last one come back empty
    /// without querying rows.
    pub async fn list_movies(
        &self,
        filter: &MovieFilter,
        page: PageRequest,
    ) -> Result<Page<movie::Model>, InternalError> {
        let mut query = movie::Entity::find();

        if let Some(search) = filter.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            query = query.filter(movie::Column::Title.contains(search));
        }

        if let Some(genre_id) = filter.genre_id {
            query = query.filter(
                movie::Column::Id.in_subquery(
                    Query::select()
                        .column(movie_genre::Column::MovieId)
                        .from(movie_genre::Entity)
                        .and_where(movie_genre::Column::GenreId.eq(genre_id))
                        .to_owned(),
                ),
            );
        }

        let paginator = query
            .order_by_desc(movie::Column::CreatedAt)
            .order_by_desc(movie::Column::Id)
            .paginate(&self.db, page.limit);

        let counts = paginator
            .num_items_and_pages()
            .await
            .map_err(|e| InternalError::database("count_movies", e))?;
        let items = if page.page > counts.number_of_pages {
            Vec::new()
        } else {
            paginator
                .fetch_page(page.page - 1)
                .await
                .map_err(|e| InternalError::database("list_movies", e))?
        };

        Ok(Page {
            items,
            total: counts.number_of_items,
            page: page.page,
            pages: counts.number_of_pages,
        })
    }

    pub async fn get_movie(&self, movie_id: i32) -> Result<movie::Model, InternalError> {
        require_movie(&self.db, movie_id).await
    }

    /// Movie with its genres, directors and actors
    pub async fn get_movie_detail(&self, movie_id: i32) -> Result<MovieDetail, InternalError> {
        let movie = require_movie(&self.db, movie_id).await?;
        Self::load_detail(&self.db, movie).await
    }

    async fn load_detail<C: ConnectionTrait>(conn: &C, movie: movie::Model) -> Result<MovieDetail, InternalError> {
        let genres = genre::Entity::find()
            .filter(
                genre::Column::Id.in_subquery(
                    Query::select()
                        .column(movie_genre::Column::GenreId)
                        .from(movie_genre::Entity)
                        .and_where(movie_genre::Column::MovieId.eq(movie.id))
                        .to_owned(),
                ),
            )
            .order_by_asc(genre::Column::Genre)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("load_movie_genres", e))?;

        let directors = director::Entity::find()
            .filter(
                director::Column::Id.in_subquery(
                    Query::select()
                        .column(movie_director::Column::DirectorId)
                        .from(movie_director::Entity)
                        .and_where(movie_director::Column::MovieId.eq(movie.id))
                        .to_owned(),
                ),
            )
            .order_by_asc(director::Column::Lastname)
            .order_by_asc(director::Column::Firstname)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("load_movie_directors", e))?;

        let actors = actor::Entity::find()
            .filter(
                actor::Column::Id.in_subquery(
                    Query::select()
                        .column(movie_actor::Column::ActorId)
                        .from(movie_actor::Entity)
                        .and_where(movie_actor::Column::MovieId.eq(movie.id))
                        .to_owned(),
                ),
            )
            .order_by_asc(actor::Column::Lastname)
            .order_by_asc(actor::Column::Firstname)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("load_movie_actors", e))?;

        Ok(MovieDetail {
            movie,
            genres,
            directors,
            actors,
        })
    }

    /// Create a movie and link it to existing genres, directors and actors
    ///
    /// The average starts at 0.00; only the average maintainer changes it.
    pub async fn create_movie(&self, input: &MovieInput) -> Result<MovieDetail, InternalError> {
        let input = validate_movie_input(input)?;
        let now = Utc::now().timestamp();

        let txn = self.db.begin().await.map_err(InternalError::transaction_begin)?;

        Self::ensure_links_exist(&txn, &input).await?;

        let movie = movie::ActiveModel {
            title: Set(input.title.clone()),
            description: Set(input.description.clone()),
            release_date: Set(input.release_date.clone()),
            duration: Set(input.duration),
            url_trailer: Set(input.url_trailer.clone()),
            average_rating: Set(0.0),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| InternalError::database("insert_movie", e))?;

        Self::insert_links(&txn, movie.id, &input).await?;
        let detail = Self::load_detail(&txn, movie).await?;

        txn.commit().await.map_err(InternalError::transaction_commit)?;

        tracing::info!("Movie created: {} ({})", detail.movie.title, detail.movie.id);
        Ok(detail)
    }

    /// Replace a movie's editable fields and its links
    ///
    /// `average_rating` is left as stored.
    pub async fn update_movie(&self, movie_id: i32, input: &MovieInput) -> Result<MovieDetail, InternalError> {
        let input = validate_movie_input(input)?;
        let now = Utc::now().timestamp();

        let txn = self.db.begin().await.map_err(InternalError::transaction_begin)?;

        let existing = require_movie(&txn, movie_id).await?;
        Self::ensure_links_exist(&txn, &input).await?;

        let mut active: movie::ActiveModel = existing.into();
        active.title = Set(input.title.clone());
        active.description = Set(input.description.clone());
        active.release_date = Set(input.release_date.clone());
        active.duration = Set(input.duration);
        active.url_trailer = Set(input.url_trailer.clone());
        active.updated_at = Set(now);
        let movie = active
            .update(&txn)
            .await
            .map_err(|e| InternalError::database("update_movie", e))?;

        Self::delete_links(&txn, movie_id).await?;
        Self::insert_links(&txn, movie_id, &input).await?;
        let detail = Self::load_detail(&txn, movie).await?;

        txn.commit().await.map_err(InternalError::transaction_commit)?;

        tracing::info!("Movie updated: {}", movie_id);
        Ok(detail)
    }

    /// Delete a movie and everything that references it
    ///
    /// Order: ratings, favorites, watchlist entries, genre/director/actor
    /// links, then the movie row, all in one transaction. The schema declares
    /// the same cascade; doing it here keeps backends without enforced
    /// foreign keys consistent.
    pub async fn delete_movie(&self, movie_id: i32) -> Result<(), InternalError> {
        let txn = self.db.begin().await.map_err(InternalError::transaction_begin)?;

        require_movie(&txn, movie_id).await?;

        rating::Entity::delete_many()
            .filter(rating::Column::MovieId.eq(movie_id))
            .exec(&txn)
            .await
            .map_err(|e| InternalError::database("delete_movie_ratings", e))?;
        favorite::Entity::delete_many()
            .filter(favorite::Column::MovieId.eq(movie_id))
            .exec(&txn)
            .await
            .map_err(|e| InternalError::database("delete_movie_favorites", e))?;
        watchlist::Entity::delete_many()
            .filter(watchlist::Column::MovieId.eq(movie_id))
            .exec(&txn)
            .await
            .map_err(|e| InternalError::database("delete_movie_watchlist", e))?;
        Self::delete_links(&txn, movie_id).await?;
        movie::Entity::delete_by_id(movie_id)
            .exec(&txn)
            .await
            .map_err(|e| InternalError::database("delete_movie", e))?;

        txn.commit().await.map_err(InternalError::transaction_commit)?;

        tracing::info!("Movie deleted: {}", movie_id);
        Ok(())
    }

    async fn ensure_links_exist<C: ConnectionTrait>(conn: &C, input: &MovieInput) -> Result<(), InternalError> {
        for genre_id in &input.genre_ids {
            genre::Entity::find_by_id(*genre_id)
                .one(conn)
                .await
                .map_err(|e| InternalError::database("find_genre", e))?
                .ok_or(CatalogError::GenreNotFound(*genre_id))?;
        }
        for director_id in &input.director_ids {
            director::Entity::find_by_id(*director_id)
                .one(conn)
                .await
                .map_err(|e| InternalError::database("find_director", e))?
                .ok_or(CatalogError::DirectorNotFound(*director_id))?;
        }
        for actor_id in &input.actor_ids {
            actor::Entity::find_by_id(*actor_id)
                .one(conn)
                .await
                .map_err(|e| InternalError::database("find_actor", e))?
                .ok_or(CatalogError::ActorNotFound(*actor_id))?;
        }
        Ok(())
    }

    async fn insert_links<C: ConnectionTrait>(conn: &C, movie_id: i32, input: &MovieInput) -> Result<(), InternalError> {
        if !input.genre_ids.is_empty() {
            movie_genre::Entity::insert_many(input.genre_ids.iter().map(|genre_id| movie_genre::ActiveModel {
                movie_id: Set(movie_id),
                genre_id: Set(*genre_id),
            }))
            .exec_without_returning(conn)
            .await
            .map_err(|e| InternalError::database("link_movie_genres", e))?;
        }
        if !input.director_ids.is_empty() {
            movie_director::Entity::insert_many(input.director_ids.iter().map(|director_id| {
                movie_director::ActiveModel {
                    movie_id: Set(movie_id),
                    director_id: Set(*director_id),
                }
            }))
            .exec_without_returning(conn)
            .await
            .map_err(|e| InternalError::database("link_movie_directors", e))?;
        }
        if !input.actor_ids.is_empty() {
            movie_actor::Entity::insert_many(input.actor_ids.iter().map(|actor_id| movie_actor::ActiveModel {
                movie_id: Set(movie_id),
                actor_id: Set(*actor_id),
            }))
            .exec_without_returning(conn)
            .await
            .map_err(|e| InternalError::database("link_movie_actors", e))?;
        }
        Ok(())
    }

    async fn delete_links<C: ConnectionTrait>(conn: &C, movie_id: i32) -> Result<(), InternalError> {
        movie_genre::Entity::delete_many()
            .filter(movie_genre::Column::MovieId.eq(movie_id))
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("unlink_movie_genres", e))?;
        movie_director::Entity::delete_many()
            .filter(movie_director::Column::MovieId.eq(movie_id))
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("unlink_movie_directors", e))?;
        movie_actor::Entity::delete_many()
            .filter(movie_actor::Column::MovieId.eq(movie_id))
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("unlink_movie_actors", e))?;
        Ok(())
    }

    // ----- genres -----

    pub async fn list_genres(&self) -> Result<Vec<genre::Model>, InternalError> {
        genre::Entity::find()
            .order_by_asc(genre::Column::Genre)
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("list_genres", e))
    }

    pub async fn create_genre(&self, name: &str) -> Result<genre::Model, InternalError> {
        let name = clean_name("genre", name, MAX_NAME_LENGTH)?;
        self.ensure_genre_name_free(&name, None).await?;

        let genre = genre::ActiveModel {
            genre: Set(name),
            created_at: Set(Utc::now().timestamp()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| InternalError::database("insert_genre", e))?;

        tracing::info!("Genre created: {} ({})", genre.genre, genre.id);
        Ok(genre)
    }

    pub async fn update_genre(&self, genre_id: i32, name: &str) -> Result<genre::Model, InternalError> {
        let name = clean_name("genre", name, MAX_NAME_LENGTH)?;
        let existing = genre::Entity::find_by_id(genre_id)
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("find_genre", e))?
            .ok_or(CatalogError::GenreNotFound(genre_id))?;
        self.ensure_genre_name_free(&name, Some(genre_id)).await?;

        let mut active: genre::ActiveModel = existing.into();
        active.genre = Set(name);
        active
            .update(&self.db)
            .await
            .map_err(|e| InternalError::database("update_genre", e))
    }

    /// Delete a genre after unlinking it from every movie
    pub async fn delete_genre(&self, genre_id: i32) -> Result<(), InternalError> {
        let txn = self.db.begin().await.map_err(InternalError::transaction_begin)?;

        movie_genre::Entity::delete_many()
            .filter(movie_genre::Column::GenreId.eq(genre_id))
            .exec(&txn)
            .await
            .map_err(|e| InternalError::database("unlink_genre", e))?;
        let result = genre::Entity::delete_by_id(genre_id)
            .exec(&txn)
            .await
            .map_err(|e| InternalError::database("delete_genre", e))?;
        if result.rows_affected == 0 {
            return Err(CatalogError::GenreNotFound(genre_id).into());
        }

        txn.commit().await.map_err(InternalError::transaction_commit)?;
        Ok(())
    }

    async fn ensure_genre_name_free(&self, name: &str, except: Option<i32>) -> Result<(), InternalError> {
        let mut query = genre::Entity::find().filter(genre::Column::Genre.eq(name));
        if let Some(genre_id) = except {
            query = query.filter(genre::Column::Id.ne(genre_id));
        }
        let taken = query
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("find_genre_by_name", e))?;
        match taken {
            Some(_) => Err(CatalogError::DuplicateGenre(name.to_string()).into()),
            None => Ok(()),
        }
    }

    // ----- directors -----

    pub async fn list_directors(&self) -> Result<Vec<director::Model>, InternalError> {
        director::Entity::find()
            .order_by_asc(director::Column::Lastname)
            .order_by_asc(director::Column::Firstname)
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("list_directors", e))
    }

    pub async fn create_director(&self, firstname: &str, lastname: &str) -> Result<director::Model, InternalError> {
        let firstname = clean_name("firstname", firstname, MAX_NAME_LENGTH)?;
        let lastname = clean_name("lastname", lastname, MAX_NAME_LENGTH)?;

        director::ActiveModel {
            firstname: Set(firstname),
            lastname: Set(lastname),
            created_at: Set(Utc::now().timestamp()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| InternalError::database("insert_director", e))
    }

    pub async fn update_director(
        &self,
        director_id: i32,
        firstname: &str,
        lastname: &str,
    ) -> Result<director::Model, InternalError> {
        let firstname = clean_name("firstname", firstname, MAX_NAME_LENGTH)?;
        let lastname = clean_name("lastname", lastname, MAX_NAME_LENGTH)?;
        let existing = director::Entity::find_by_id(director_id)
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("find_director", e))?
            .ok_or(CatalogError::DirectorNotFound(director_id))?;

        let mut active: director::ActiveModel = existing.into();
        active.firstname = Set(firstname);
        active.lastname = Set(lastname);
        active
            .update(&self.db)
            .await
            .map_err(|e| InternalError::database("update_director", e))
    }

    pub async fn delete_director(&self, director_id: i32) -> Result<(), InternalError> {
        let txn = self.db.begin().await.map_err(InternalError::transaction_begin)?;

        movie_director::Entity::delete_many()
            .filter(movie_director::Column::DirectorId.eq(director_id))
            .exec(&txn)
            .await
            .map_err(|e| InternalError::database("unlink_director", e))?;
        let result = director::Entity::delete_by_id(director_id)
            .exec(&txn)
            .await
            .map_err(|e| InternalError::database("delete_director", e))?;
        if result.rows_affected == 0 {
            return Err(CatalogError::DirectorNotFound(director_id).into());
        }

        txn.commit().await.map_err(InternalError::transaction_commit)?;
        Ok(())
    }

    // ----- actors -----

    pub async fn list_actors(&self) -> Result<Vec<actor::Model>, InternalError> {
        actor::Entity::find()
            .order_by_asc(actor::Column::Lastname)
            .order_by_asc(actor::Column::Firstname)
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("list_actors", e))
    }

    pub async fn create_actor(&self, firstname: &str, lastname: &str) -> Result<actor::Model, InternalError> {
        let firstname = clean_name("firstname", firstname, MAX_NAME_LENGTH)?;
        let lastname = clean_name("lastname", lastname, MAX_NAME_LENGTH)?;

        actor::ActiveModel {
            firstname: Set(firstname),
            lastname: Set(lastname),
            created_at: Set(Utc::now().timestamp()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| InternalError::database("insert_actor", e))
    }

    pub async fn update_actor(
        &self,
        actor_id: i32,
        firstname: &str,
        lastname: &str,
    ) -> Result<actor::Model, InternalError> {
        let firstname = clean_name("firstname", firstname, MAX_NAME_LENGTH)?;
        let lastname = clean_name("lastname", lastname, MAX_NAME_LENGTH)?;
        let existing = actor::Entity::find_by_id(actor_id)
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("find_actor", e))?
            .ok_or(CatalogError::ActorNotFound(actor_id))?;

        let mut active: actor::ActiveModel = existing.into();
        active.firstname = Set(firstname);
        active.lastname = Set(lastname);
        active
            .update(&self.db)
            .await
            .map_err(|e| InternalError::database("update_actor", e))
    }

    pub async fn delete_actor(&self, actor_id: i32) -> Result<(), InternalError> {
        let txn = self.db.begin().await.map_err(InternalError::transaction_begin)?;

        movie_actor::Entity::delete_many()
            .filter(movie_actor::Column::ActorId.eq(actor_id))
            .exec(&txn)
            .await
            .map_err(|e| InternalError::database("unlink_actor", e))?;
        let result = actor::Entity::delete_by_id(actor_id)
            .exec(&txn)
            .await
            .map_err(|e| InternalError::database("delete_actor", e))?;
        if result.rows_affected == 0 {
            return Err(CatalogError::ActorNotFound(actor_id).into());
        }

        txn.commit().await.map_err(InternalError::transaction_commit)?;
        Ok(())
    }
}

impl std::fmt::Debug for CatalogStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogStore").field("db", &"<connection>").finish()
    }
}
