use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "movies")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    /// ISO 8601 date (YYYY-MM-DD)
    pub release_date: Option<String>,
    /// Minutes
    pub duration: i32,
    pub url_trailer: String,
    /// Cached mean of this movie's ratings, 0.00 when unrated.
    ///
    /// Stored as a double, not a decimal column. The value is rounded to
    /// hundredths in integer arithmetic before it is written, so the column
    /// only ever holds the nearest double to a two-decimal number and reads
    /// back with exactly two significant decimals. Only the average
    /// maintainer writes it.
    pub average_rating: f64,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
