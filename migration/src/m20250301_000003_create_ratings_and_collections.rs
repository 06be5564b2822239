use sea_orm_migration::prelude::*;

use super::m20250301_000001_create_accounts_schema::Users;
use super::m20250301_000002_create_catalog_schema::Movies;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Ratings::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Ratings::Id).integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(Ratings::UserId).integer().not_null())
                    .col(ColumnDef::new(Ratings::MovieId).integer().not_null())
                    .col(
                        ColumnDef::new(Ratings::Rating)
                            .integer()
                            .not_null()
                            .check(Expr::col(Ratings::Rating).between(0, 10)),
                    )
                    .col(ColumnDef::new(Ratings::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Ratings::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_ratings_user_id")
                            .from(Ratings::Table, Ratings::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_ratings_movie_id")
                            .from(Ratings::Table, Ratings::MovieId)
                            .to(Movies::Table, Movies::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                    )
                    .to_owned(),
            )
            .await?;

        // Upserts conflict on this index
        manager
            .create_index(
                Index::create()
                    .name("idx_ratings_user_movie")
                    .table(Ratings::Table)
                    .col(Ratings::UserId)
                    .col(Ratings::MovieId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_ratings_movie_id")
                    .table(Ratings::Table)
                    .col(Ratings::MovieId)
                    .to_owned(),
            )
            .await?;

        for (table, index_name) in [
            (Collections::Favorites, "idx_favorites_user_movie"),
            (Collections::Watchlists, "idx_watchlists_user_movie"),
        ] {
            manager
                .create_table(
                    Table::create()
                        .table(table)
                        .if_not_exists()
                        .col(ColumnDef::new(Collections::Id).integer().not_null().auto_increment().primary_key())
                        .col(ColumnDef::new(Collections::UserId).integer().not_null())
                        .col(ColumnDef::new(Collections::MovieId).integer().not_null())
                        .col(ColumnDef::new(Collections::CreatedAt).big_integer().not_null())
                        .foreign_key(
                            ForeignKey::create()
                                .from(table, Collections::UserId)
                                .to(Users::Table, Users::Id)
                                .on_delete(ForeignKeyAction::Cascade)
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .from(table, Collections::MovieId)
                                .to(Movies::Table, Movies::Id)
                                .on_delete(ForeignKeyAction::Cascade)
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name(index_name)
                        .table(table)
                        .col(Collections::UserId)
                        .col(Collections::MovieId)
                        .unique()
                        .to_owned(),
                )
                .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for table in [Collections::Watchlists, Collections::Favorites] {
            manager
                .drop_table(Table::drop().table(table).to_owned())
                .await?;
        }
        manager
            .drop_table(Table::drop().table(Ratings::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Ratings {
    Table,
    Id,
    UserId,
    MovieId,
    Rating,
    CreatedAt,
    UpdatedAt,
}

/// Favorites and watchlists are identical membership tables
#[derive(DeriveIden, Clone, Copy)]
enum Collections {
    Favorites,
    Watchlists,
    Id,
    UserId,
    MovieId,
    CreatedAt,
}
