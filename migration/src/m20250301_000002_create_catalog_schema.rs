use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Genres::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Genres::Id).integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(Genres::Genre).string_len(50).not_null().unique_key())
                    .col(ColumnDef::new(Genres::CreatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        for table in [People::Directors, People::Actors] {
            manager
                .create_table(
                    Table::create()
                        .table(table)
                        .if_not_exists()
                        .col(ColumnDef::new(People::Id).integer().not_null().auto_increment().primary_key())
                        .col(ColumnDef::new(People::Firstname).string_len(50).not_null())
                        .col(ColumnDef::new(People::Lastname).string_len(50).not_null())
                        .col(ColumnDef::new(People::CreatedAt).big_integer().not_null())
                        .to_owned(),
                )
                .await?;
        }

        // average_rating is a cached projection of the ratings table, range-checked here as well
        manager
            .create_table(
                Table::create()
                    .table(Movies::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Movies::Id).integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(Movies::Title).string_len(100).not_null())
                    .col(ColumnDef::new(Movies::Description).text().not_null().default(""))
                    .col(ColumnDef::new(Movies::ReleaseDate).string_len(10).null())
                    .col(
                        ColumnDef::new(Movies::Duration)
                            .integer()
                            .not_null()
                            .check(Expr::col(Movies::Duration).gte(0)),
                    )
                    .col(ColumnDef::new(Movies::UrlTrailer).string_len(500).not_null().default(""))
                    // Already rounded to two decimals by the writer
                    .col(
                        ColumnDef::new(Movies::AverageRating)
                            .double()
                            .not_null()
                            .default(0.0)
                            .check(Expr::col(Movies::AverageRating).between(0, 10)),
                    )
                    .col(ColumnDef::new(Movies::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Movies::UpdatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        for (name, column) in [
            ("idx_movies_release_date", Movies::ReleaseDate),
            ("idx_movies_average_rating", Movies::AverageRating),
            ("idx_movies_created_at", Movies::CreatedAt),
        ] {
            manager
                .create_index(
                    Index::create()
                        .name(name)
                        .table(Movies::Table)
                        .col(column)
                        .to_owned(),
                )
                .await?;
        }

        manager
            .create_table(link_table(MovieLinks::MovieGenres, MovieLinks::GenreId, Genres::Table, Genres::Id))
            .await?;
        manager
            .create_table(link_table(MovieLinks::MovieDirectors, MovieLinks::DirectorId, People::Directors, People::Id))
            .await?;
        manager
            .create_table(link_table(MovieLinks::MovieActors, MovieLinks::ActorId, People::Actors, People::Id))
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for table in [MovieLinks::MovieActors, MovieLinks::MovieDirectors, MovieLinks::MovieGenres] {
            manager
                .drop_table(Table::drop().table(table).to_owned())
                .await?;
        }
        manager
            .drop_table(Table::drop().table(Movies::Table).to_owned())
            .await?;
        for table in [People::Actors, People::Directors] {
            manager
                .drop_table(Table::drop().table(table).to_owned())
                .await?;
        }
        manager
            .drop_table(Table::drop().table(Genres::Table).to_owned())
            .await?;

        Ok(())
    }
}

/// Join table between movies and another catalog entity, cascading on both sides
fn link_table<T, C>(table: MovieLinks, other_id: MovieLinks, other_table: T, other_column: C) -> TableCreateStatement
where
    T: IntoIden + 'static,
    C: IntoIden + 'static,
{
    Table::create()
        .table(table)
        .if_not_exists()
        .col(ColumnDef::new(MovieLinks::MovieId).integer().not_null())
        .col(ColumnDef::new(other_id).integer().not_null())
        .primary_key(Index::create().col(MovieLinks::MovieId).col(other_id))
        .foreign_key(
            ForeignKey::create()
                .from(table, MovieLinks::MovieId)
                .to(Movies::Table, Movies::Id)
                .on_delete(ForeignKeyAction::Cascade)
        )
        .foreign_key(
            ForeignKey::create()
                .from(table, other_id)
                .to(other_table, other_column)
                .on_delete(ForeignKeyAction::Cascade)
        )
        .to_owned()
}

#[derive(DeriveIden)]
enum Genres {
    Table,
    Id,
    Genre,
    CreatedAt,
}

/// Directors and actors share one column layout
#[derive(DeriveIden, Clone, Copy)]
enum People {
    Directors,
    Actors,
    Id,
    Firstname,
    Lastname,
    CreatedAt,
}

#[derive(DeriveIden)]
pub(crate) enum Movies {
    Table,
    Id,
    Title,
    Description,
    ReleaseDate,
    Duration,
    UrlTrailer,
    AverageRating,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden, Clone, Copy)]
enum MovieLinks {
    MovieGenres,
    MovieDirectors,
    MovieActors,
    MovieId,
    GenreId,
    DirectorId,
    ActorId,
}
