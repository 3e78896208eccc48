use sea_orm_migration::prelude::*;

use super::m20240101_000004_create_genres::Genres;
use super::m20240101_000003_create_songs::Songs;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SongGenres::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SongGenres::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(SongGenres::SongId).integer().not_null())
                    .col(ColumnDef::new(SongGenres::GenreId).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_song_genres_song_id")
                            .from(SongGenres::Table, SongGenres::SongId)
                            .to(Songs::Table, Songs::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_song_genres_genre_id")
                            .from(SongGenres::Table, SongGenres::GenreId)
                            .to(Genres::Table, Genres::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_song_genres_song_id")
                    .table(SongGenres::Table)
                    .col(SongGenres::SongId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_song_genres_genre_id")
                    .table(SongGenres::Table)
                    .col(SongGenres::GenreId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SongGenres::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum SongGenres {
    Table,
    Id,
    SongId,
    GenreId,
}
