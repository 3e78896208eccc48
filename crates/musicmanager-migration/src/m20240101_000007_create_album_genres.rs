use sea_orm_migration::prelude::*;

use super::m20240101_000004_create_genres::Genres;
use super::m20240101_000002_create_albums::Albums;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AlbumGenres::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AlbumGenres::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(AlbumGenres::AlbumId).integer().not_null())
                    .col(ColumnDef::new(AlbumGenres::GenreId).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_album_genres_album_id")
                            .from(AlbumGenres::Table, AlbumGenres::AlbumId)
                            .to(Albums::Table, Albums::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_album_genres_genre_id")
                            .from(AlbumGenres::Table, AlbumGenres::GenreId)
                            .to(Genres::Table, Genres::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_album_genres_album_id")
                    .table(AlbumGenres::Table)
                    .col(AlbumGenres::AlbumId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_album_genres_genre_id")
                    .table(AlbumGenres::Table)
                    .col(AlbumGenres::GenreId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AlbumGenres::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum AlbumGenres {
    Table,
    Id,
    AlbumId,
    GenreId,
}
