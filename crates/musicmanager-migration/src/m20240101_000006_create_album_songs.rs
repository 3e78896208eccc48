use sea_orm_migration::prelude::*;

use super::m20240101_000003_create_songs::Songs;
use super::m20240101_000002_create_albums::Albums;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AlbumSongs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AlbumSongs::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    // No unique (album_id, song_id) pair: repeated adds keep one row each
                    .col(ColumnDef::new(AlbumSongs::AlbumId).integer().not_null())
                    .col(ColumnDef::new(AlbumSongs::SongId).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_album_songs_album_id")
                            .from(AlbumSongs::Table, AlbumSongs::AlbumId)
                            .to(Albums::Table, Albums::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_album_songs_song_id")
                            .from(AlbumSongs::Table, AlbumSongs::SongId)
                            .to(Songs::Table, Songs::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_album_songs_album_id")
                    .table(AlbumSongs::Table)
                    .col(AlbumSongs::AlbumId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_album_songs_song_id")
                    .table(AlbumSongs::Table)
                    .col(AlbumSongs::SongId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AlbumSongs::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum AlbumSongs {
    Table,
    Id,
    AlbumId,
    SongId,
}
