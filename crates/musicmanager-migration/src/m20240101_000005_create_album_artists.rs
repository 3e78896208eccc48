use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_artists::Artists;
use super::m20240101_000002_create_albums::Albums;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AlbumArtists::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AlbumArtists::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(AlbumArtists::AlbumId).integer().not_null())
                    .col(ColumnDef::new(AlbumArtists::ArtistId).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_album_artists_album_id")
                            .from(AlbumArtists::Table, AlbumArtists::AlbumId)
                            .to(Albums::Table, Albums::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_album_artists_artist_id")
                            .from(AlbumArtists::Table, AlbumArtists::ArtistId)
                            .to(Artists::Table, Artists::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_album_artists_album_id")
                    .table(AlbumArtists::Table)
                    .col(AlbumArtists::AlbumId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_album_artists_artist_id")
                    .table(AlbumArtists::Table)
                    .col(AlbumArtists::ArtistId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AlbumArtists::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum AlbumArtists {
    Table,
    Id,
    AlbumId,
    ArtistId,
}
