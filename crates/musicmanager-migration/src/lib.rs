pub use sea_orm_migration::prelude::*;

mod m20240101_000001_create_artists;
mod m20240101_000002_create_albums;
mod m20240101_000003_create_songs;
mod m20240101_000004_create_genres;
mod m20240101_000005_create_album_artists;
mod m20240101_000006_create_album_songs;
mod m20240101_000007_create_album_genres;
mod m20240101_000008_create_song_artists;
mod m20240101_000009_create_song_genres;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_artists::Migration),
            Box::new(m20240101_000002_create_albums::Migration),
            Box::new(m20240101_000003_create_songs::Migration),
            Box::new(m20240101_000004_create_genres::Migration),
            Box::new(m20240101_000005_create_album_artists::Migration),
            Box::new(m20240101_000006_create_album_songs::Migration),
            Box::new(m20240101_000007_create_album_genres::Migration),
            Box::new(m20240101_000008_create_song_artists::Migration),
            Box::new(m20240101_000009_create_song_genres::Migration),
        ]
    }
}
