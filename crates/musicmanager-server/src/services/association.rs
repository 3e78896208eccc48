//! Adding and removing related records through an owner's collection.
//!
//! Every operation loads the owner with only the collection it touches,
//! changes that collection in memory, then stages the owner as updated along
//! with the join-row changes. `None` means the owner does not exist.
//!
//! Adding a record that is already a member writes a second join row.
//! Removing a record that is not a member changes nothing but still reports
//! success, since the owner row itself is rewritten.

use musicmanager_db::entities::{
    album_artist, album_genre, album_song, artist, genre, song, song_artist, song_genre,
};
use musicmanager_db::repository::{BaseRepository, CatalogEntity, Collection, Junction, Repository};
use musicmanager_db::sea_orm::DbErr;

use super::{AlbumService, CatalogService, SongService};

impl<E> CatalogService<E>
where
    E: CatalogEntity,
    BaseRepository<E>: Repository<E>,
{
    async fn change_collection<J, F>(
        &mut self,
        owner_id: i32,
        change: F,
    ) -> Result<Option<bool>, DbErr>
    where
        J: Junction<Owner = E>,
        F: FnOnce(&mut Collection<J>),
    {
        let repo = self.repo_mut();
        let Some((owner, mut collection)) = repo.load_with::<J>(owner_id).await? else {
            return Ok(None);
        };
        change(&mut collection);
        repo.update_with(owner, &collection);
        repo.complete().await.map(Some)
    }
}

impl AlbumService {
    pub async fn add_song_to_album(
        &mut self,
        album_id: i32,
        song: song::Model,
    ) -> Result<Option<bool>, DbErr> {
        self.change_collection::<album_song::Entity, _>(album_id, |songs| songs.add(song))
            .await
    }

    pub async fn remove_song_from_album(
        &mut self,
        album_id: i32,
        song: &song::Model,
    ) -> Result<Option<bool>, DbErr> {
        self.change_collection::<album_song::Entity, _>(album_id, |songs| {
            songs.remove(song.id);
        })
        .await
    }

    pub async fn add_artist_to_album(
        &mut self,
        album_id: i32,
        artist: artist::Model,
    ) -> Result<Option<bool>, DbErr> {
        self.change_collection::<album_artist::Entity, _>(album_id, |artists| artists.add(artist))
            .await
    }

    pub async fn remove_artist_from_album(
        &mut self,
        album_id: i32,
        artist: &artist::Model,
    ) -> Result<Option<bool>, DbErr> {
        self.change_collection::<album_artist::Entity, _>(album_id, |artists| {
            artists.remove(artist.id);
        })
        .await
    }

    pub async fn add_genre_to_album(
        &mut self,
        album_id: i32,
        genre: genre::Model,
    ) -> Result<Option<bool>, DbErr> {
        self.change_collection::<album_genre::Entity, _>(album_id, |genres| genres.add(genre))
            .await
    }

    pub async fn remove_genre_from_album(
        &mut self,
        album_id: i32,
        genre: &genre::Model,
    ) -> Result<Option<bool>, DbErr> {
        self.change_collection::<album_genre::Entity, _>(album_id, |genres| {
            genres.remove(genre.id);
        })
        .await
    }
}

impl SongService {
    pub async fn add_artist_to_song(
        &mut self,
        song_id: i32,
        artist: artist::Model,
    ) -> Result<Option<bool>, DbErr> {
        self.change_collection::<song_artist::Entity, _>(song_id, |artists| artists.add(artist))
            .await
    }

    pub async fn remove_artist_from_song(
        &mut self,
        song_id: i32,
        artist: &artist::Model,
    ) -> Result<Option<bool>, DbErr> {
        self.change_collection::<song_artist::Entity, _>(song_id, |artists| {
            artists.remove(artist.id);
        })
        .await
    }

    pub async fn add_genre_to_song(
        &mut self,
        song_id: i32,
        genre: genre::Model,
    ) -> Result<Option<bool>, DbErr> {
        self.change_collection::<song_genre::Entity, _>(song_id, |genres| genres.add(genre))
            .await
    }

    pub async fn remove_genre_from_song(
        &mut self,
        song_id: i32,
        genre: &genre::Model,
    ) -> Result<Option<bool>, DbErr> {
        self.change_collection::<song_genre::Entity, _>(song_id, |genres| {
            genres.remove(genre.id);
        })
        .await
    }
}
