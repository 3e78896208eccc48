pub mod album;
pub mod album_artist;
pub mod album_genre;
pub mod album_song;
pub mod artist;
pub mod genre;
pub mod song;
pub mod song_artist;
pub mod song_genre;
