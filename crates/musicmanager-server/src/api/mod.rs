pub mod albums;
pub mod artists;
pub mod error;
pub mod genres;
pub mod songs;

use std::sync::Arc;

use axum::http::StatusCode;
use axum::routing::{get, patch, post};
use axum::Router;
use musicmanager_db::entities::{album, artist, genre, song};
use musicmanager_db::sea_orm::DatabaseConnection;
use musicmanager_db::AppState;
use serde::Deserialize;

use crate::services::{AlbumService, ArtistService, GenreService, SongService};
pub use error::{ApiError, ErrorBody};

/// Routes mounted under `/api`.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        // Artists
        .route(
            "/artists",
            get(artists::list_artists).post(artists::create_artist),
        )
        .route("/artists/find", get(artists::find_artists))
        .route("/artists/add-range", post(artists::create_artists))
        .route(
            "/artists/{id}",
            get(artists::get_artist)
                .put(artists::update_artist)
                .delete(artists::delete_artist),
        )
        // Albums
        .route("/albums", get(albums::list_albums).post(albums::create_album))
        .route("/albums/find", get(albums::find_albums))
        .route("/albums/add-range", post(albums::create_albums))
        .route(
            "/albums/{id}",
            get(albums::get_album)
                .put(albums::update_album)
                .delete(albums::delete_album),
        )
        .route("/albums/add-song", patch(albums::add_song))
        .route("/albums/remove-song", patch(albums::remove_song))
        .route("/albums/add-artist", patch(albums::add_artist))
        .route("/albums/remove-artist", patch(albums::remove_artist))
        .route("/albums/add-genre", patch(albums::add_genre))
        .route("/albums/remove-genre", patch(albums::remove_genre))
        // Songs
        .route("/songs", get(songs::list_songs).post(songs::create_song))
        .route("/songs/find", get(songs::find_songs))
        .route("/songs/add-range", post(songs::create_songs))
        .route(
            "/songs/{id}",
            get(songs::get_song)
                .put(songs::update_song)
                .delete(songs::delete_song),
        )
        .route("/songs/add-artist", patch(songs::add_artist))
        .route("/songs/remove-artist", patch(songs::remove_artist))
        .route("/songs/add-genre", patch(songs::add_genre))
        .route("/songs/remove-genre", patch(songs::remove_genre))
        // Genres
        .route("/genres", get(genres::list_genres).post(genres::create_genre))
        .route("/genres/find", get(genres::find_genres))
        .route("/genres/add-range", post(genres::create_genres))
        .route(
            "/genres/{id}",
            get(genres::get_genre)
                .put(genres::update_genre)
                .delete(genres::delete_genre),
        )
}

// ─── Shared request types ───────────────────────────────────────────

/// Reference to a related record by id.
#[derive(Debug, Clone, Deserialize)]
pub struct IdRef {
    pub id: i32,
}

/// Reference to a genre by name.
#[derive(Debug, Clone, Deserialize)]
pub struct NameRef {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct FindParams {
    pub name: String,
}

/// Non-blank name or a validation error.
pub(crate) fn required_name(name: Option<String>) -> Result<String, ApiError> {
    match name {
        Some(n) if !n.trim().is_empty() => Ok(n),
        _ => Err(ApiError::Validation(vec!["The Name field is required.".to_string()])),
    }
}

/// 200 when the unit of work touched rows, 400 otherwise.
pub(crate) fn persisted(saved: bool, what: &str) -> Result<StatusCode, ApiError> {
    if saved {
        Ok(StatusCode::OK)
    } else {
        Err(ApiError::BadRequest(format!("{what} failed")))
    }
}

// ─── Related-record lookups ─────────────────────────────────────────

pub(crate) async fn require_artist(
    db: &DatabaseConnection,
    id: i32,
) -> Result<artist::Model, ApiError> {
    ArtistService::new(db)
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("artist", id))
}

pub(crate) async fn require_album(db: &DatabaseConnection, id: i32) -> Result<album::Model, ApiError> {
    AlbumService::new(db)
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("album", id))
}

pub(crate) async fn require_song(db: &DatabaseConnection, id: i32) -> Result<song::Model, ApiError> {
    SongService::new(db)
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("song", id))
}

pub(crate) async fn require_genre(db: &DatabaseConnection, id: i32) -> Result<genre::Model, ApiError> {
    GenreService::new(db)
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("genre", id))
}

pub(crate) async fn require_genre_named(
    db: &DatabaseConnection,
    name: &str,
) -> Result<genre::Model, ApiError> {
    GenreService::new(db)
        .get_by_name(name)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("genre '{name}' not found")))
}
