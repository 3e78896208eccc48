use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use musicmanager_db::entities::album;
use musicmanager_db::repository::{Draft, Link};
use musicmanager_db::sea_orm::DatabaseConnection;
use musicmanager_db::AppState;
use serde::Deserialize;
use std::sync::Arc;

use super::{
    persisted, require_album, require_artist, require_genre, require_genre_named, require_song,
    required_name, ApiError, FindParams, IdRef, NameRef,
};
use crate::services::projection::AlbumResponse;
use crate::services::{now, AlbumService};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAlbumRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub avatar_img: Option<String>,
    pub release_date: Option<NaiveDate>,
    #[serde(default)]
    pub artists: Vec<IdRef>,
    #[serde(default)]
    pub genres: Vec<NameRef>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAlbumRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub avatar_img: Option<String>,
    pub release_date: Option<NaiveDate>,
}

impl UpdateAlbumRequest {
    /// Replace every scalar field of `album`.
    fn merge_into(self, album: &mut album::Model) -> Result<(), ApiError> {
        album.name = required_name(self.name)?;
        album.description = self.description;
        album.avatar_img = self.avatar_img;
        album.release_date = self.release_date;
        Ok(())
    }
}

/// Validate a create request and resolve its artists and genres.
async fn album_draft(
    db: &DatabaseConnection,
    req: CreateAlbumRequest,
) -> Result<Draft<album::Model>, ApiError> {
    let name = required_name(req.name)?;
    let at = now();
    let mut draft = Draft::new(album::Model {
        id: 0,
        name,
        description: req.description,
        avatar_img: req.avatar_img,
        release_date: req.release_date,
        created_on: at,
        updated_on: at,
    });
    for artist in &req.artists {
        let artist = require_artist(db, artist.id).await?;
        draft = draft.link(Link::AlbumArtists, artist.id);
    }
    for genre in &req.genres {
        let genre = require_genre_named(db, &genre.name).await?;
        draft = draft.link(Link::AlbumGenres, genre.id);
    }
    Ok(draft)
}

/// GET /api/albums
pub async fn list_albums(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<AlbumResponse>>, ApiError> {
    let albums = AlbumService::new(&state.db).get_list().await?;
    Ok(Json(albums))
}

/// GET /api/albums/{id}
pub async fn get_album(
    State(state): State<Arc<AppState>>,
    path: Result<Path<i32>, PathRejection>,
) -> Result<Json<AlbumResponse>, ApiError> {
    let Path(id) = path?;
    AlbumService::new(&state.db)
        .get_response_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("album", id))
}

/// GET /api/albums/find?name=
pub async fn find_albums(
    State(state): State<Arc<AppState>>,
    query: Result<Query<FindParams>, QueryRejection>,
) -> Result<Json<Vec<AlbumResponse>>, ApiError> {
    let Query(params) = query?;
    let albums = AlbumService::new(&state.db)
        .find_by_name(&params.name)
        .await?;
    Ok(Json(albums))
}

/// POST /api/albums
pub async fn create_album(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateAlbumRequest>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Json(req) = payload?;
    let draft = album_draft(&state.db, req).await?;
    let saved = AlbumService::new(&state.db).create(draft).await?;
    persisted(saved, "create album")
}

/// POST /api/albums/add-range
pub async fn create_albums(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Vec<CreateAlbumRequest>>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Json(reqs) = payload?;
    let mut drafts = Vec::with_capacity(reqs.len());
    for req in reqs {
        drafts.push(album_draft(&state.db, req).await?);
    }
    let saved = AlbumService::new(&state.db).create_many(drafts).await?;
    persisted(saved, "create albums")
}

/// PUT /api/albums/{id}
pub async fn update_album(
    State(state): State<Arc<AppState>>,
    path: Result<Path<i32>, PathRejection>,
    payload: Result<Json<UpdateAlbumRequest>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = path?;
    let Json(req) = payload?;
    let mut album = require_album(&state.db, id).await?;
    req.merge_into(&mut album)?;
    let saved = AlbumService::new(&state.db).update(album).await?;
    persisted(saved, "update album")
}

/// DELETE /api/albums/{id}
pub async fn delete_album(
    State(state): State<Arc<AppState>>,
    path: Result<Path<i32>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = path?;
    let album = require_album(&state.db, id).await?;
    let saved = AlbumService::new(&state.db).delete(&album).await?;
    persisted(saved, "delete album")
}

// ─── Associations ───────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlbumSongParams {
    pub album_id: i32,
    pub song_id: i32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlbumArtistParams {
    pub album_id: i32,
    pub artist_id: i32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlbumGenreParams {
    pub album_id: i32,
    pub genre_id: i32,
}

fn album_changed(result: Option<bool>, album_id: i32, what: &str) -> Result<StatusCode, ApiError> {
    let saved = result.ok_or_else(|| ApiError::not_found("album", album_id))?;
    persisted(saved, what)
}

/// PATCH /api/albums/add-song?albumId=&songId=
pub async fn add_song(
    State(state): State<Arc<AppState>>,
    query: Result<Query<AlbumSongParams>, QueryRejection>,
) -> Result<StatusCode, ApiError> {
    let Query(p) = query?;
    let song = require_song(&state.db, p.song_id).await?;
    let result = AlbumService::new(&state.db)
        .add_song_to_album(p.album_id, song)
        .await?;
    album_changed(result, p.album_id, "add song to album")
}

/// PATCH /api/albums/remove-song?albumId=&songId=
pub async fn remove_song(
    State(state): State<Arc<AppState>>,
    query: Result<Query<AlbumSongParams>, QueryRejection>,
) -> Result<StatusCode, ApiError> {
    let Query(p) = query?;
    let song = require_song(&state.db, p.song_id).await?;
    let result = AlbumService::new(&state.db)
        .remove_song_from_album(p.album_id, &song)
        .await?;
    album_changed(result, p.album_id, "remove song from album")
}

/// PATCH /api/albums/add-artist?albumId=&artistId=
pub async fn add_artist(
    State(state): State<Arc<AppState>>,
    query: Result<Query<AlbumArtistParams>, QueryRejection>,
) -> Result<StatusCode, ApiError> {
    let Query(p) = query?;
    let artist = require_artist(&state.db, p.artist_id).await?;
    let result = AlbumService::new(&state.db)
        .add_artist_to_album(p.album_id, artist)
        .await?;
    album_changed(result, p.album_id, "add artist to album")
}

/// PATCH /api/albums/remove-artist?albumId=&artistId=
pub async fn remove_artist(
    State(state): State<Arc<AppState>>,
    query: Result<Query<AlbumArtistParams>, QueryRejection>,
) -> Result<StatusCode, ApiError> {
    let Query(p) = query?;
    let artist = require_artist(&state.db, p.artist_id).await?;
    let result = AlbumService::new(&state.db)
        .remove_artist_from_album(p.album_id, &artist)
        .await?;
    album_changed(result, p.album_id, "remove artist from album")
}

/// PATCH /api/albums/add-genre?albumId=&genreId=
pub async fn add_genre(
    State(state): State<Arc<AppState>>,
    query: Result<Query<AlbumGenreParams>, QueryRejection>,
) -> Result<StatusCode, ApiError> {
    let Query(p) = query?;
    let genre = require_genre(&state.db, p.genre_id).await?;
    let result = AlbumService::new(&state.db)
        .add_genre_to_album(p.album_id, genre)
        .await?;
    album_changed(result, p.album_id, "add genre to album")
}

/// PATCH /api/albums/remove-genre?albumId=&genreId=
pub async fn remove_genre(
    State(state): State<Arc<AppState>>,
    query: Result<Query<AlbumGenreParams>, QueryRejection>,
) -> Result<StatusCode, ApiError> {
    let Query(p) = query?;
    let genre = require_genre(&state.db, p.genre_id).await?;
    let result = AlbumService::new(&state.db)
        .remove_genre_from_album(p.album_id, &genre)
        .await?;
    album_changed(result, p.album_id, "remove genre from album")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_camel_case() {
        let req: CreateAlbumRequest = serde_json::from_value(serde_json::json!({
            "name": "Kind of Blue",
            "avatarImg": "cover.png",
            "releaseDate": "1959-08-17",
            "artists": [{"id": 1}],
            "genres": [{"name": "Jazz"}]
        }))
        .unwrap();
        assert_eq!(req.avatar_img.as_deref(), Some("cover.png"));
        assert_eq!(req.release_date, NaiveDate::from_ymd_opt(1959, 8, 17));
        assert_eq!(req.artists[0].id, 1);
        assert_eq!(req.genres[0].name, "Jazz");
    }

    #[test]
    fn test_create_request_collections_default_empty() {
        let req: CreateAlbumRequest =
            serde_json::from_value(serde_json::json!({"name": "Solo"})).unwrap();
        assert!(req.artists.is_empty());
        assert!(req.genres.is_empty());
    }

    #[test]
    fn test_update_merges_all_scalars() {
        let mut album = album::Model {
            id: 3,
            name: "Old".into(),
            description: Some("old notes".into()),
            avatar_img: Some("old.png".into()),
            release_date: None,
            created_on: now(),
            updated_on: now(),
        };
        let req = UpdateAlbumRequest {
            name: Some("New".into()),
            description: None,
            avatar_img: Some("new.png".into()),
            release_date: NaiveDate::from_ymd_opt(2001, 1, 1),
        };
        req.merge_into(&mut album).unwrap();
        assert_eq!(album.id, 3);
        assert_eq!(album.name, "New");
        assert!(album.description.is_none());
        assert_eq!(album.avatar_img.as_deref(), Some("new.png"));
    }

    #[test]
    fn test_update_requires_name() {
        let mut album = album::Model {
            id: 3,
            name: "Old".into(),
            description: None,
            avatar_img: None,
            release_date: None,
            created_on: now(),
            updated_on: now(),
        };
        let req = UpdateAlbumRequest {
            name: None,
            description: None,
            avatar_img: None,
            release_date: None,
        };
        assert!(matches!(req.merge_into(&mut album), Err(ApiError::Validation(_))));
        assert_eq!(album.name, "Old");
    }
}
