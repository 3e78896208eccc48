use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use musicmanager_db::entities::song;
use musicmanager_db::repository::{Draft, Link};
use musicmanager_db::sea_orm::DatabaseConnection;
use musicmanager_db::AppState;
use serde::Deserialize;
use std::sync::Arc;

use super::{
    persisted, require_album, require_artist, require_genre, require_genre_named, require_song,
    required_name, ApiError, FindParams, IdRef, NameRef,
};
use crate::services::projection::SongResponse;
use crate::services::{now, SongService};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSongRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub avatar_img: Option<String>,
    pub lyric: Option<String>,
    pub release_date: Option<NaiveDate>,
    #[serde(default)]
    pub artists: Vec<IdRef>,
    #[serde(default)]
    pub albums: Vec<IdRef>,
    #[serde(default)]
    pub genres: Vec<NameRef>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSongRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub avatar_img: Option<String>,
    pub lyric: Option<String>,
    pub release_date: Option<NaiveDate>,
}

impl UpdateSongRequest {
    fn merge_into(self, song: &mut song::Model) -> Result<(), ApiError> {
        song.name = required_name(self.name)?;
        song.description = self.description;
        song.avatar_img = self.avatar_img;
        song.lyric = self.lyric;
        song.release_date = self.release_date;
        Ok(())
    }
}

async fn song_draft(
    db: &DatabaseConnection,
    req: CreateSongRequest,
) -> Result<Draft<song::Model>, ApiError> {
    let name = required_name(req.name)?;
    let at = now();
    let mut draft = Draft::new(song::Model {
        id: 0,
        name,
        description: req.description,
        avatar_img: req.avatar_img,
        lyric: req.lyric,
        release_date: req.release_date,
        created_on: at,
        updated_on: at,
    });
    for artist in &req.artists {
        let artist = require_artist(db, artist.id).await?;
        draft = draft.link(Link::SongArtists, artist.id);
    }
    for album in &req.albums {
        let album = require_album(db, album.id).await?;
        draft = draft.link(Link::SongAlbums, album.id);
    }
    for genre in &req.genres {
        let genre = require_genre_named(db, &genre.name).await?;
        draft = draft.link(Link::SongGenres, genre.id);
    }
    Ok(draft)
}

/// GET /api/songs
pub async fn list_songs(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<SongResponse>>, ApiError> {
    let songs = SongService::new(&state.db).get_list().await?;
    Ok(Json(songs))
}

/// GET /api/songs/{id}
pub async fn get_song(
    State(state): State<Arc<AppState>>,
    path: Result<Path<i32>, PathRejection>,
) -> Result<Json<SongResponse>, ApiError> {
    let Path(id) = path?;
    SongService::new(&state.db)
        .get_response_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("song", id))
}

/// GET /api/songs/find?name=
pub async fn find_songs(
    State(state): State<Arc<AppState>>,
    query: Result<Query<FindParams>, QueryRejection>,
) -> Result<Json<Vec<SongResponse>>, ApiError> {
    let Query(params) = query?;
    let songs = SongService::new(&state.db).find_by_name(&params.name).await?;
    Ok(Json(songs))
}

/// POST /api/songs
pub async fn create_song(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateSongRequest>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Json(req) = payload?;
    let draft = song_draft(&state.db, req).await?;
    let saved = SongService::new(&state.db).create(draft).await?;
    persisted(saved, "create song")
}

/// POST /api/songs/add-range
pub async fn create_songs(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Vec<CreateSongRequest>>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Json(reqs) = payload?;
    let mut drafts = Vec::with_capacity(reqs.len());
    for req in reqs {
        drafts.push(song_draft(&state.db, req).await?);
    }
    let saved = SongService::new(&state.db).create_many(drafts).await?;
    persisted(saved, "create songs")
}

/// PUT /api/songs/{id}
pub async fn update_song(
    State(state): State<Arc<AppState>>,
    path: Result<Path<i32>, PathRejection>,
    payload: Result<Json<UpdateSongRequest>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = path?;
    let Json(req) = payload?;
    let mut song = require_song(&state.db, id).await?;
    req.merge_into(&mut song)?;
    let saved = SongService::new(&state.db).update(song).await?;
    persisted(saved, "update song")
}

/// DELETE /api/songs/{id}
pub async fn delete_song(
    State(state): State<Arc<AppState>>,
    path: Result<Path<i32>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = path?;
    let song = require_song(&state.db, id).await?;
    let saved = SongService::new(&state.db).delete(&song).await?;
    persisted(saved, "delete song")
}

// ─── Associations ───────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SongArtistParams {
    pub song_id: i32,
    pub artist_id: i32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SongGenreParams {
    pub song_id: i32,
    pub genre_id: i32,
}

fn song_changed(result: Option<bool>, song_id: i32, what: &str) -> Result<StatusCode, ApiError> {
    let saved = result.ok_or_else(|| ApiError::not_found("song", song_id))?;
    persisted(saved, what)
}

/// PATCH /api/songs/add-artist?songId=&artistId=
pub async fn add_artist(
    State(state): State<Arc<AppState>>,
    query: Result<Query<SongArtistParams>, QueryRejection>,
) -> Result<StatusCode, ApiError> {
    let Query(p) = query?;
    let artist = require_artist(&state.db, p.artist_id).await?;
    let result = SongService::new(&state.db)
        .add_artist_to_song(p.song_id, artist)
        .await?;
    song_changed(result, p.song_id, "add artist to song")
}

/// PATCH /api/songs/remove-artist?songId=&artistId=
pub async fn remove_artist(
    State(state): State<Arc<AppState>>,
    query: Result<Query<SongArtistParams>, QueryRejection>,
) -> Result<StatusCode, ApiError> {
    let Query(p) = query?;
    let artist = require_artist(&state.db, p.artist_id).await?;
    let result = SongService::new(&state.db)
        .remove_artist_from_song(p.song_id, &artist)
        .await?;
    song_changed(result, p.song_id, "remove artist from song")
}

/// PATCH /api/songs/add-genre?songId=&genreId=
pub async fn add_genre(
    State(state): State<Arc<AppState>>,
    query: Result<Query<SongGenreParams>, QueryRejection>,
) -> Result<StatusCode, ApiError> {
    let Query(p) = query?;
    let genre = require_genre(&state.db, p.genre_id).await?;
    let result = SongService::new(&state.db)
        .add_genre_to_song(p.song_id, genre)
        .await?;
    song_changed(result, p.song_id, "add genre to song")
}

/// PATCH /api/songs/remove-genre?songId=&genreId=
pub async fn remove_genre(
    State(state): State<Arc<AppState>>,
    query: Result<Query<SongGenreParams>, QueryRejection>,
) -> Result<StatusCode, ApiError> {
    let Query(p) = query?;
    let genre = require_genre(&state.db, p.genre_id).await?;
    let result = SongService::new(&state.db)
        .remove_genre_from_song(p.song_id, &genre)
        .await?;
    song_changed(result, p.song_id, "remove genre from song")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_with_albums() {
        let req: CreateSongRequest = serde_json::from_value(serde_json::json!({
            "name": "So What",
            "lyric": "",
            "albums": [{"id": 2}, {"id": 5}]
        }))
        .unwrap();
        assert_eq!(req.lyric.as_deref(), Some(""));
        assert_eq!(req.albums.iter().map(|a| a.id).collect::<Vec<_>>(), vec![2, 5]);
        assert!(req.artists.is_empty());
    }

    #[test]
    fn test_association_params_camel_case() {
        let p: SongGenreParams =
            serde_json::from_value(serde_json::json!({"songId": 1, "genreId": 9})).unwrap();
        assert_eq!(p.song_id, 1);
        assert_eq!(p.genre_id, 9);
    }

    #[test]
    fn test_song_changed_missing_song() {
        let err = song_changed(None, 12, "add genre to song").unwrap_err();
        assert_eq!(err.to_string(), "song 12 not found");
        assert_eq!(song_changed(Some(true), 12, "x").unwrap(), StatusCode::OK);
    }
}
