use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use musicmanager_db::entities::genre;
use musicmanager_db::repository::Draft;
use musicmanager_db::AppState;
use serde::Deserialize;
use std::sync::Arc;

use super::{persisted, require_genre, required_name, ApiError, FindParams};
use crate::services::{now, GenreService};

#[derive(Debug, Deserialize)]
pub struct GenreRequest {
    pub name: Option<String>,
}

impl GenreRequest {
    fn into_draft(self) -> Result<Draft<genre::Model>, ApiError> {
        let at = now();
        Ok(Draft::new(genre::Model {
            id: 0,
            name: required_name(self.name)?,
            created_on: at,
            updated_on: at,
        }))
    }
}

/// GET /api/genres
pub async fn list_genres(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<genre::Model>>, ApiError> {
    let genres = GenreService::new(&state.db).get_list().await?;
    Ok(Json(genres))
}

/// GET /api/genres/{id}
pub async fn get_genre(
    State(state): State<Arc<AppState>>,
    path: Result<Path<i32>, PathRejection>,
) -> Result<Json<genre::Model>, ApiError> {
    let Path(id) = path?;
    GenreService::new(&state.db)
        .get_response_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("genre", id))
}

/// GET /api/genres/find?name=
pub async fn find_genres(
    State(state): State<Arc<AppState>>,
    query: Result<Query<FindParams>, QueryRejection>,
) -> Result<Json<Vec<genre::Model>>, ApiError> {
    let Query(params) = query?;
    let genres = GenreService::new(&state.db)
        .find_by_name(&params.name)
        .await?;
    Ok(Json(genres))
}

/// POST /api/genres
pub async fn create_genre(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<GenreRequest>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Json(req) = payload?;
    let draft = req.into_draft()?;
    let saved = GenreService::new(&state.db).create(draft).await?;
    persisted(saved, "create genre")
}

/// POST /api/genres/add-range
pub async fn create_genres(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Vec<GenreRequest>>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Json(reqs) = payload?;
    let drafts = reqs
        .into_iter()
        .map(GenreRequest::into_draft)
        .collect::<Result<Vec<_>, _>>()?;
    let saved = GenreService::new(&state.db).create_many(drafts).await?;
    persisted(saved, "create genres")
}

/// PUT /api/genres/{id}
pub async fn update_genre(
    State(state): State<Arc<AppState>>,
    path: Result<Path<i32>, PathRejection>,
    payload: Result<Json<GenreRequest>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = path?;
    let Json(req) = payload?;
    let mut genre = require_genre(&state.db, id).await?;
    genre.name = required_name(req.name)?;
    let saved = GenreService::new(&state.db).update(genre).await?;
    persisted(saved, "update genre")
}

/// DELETE /api/genres/{id}
pub async fn delete_genre(
    State(state): State<Arc<AppState>>,
    path: Result<Path<i32>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = path?;
    let genre = require_genre(&state.db, id).await?;
    let saved = GenreService::new(&state.db).delete(&genre).await?;
    persisted(saved, "delete genre")
}
