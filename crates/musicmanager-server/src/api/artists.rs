use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use musicmanager_db::entities::artist::{self, Gender};
use musicmanager_db::repository::Draft;
use musicmanager_db::AppState;
use serde::Deserialize;
use std::sync::Arc;

use super::{persisted, require_artist, required_name, ApiError, FindParams};
use crate::services::projection::ArtistResponse;
use crate::services::{now, ArtistService};

/// Body of both create and update: artists carry no related-record ids.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtistRequest {
    pub name: Option<String>,
    pub gender: Option<Gender>,
    pub description: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub country: Option<String>,
    pub avatar_img: Option<String>,
}

impl ArtistRequest {
    fn into_draft(self) -> Result<Draft<artist::Model>, ApiError> {
        let at = now();
        Ok(Draft::new(artist::Model {
            id: 0,
            name: required_name(self.name)?,
            gender: self.gender,
            description: self.description,
            date_of_birth: self.date_of_birth,
            country: self.country,
            avatar_img: self.avatar_img,
            created_on: at,
            updated_on: at,
        }))
    }

    fn merge_into(self, artist: &mut artist::Model) -> Result<(), ApiError> {
        artist.name = required_name(self.name)?;
        artist.gender = self.gender;
        artist.description = self.description;
        artist.date_of_birth = self.date_of_birth;
        artist.country = self.country;
        artist.avatar_img = self.avatar_img;
        Ok(())
    }
}

/// GET /api/artists
pub async fn list_artists(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ArtistResponse>>, ApiError> {
    let artists = ArtistService::new(&state.db).get_list().await?;
    Ok(Json(artists))
}

/// GET /api/artists/{id}
pub async fn get_artist(
    State(state): State<Arc<AppState>>,
    path: Result<Path<i32>, PathRejection>,
) -> Result<Json<ArtistResponse>, ApiError> {
    let Path(id) = path?;
    ArtistService::new(&state.db)
        .get_response_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("artist", id))
}

/// GET /api/artists/find?name=
pub async fn find_artists(
    State(state): State<Arc<AppState>>,
    query: Result<Query<FindParams>, QueryRejection>,
) -> Result<Json<Vec<ArtistResponse>>, ApiError> {
    let Query(params) = query?;
    let artists = ArtistService::new(&state.db)
        .find_by_name(&params.name)
        .await?;
    Ok(Json(artists))
}

/// POST /api/artists
pub async fn create_artist(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ArtistRequest>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Json(req) = payload?;
    let draft = req.into_draft()?;
    let saved = ArtistService::new(&state.db).create(draft).await?;
    persisted(saved, "create artist")
}

/// POST /api/artists/add-range
pub async fn create_artists(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Vec<ArtistRequest>>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Json(reqs) = payload?;
    let drafts = reqs
        .into_iter()
        .map(ArtistRequest::into_draft)
        .collect::<Result<Vec<_>, _>>()?;
    let saved = ArtistService::new(&state.db).create_many(drafts).await?;
    persisted(saved, "create artists")
}

/// PUT /api/artists/{id}
pub async fn update_artist(
    State(state): State<Arc<AppState>>,
    path: Result<Path<i32>, PathRejection>,
    payload: Result<Json<ArtistRequest>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = path?;
    let Json(req) = payload?;
    let mut artist = require_artist(&state.db, id).await?;
    req.merge_into(&mut artist)?;
    let saved = ArtistService::new(&state.db).update(artist).await?;
    persisted(saved, "update artist")
}

/// DELETE /api/artists/{id}
pub async fn delete_artist(
    State(state): State<Arc<AppState>>,
    path: Result<Path<i32>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = path?;
    let artist = require_artist(&state.db, id).await?;
    let saved = ArtistService::new(&state.db).delete(&artist).await?;
    persisted(saved, "delete artist")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_request(name: Option<&str>) -> ArtistRequest {
        ArtistRequest {
            name: name.map(Into::into),
            gender: Some(Gender::Female),
            description: None,
            date_of_birth: NaiveDate::from_ymd_opt(1917, 4, 25),
            country: Some("US".into()),
            avatar_img: None,
        }
    }

    #[test]
    fn test_request_deserializes_gender_and_date() {
        let req: ArtistRequest = serde_json::from_value(serde_json::json!({
            "name": "Ella Fitzgerald",
            "gender": "female",
            "dateOfBirth": "1917-04-25"
        }))
        .unwrap();
        assert_eq!(req.gender, Some(Gender::Female));
        assert_eq!(req.date_of_birth, NaiveDate::from_ymd_opt(1917, 4, 25));
    }

    #[test]
    fn test_request_rejects_unknown_gender() {
        let res: Result<ArtistRequest, _> =
            serde_json::from_value(serde_json::json!({"name": "X", "gender": "robot"}));
        assert!(res.is_err());
    }

    #[test]
    fn test_into_draft_stamps_both_timestamps() {
        let draft = make_request(Some("Ella Fitzgerald")).into_draft().unwrap();
        assert_eq!(draft.model.created_on, draft.model.updated_on);
        assert!(draft.links.is_empty());
    }

    #[test]
    fn test_into_draft_requires_name() {
        assert!(matches!(
            make_request(None).into_draft(),
            Err(ApiError::Validation(_))
        ));
    }
}
