//! Response shapes. Related records are cut down to `{id, name}` so a
//! response never walks the relationship graph further than one hop.

use std::collections::HashMap;

use chrono::NaiveDate;
use musicmanager_db::entities::artist::Gender;
use musicmanager_db::entities::{
    album, album_artist, album_genre, album_song, artist, genre, song, song_artist, song_genre,
};
use musicmanager_db::repository::{load_members, load_owners, CatalogEntity};
use musicmanager_db::sea_orm::prelude::DateTimeWithTimeZone;
use musicmanager_db::sea_orm::{DatabaseConnection, DbErr};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub id: i32,
    pub name: String,
}

impl Summary {
    pub fn of<E: CatalogEntity>(model: &E::Model) -> Self {
        Self {
            id: E::id_of(model),
            name: E::name_of(model).to_string(),
        }
    }
}

fn summaries<E: CatalogEntity>(grouped: &HashMap<i32, Vec<E::Model>>, id: i32) -> Vec<Summary> {
    grouped
        .get(&id)
        .map(|rows| rows.iter().map(Summary::of::<E>).collect())
        .unwrap_or_default()
}

// ─── Artist ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtistResponse {
    pub id: i32,
    pub name: String,
    pub gender: Option<Gender>,
    pub description: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub country: Option<String>,
    pub avatar_img: Option<String>,
    pub created_on: DateTimeWithTimeZone,
    pub updated_on: DateTimeWithTimeZone,
    pub albums: Vec<Summary>,
    pub songs: Vec<Summary>,
}

impl ArtistResponse {
    pub fn from_model(a: artist::Model, albums: Vec<Summary>, songs: Vec<Summary>) -> Self {
        Self {
            id: a.id,
            name: a.name,
            gender: a.gender,
            description: a.description,
            date_of_birth: a.date_of_birth,
            country: a.country,
            avatar_img: a.avatar_img,
            created_on: a.created_on,
            updated_on: a.updated_on,
            albums,
            songs,
        }
    }
}

pub async fn artist_responses(
    db: &DatabaseConnection,
    artists: Vec<artist::Model>,
) -> Result<Vec<ArtistResponse>, DbErr> {
    let ids: Vec<i32> = artists.iter().map(|a| a.id).collect();
    let albums = load_owners::<album_artist::Entity, _>(db, &ids).await?;
    let songs = load_owners::<song_artist::Entity, _>(db, &ids).await?;

    Ok(artists
        .into_iter()
        .map(|a| {
            let id = a.id;
            ArtistResponse::from_model(
                a,
                summaries::<album::Entity>(&albums, id),
                summaries::<song::Entity>(&songs, id),
            )
        })
        .collect())
}

// ─── Album ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlbumResponse {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub avatar_img: Option<String>,
    pub release_date: Option<NaiveDate>,
    pub created_on: DateTimeWithTimeZone,
    pub updated_on: DateTimeWithTimeZone,
    pub artists: Vec<Summary>,
    pub songs: Vec<Summary>,
    pub genres: Vec<Summary>,
}

impl AlbumResponse {
    pub fn from_model(
        a: album::Model,
        artists: Vec<Summary>,
        songs: Vec<Summary>,
        genres: Vec<Summary>,
    ) -> Self {
        Self {
            id: a.id,
            name: a.name,
            description: a.description,
            avatar_img: a.avatar_img,
            release_date: a.release_date,
            created_on: a.created_on,
            updated_on: a.updated_on,
            artists,
            songs,
            genres,
        }
    }
}

pub async fn album_responses(
    db: &DatabaseConnection,
    albums: Vec<album::Model>,
) -> Result<Vec<AlbumResponse>, DbErr> {
    let ids: Vec<i32> = albums.iter().map(|a| a.id).collect();
    let artists = load_members::<album_artist::Entity, _>(db, &ids).await?;
    let songs = load_members::<album_song::Entity, _>(db, &ids).await?;
    let genres = load_members::<album_genre::Entity, _>(db, &ids).await?;

    Ok(albums
        .into_iter()
        .map(|a| {
            let id = a.id;
            AlbumResponse::from_model(
                a,
                summaries::<artist::Entity>(&artists, id),
                summaries::<song::Entity>(&songs, id),
                summaries::<genre::Entity>(&genres, id),
            )
        })
        .collect())
}

// ─── Song ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SongResponse {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub avatar_img: Option<String>,
    pub lyric: Option<String>,
    pub release_date: Option<NaiveDate>,
    pub created_on: DateTimeWithTimeZone,
    pub updated_on: DateTimeWithTimeZone,
    pub artists: Vec<Summary>,
    pub albums: Vec<Summary>,
    pub genres: Vec<Summary>,
}

impl SongResponse {
    pub fn from_model(
        s: song::Model,
        artists: Vec<Summary>,
        albums: Vec<Summary>,
        genres: Vec<Summary>,
    ) -> Self {
        Self {
            id: s.id,
            name: s.name,
            description: s.description,
            avatar_img: s.avatar_img,
            lyric: s.lyric,
            release_date: s.release_date,
            created_on: s.created_on,
            updated_on: s.updated_on,
            artists,
            albums,
            genres,
        }
    }
}

pub async fn song_responses(
    db: &DatabaseConnection,
    songs: Vec<song::Model>,
) -> Result<Vec<SongResponse>, DbErr> {
    let ids: Vec<i32> = songs.iter().map(|s| s.id).collect();
    let artists = load_members::<song_artist::Entity, _>(db, &ids).await?;
    let genres = load_members::<song_genre::Entity, _>(db, &ids).await?;
    let albums = load_owners::<album_song::Entity, _>(db, &ids).await?;

    Ok(songs
        .into_iter()
        .map(|s| {
            let id = s.id;
            SongResponse::from_model(
                s,
                summaries::<artist::Entity>(&artists, id),
                summaries::<album::Entity>(&albums, id),
                summaries::<genre::Entity>(&genres, id),
            )
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::now;

    fn make_album(id: i32, name: &str) -> album::Model {
        album::Model {
            id,
            name: name.into(),
            description: Some("liner notes".into()),
            avatar_img: None,
            release_date: NaiveDate::from_ymd_opt(1959, 8, 17),
            created_on: now(),
            updated_on: now(),
        }
    }

    fn make_artist(id: i32, name: &str) -> artist::Model {
        artist::Model {
            id,
            name: name.into(),
            gender: Some(Gender::Male),
            description: None,
            date_of_birth: NaiveDate::from_ymd_opt(1926, 5, 26),
            country: Some("US".into()),
            avatar_img: None,
            created_on: now(),
            updated_on: now(),
        }
    }

    #[test]
    fn test_summary_keeps_only_id_and_name() {
        let s = Summary::of::<album::Entity>(&make_album(4, "Kind of Blue"));
        assert_eq!(
            s,
            Summary {
                id: 4,
                name: "Kind of Blue".into()
            }
        );
        let json = serde_json::to_value(&s).unwrap();
        assert_eq!(json.as_object().unwrap().len(), 2);
    }

    #[test]
    fn test_summaries_missing_owner_is_empty() {
        let grouped: HashMap<i32, Vec<genre::Model>> = HashMap::new();
        assert!(summaries::<genre::Entity>(&grouped, 1).is_empty());
    }

    #[test]
    fn test_album_response_serialization() {
        let resp = AlbumResponse::from_model(
            make_album(1, "Kind of Blue"),
            vec![Summary::of::<artist::Entity>(&make_artist(2, "Miles Davis"))],
            Vec::new(),
            Vec::new(),
        );
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["name"], "Kind of Blue");
        assert_eq!(json["releaseDate"], "1959-08-17");
        assert!(json["avatarImg"].is_null());
        assert!(json["createdOn"].is_string());
        assert_eq!(json["artists"][0]["name"], "Miles Davis");
        assert!(json["artists"][0].get("country").is_none());
        assert_eq!(json["songs"], serde_json::json!([]));
    }

    #[test]
    fn test_artist_response_serialization() {
        let resp = ArtistResponse::from_model(make_artist(2, "Miles Davis"), Vec::new(), Vec::new());
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["gender"], "male");
        assert_eq!(json["dateOfBirth"], "1926-05-26");
        assert_eq!(json["country"], "US");
    }
}
