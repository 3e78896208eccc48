use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::repository::CatalogEntity;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "songs")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(column_type = "Text")]
    pub name: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub avatar_img: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub lyric: Option<String>,
    pub release_date: Option<Date>,
    pub created_on: DateTimeWithTimeZone,
    pub updated_on: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::song_artist::Entity")]
    SongArtist,
    #[sea_orm(has_many = "super::song_genre::Entity")]
    SongGenre,
    #[sea_orm(has_many = "super::album_song::Entity")]
    AlbumSong,
}

impl Related<super::song_artist::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SongArtist.def()
    }
}

impl Related<super::song_genre::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SongGenre.def()
    }
}

impl Related<super::album_song::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AlbumSong.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl CatalogEntity for Entity {
    fn id_column() -> Column {
        Column::Id
    }

    fn name_column() -> Column {
        Column::Name
    }

    fn id_of(model: &Model) -> i32 {
        model.id
    }

    fn name_of(model: &Model) -> &str {
        &model.name
    }

    fn set_created_on(model: &mut Model, at: DateTimeWithTimeZone) {
        model.created_on = at;
    }

    fn set_updated_on(model: &mut Model, at: DateTimeWithTimeZone) {
        model.updated_on = at;
    }
}
