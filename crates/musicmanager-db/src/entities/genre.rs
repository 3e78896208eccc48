use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::repository::CatalogEntity;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "genres")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(column_type = "Text")]
    pub name: String,
    pub created_on: DateTimeWithTimeZone,
    pub updated_on: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::album_genre::Entity")]
    AlbumGenre,
    #[sea_orm(has_many = "super::song_genre::Entity")]
    SongGenre,
}

impl Related<super::album_genre::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AlbumGenre.def()
    }
}

impl Related<super::song_genre::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SongGenre.def()
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
