use sea_orm::entity::prelude::*;
use sea_orm::ActiveValue::{NotSet, Set};
use serde::{Deserialize, Serialize};

use crate::repository::{Junction, Link};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "album_songs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub album_id: i32,
    pub song_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::album::Entity",
        from = "Column::AlbumId",
        to = "super::album::Column::Id",
        on_delete = "Cascade"
    )]
    Album,
    #[sea_orm(
        belongs_to = "super::song::Entity",
        from = "Column::SongId",
        to = "super::song::Column::Id",
        on_delete = "Cascade"
    )]
    Song,
}

impl Related<super::album::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Album.def()
    }
}

impl Related<super::song::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Song.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Junction for Entity {
    type Owner = super::album::Entity;
    type Member = super::song::Entity;
    const LINK: Link = Link::AlbumSongs;

    fn row_id_column() -> Column {
        Column::Id
    }

    fn owner_column() -> Column {
        Column::AlbumId
    }

    fn member_column() -> Column {
        Column::SongId
    }

    fn row_id(row: &Model) -> i32 {
        row.id
    }

    fn owner_id(row: &Model) -> i32 {
        row.album_id
    }

    fn member_id(row: &Model) -> i32 {
        row.song_id
    }

    fn row(owner_id: i32, member_id: i32) -> ActiveModel {
        ActiveModel {
            id: NotSet,
            album_id: Set(owner_id),
            song_id: Set(member_id),
        }
    }
}
