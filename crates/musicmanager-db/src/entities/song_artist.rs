use sea_orm::entity::prelude::*;
use sea_orm::ActiveValue::{NotSet, Set};
use serde::{Deserialize, Serialize};

use crate::repository::{Junction, Link};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "song_artists")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub song_id: i32,
    pub artist_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::song::Entity",
        from = "Column::SongId",
        to = "super::song::Column::Id",
        on_delete = "Cascade"
    )]
    Song,
    #[sea_orm(
        belongs_to = "super::artist::Entity",
        from = "Column::ArtistId",
        to = "super::artist::Column::Id",
        on_delete = "Cascade"
    )]
    Artist,
}

impl Related<super::song::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Song.def()
    }
}

impl Related<super::artist::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Artist.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Junction for Entity {
    type Owner = super::song::Entity;
    type Member = super::artist::Entity;
    const LINK: Link = Link::SongArtists;

    fn row_id_column() -> Column {
        Column::Id
    }

    fn owner_column() -> Column {
        Column::SongId
    }

    fn member_column() -> Column {
        Column::ArtistId
    }

    fn row_id(row: &Model) -> i32 {
        row.id
    }

    fn owner_id(row: &Model) -> i32 {
        row.song_id
    }

    fn member_id(row: &Model) -> i32 {
        row.artist_id
    }

    fn row(owner_id: i32, member_id: i32) -> ActiveModel {
        ActiveModel {
            id: NotSet,
            song_id: Set(owner_id),
            artist_id: Set(member_id),
        }
    }
}
