use sea_orm::entity::prelude::*;
use sea_orm::ActiveValue::{NotSet, Set};
use serde::{Deserialize, Serialize};

use crate::repository::{Junction, Link};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "album_genres")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub album_id: i32,
    pub genre_id: i32,
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
        belongs_to = "super::genre::Entity",
        from = "Column::GenreId",
        to = "super::genre::Column::Id",
        on_delete = "Cascade"
    )]
    Genre,
}

impl Related<super::album::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Album.def()
    }
}

impl Related<super::genre::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Genre.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Junction for Entity {
    type Owner = super::album::Entity;
    type Member = super::genre::Entity;
    const LINK: Link = Link::AlbumGenres;

    fn row_id_column() -> Column {
        Column::Id
    }

    fn owner_column() -> Column {
        Column::AlbumId
    }

    fn member_column() -> Column {
        Column::GenreId
    }

    fn row_id(row: &Model) -> i32 {
        row.id
    }

    fn owner_id(row: &Model) -> i32 {
        row.album_id
    }

    fn member_id(row: &Model) -> i32 {
        row.genre_id
    }

    fn row(owner_id: i32, member_id: i32) -> ActiveModel {
        ActiveModel {
            id: NotSet,
            album_id: Set(owner_id),
            genre_id: Set(member_id),
        }
    }
}
