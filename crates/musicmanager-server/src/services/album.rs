use musicmanager_db::entities::album;
use musicmanager_db::sea_orm::DbErr;

use super::projection::{album_responses, AlbumResponse};
use super::CatalogService;

pub type AlbumService = CatalogService<album::Entity>;

impl AlbumService {
    /// Every album with its artists, songs and genres.
    pub async fn get_list(&self) -> Result<Vec<AlbumResponse>, DbErr> {
        let albums = self.all().await?;
        album_responses(self.db(), albums).await
    }

    pub async fn get_response_by_id(&self, id: i32) -> Result<Option<AlbumResponse>, DbErr> {
        let Some(album) = self.get_by_id(id).await? else {
            return Ok(None);
        };
        Ok(album_responses(self.db(), vec![album]).await?.pop())
    }

    pub async fn find_by_name(&self, fragment: &str) -> Result<Vec<AlbumResponse>, DbErr> {
        let albums = self.name_matches(fragment).await?;
        album_responses(self.db(), albums).await
    }
}
