use musicmanager_db::entities::song;
use musicmanager_db::sea_orm::DbErr;

use super::projection::{song_responses, SongResponse};
use super::CatalogService;

pub type SongService = CatalogService<song::Entity>;

impl SongService {
    pub async fn get_list(&self) -> Result<Vec<SongResponse>, DbErr> {
        let songs = self.all().await?;
        song_responses(self.db(), songs).await
    }

    pub async fn get_response_by_id(&self, id: i32) -> Result<Option<SongResponse>, DbErr> {
        let Some(song) = self.get_by_id(id).await? else {
            return Ok(None);
        };
        Ok(song_responses(self.db(), vec![song]).await?.pop())
    }

    pub async fn find_by_name(&self, fragment: &str) -> Result<Vec<SongResponse>, DbErr> {
        let songs = self.name_matches(fragment).await?;
        song_responses(self.db(), songs).await
    }
}
