use musicmanager_db::entities::artist;
use musicmanager_db::sea_orm::DbErr;

use super::projection::{artist_responses, ArtistResponse};
use super::CatalogService;

pub type ArtistService = CatalogService<artist::Entity>;

impl ArtistService {
    /// Every artist with its albums and songs.
    pub async fn get_list(&self) -> Result<Vec<ArtistResponse>, DbErr> {
        let artists = self.all().await?;
        artist_responses(self.db(), artists).await
    }

    pub async fn get_response_by_id(&self, id: i32) -> Result<Option<ArtistResponse>, DbErr> {
        let Some(artist) = self.get_by_id(id).await? else {
            return Ok(None);
        };
        Ok(artist_responses(self.db(), vec![artist]).await?.pop())
    }

    pub async fn find_by_name(&self, fragment: &str) -> Result<Vec<ArtistResponse>, DbErr> {
        let artists = self.name_matches(fragment).await?;
        artist_responses(self.db(), artists).await
    }
}
