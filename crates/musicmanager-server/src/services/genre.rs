use musicmanager_db::entities::genre;
use musicmanager_db::sea_orm::DbErr;

use super::CatalogService;

/// Genres carry no collections, so responses are plain rows.
pub type GenreService = CatalogService<genre::Entity>;

impl GenreService {
    pub async fn get_list(&self) -> Result<Vec<genre::Model>, DbErr> {
        self.all().await
    }

    pub async fn get_response_by_id(&self, id: i32) -> Result<Option<genre::Model>, DbErr> {
        self.get_by_id(id).await
    }

    pub async fn find_by_name(&self, fragment: &str) -> Result<Vec<genre::Model>, DbErr> {
        self.name_matches(fragment).await
    }
}
