//! Service layer: one service per catalog entity, built per request around a
//! fresh repository.

pub mod album;
pub mod artist;
pub mod association;
pub mod genre;
pub mod projection;
pub mod song;

use musicmanager_db::repository::{BaseRepository, CatalogEntity, Draft, Repository};
use musicmanager_db::sea_orm::prelude::DateTimeWithTimeZone;
use musicmanager_db::sea_orm::{ColumnTrait, Condition, DatabaseConnection, DbErr};

pub use album::AlbumService;
pub use artist::ArtistService;
pub use genre::GenreService;
pub use song::SongService;

/// Timestamp used for `created_on` / `updated_on`.
pub fn now() -> DateTimeWithTimeZone {
    chrono::Utc::now().fixed_offset()
}

/// CRUD shared by every catalog service.
pub struct CatalogService<E: CatalogEntity> {
    repo: BaseRepository<E>,
}

impl<E> CatalogService<E>
where
    E: CatalogEntity,
    BaseRepository<E>: Repository<E>,
{
    pub fn new(db: &DatabaseConnection) -> Self {
        Self {
            repo: BaseRepository::new(db.clone()),
        }
    }

    pub(crate) fn db(&self) -> &DatabaseConnection {
        self.repo.connection()
    }

    /// Raw record, no relations.
    pub async fn get_by_id(&self, id: i32) -> Result<Option<E::Model>, DbErr> {
        self.repo.get_by_id(id).await
    }

    /// First record whose name equals `name` exactly, lowest id first.
    pub async fn get_by_name(&self, name: &str) -> Result<Option<E::Model>, DbErr> {
        let rows = self
            .repo
            .find(Condition::all().add(E::name_column().eq(name)))
            .await?;
        Ok(rows.into_iter().next())
    }

    pub async fn create(&mut self, mut draft: Draft<E::Model>) -> Result<bool, DbErr> {
        let at = now();
        E::set_created_on(&mut draft.model, at);
        E::set_updated_on(&mut draft.model, at);
        if !self.repo.add(draft) {
            return Ok(false);
        }
        self.repo.complete().await
    }

    /// All-or-nothing: every draft carries the same timestamp and the batch
    /// commits in one transaction.
    pub async fn create_many(&mut self, mut drafts: Vec<Draft<E::Model>>) -> Result<bool, DbErr> {
        let at = now();
        for draft in &mut drafts {
            E::set_created_on(&mut draft.model, at);
            E::set_updated_on(&mut draft.model, at);
        }
        if !self.repo.add_range(drafts) {
            return Ok(false);
        }
        self.repo.complete().await
    }

    /// Persist an already-merged record and refresh `updated_on`.
    pub async fn update(&mut self, mut model: E::Model) -> Result<bool, DbErr> {
        E::set_updated_on(&mut model, now());
        self.repo.update(model);
        self.repo.complete().await
    }

    pub async fn delete(&mut self, model: &E::Model) -> Result<bool, DbErr> {
        self.repo.remove(model);
        self.repo.complete().await
    }

    pub(crate) async fn all(&self) -> Result<Vec<E::Model>, DbErr> {
        self.repo.get_all().await
    }

    pub(crate) async fn name_matches(&self, fragment: &str) -> Result<Vec<E::Model>, DbErr> {
        self.repo.find_by_name(fragment).await
    }

    pub(crate) fn repo_mut(&mut self) -> &mut BaseRepository<E> {
        &mut self.repo
    }
}
