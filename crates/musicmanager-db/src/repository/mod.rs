//! Generic repository and unit of work over the catalog entities.
//!
//! A repository stages inserts, updates, deletes and join-row changes in
//! memory. Nothing is written until [`Repository::complete`], which applies
//! the whole batch inside one transaction.

mod link;

pub use link::{load_members, load_owners, Collection, Junction, Link, LinkChanges};

use std::marker::PhantomData;

use async_trait::async_trait;
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::sea_query::LikeExpr;
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait,
    DatabaseConnection, DbErr, EntityTrait, IntoActiveModel, Iterable, QueryFilter,
    QueryOrder, Select, TransactionTrait,
};

use crate::entities::{album, artist, genre, song};

/// Adapts an entity to the repository: identity, name and timestamps.
pub trait CatalogEntity: EntityTrait {
    fn id_column() -> Self::Column;
    fn name_column() -> Self::Column;

    fn id_of(model: &Self::Model) -> i32;
    fn name_of(model: &Self::Model) -> &str;

    fn set_created_on(model: &mut Self::Model, at: DateTimeWithTimeZone);
    fn set_updated_on(model: &mut Self::Model, at: DateTimeWithTimeZone);
}

/// A record waiting to be inserted, with the records it must be linked to
/// once it has an id.
#[derive(Clone, Debug)]
pub struct Draft<M> {
    pub model: M,
    pub links: Vec<(Link, i32)>,
}

impl<M> Draft<M> {
    pub fn new(model: M) -> Self {
        Self {
            model,
            links: Vec::new(),
        }
    }

    pub fn link(mut self, link: Link, other_id: i32) -> Self {
        self.links.push((link, other_id));
        self
    }
}

impl<M> From<M> for Draft<M> {
    fn from(model: M) -> Self {
        Self::new(model)
    }
}

#[derive(Debug)]
enum Change<M> {
    Insert(Draft<M>),
    Update(M),
    Delete(i32),
    Links(LinkChanges),
}

#[async_trait]
pub trait Repository<E: CatalogEntity>: Send + Sync {
    /// Composable query over the table, executed by the caller.
    fn list(&self) -> Select<E>;

    async fn get_by_id(&self, id: i32) -> Result<Option<E::Model>, DbErr>;

    /// Every row, ordered by id.
    async fn get_all(&self) -> Result<Vec<E::Model>, DbErr>;

    async fn find(&self, condition: Condition) -> Result<Vec<E::Model>, DbErr>;

    /// Case-sensitive substring match on the name column.
    async fn find_by_name(&self, fragment: &str) -> Result<Vec<E::Model>, DbErr>;

    /// Stage an insert. Returns false, staging nothing, for a blank name.
    fn add(&mut self, draft: Draft<E::Model>) -> bool;

    /// Stage several inserts. Returns false, staging nothing, for an empty
    /// batch or if any name is blank.
    fn add_range(&mut self, drafts: Vec<Draft<E::Model>>) -> bool;

    fn remove(&mut self, entity: &E::Model);

    fn remove_range(&mut self, entities: &[E::Model]);

    /// Stage a full-record replace keyed by id. A later update of the same id
    /// replaces the earlier one.
    fn update(&mut self, entity: E::Model);

    /// Apply every staged change in one transaction.
    ///
    /// Returns true iff at least one row was affected. On error the whole
    /// batch is rolled back. Staged changes are cleared in both cases.
    async fn complete(&mut self) -> Result<bool, DbErr>;

    /// Drop the repository and any staged changes.
    fn dispose(self)
    where
        Self: Sized;
}

pub struct BaseRepository<E: CatalogEntity> {
    db: DatabaseConnection,
    staged: Vec<Change<E::Model>>,
    entity: PhantomData<fn() -> E>,
}

pub type ArtistRepository = BaseRepository<artist::Entity>;
pub type AlbumRepository = BaseRepository<album::Entity>;
pub type SongRepository = BaseRepository<song::Entity>;
pub type GenreRepository = BaseRepository<genre::Entity>;

impl<E: CatalogEntity> BaseRepository<E> {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            staged: Vec::new(),
            entity: PhantomData,
        }
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Number of changes waiting for `complete()`.
    pub fn staged_len(&self) -> usize {
        self.staged.len()
    }

    /// Load a record together with one of its collections.
    pub async fn load_with<J>(&self, id: i32) -> Result<Option<(E::Model, Collection<J>)>, DbErr>
    where
        J: Junction<Owner = E>,
    {
        let Some(model) = E::find()
            .filter(E::id_column().eq(id))
            .one(&self.db)
            .await?
        else {
            return Ok(None);
        };
        let collection = Collection::<J>::load(&self.db, id).await?;
        Ok(Some((model, collection)))
    }

    /// Stage the owner as updated together with its collection's join-row
    /// changes.
    pub fn update_with<J>(&mut self, owner: E::Model, collection: &Collection<J>)
    where
        J: Junction<Owner = E>,
    {
        let changes = collection.changes();
        self.stage_update(owner);
        if !changes.is_empty() {
            self.staged.push(Change::Links(changes));
        }
    }

    fn stage_update(&mut self, entity: E::Model) {
        let id = E::id_of(&entity);
        self.staged
            .retain(|c| !matches!(c, Change::Update(m) if E::id_of(m) == id));
        self.staged.push(Change::Update(entity));
    }

    fn stage_delete(&mut self, id: i32) {
        let already = self
            .staged
            .iter()
            .any(|c| matches!(c, Change::Delete(staged) if *staged == id));
        if !already {
            self.staged.push(Change::Delete(id));
        }
    }
}

fn like_fragment(fragment: &str) -> LikeExpr {
    let escaped = fragment
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    LikeExpr::new(format!("%{escaped}%")).escape('\\')
}

fn has_name<E: CatalogEntity>(draft: &Draft<E::Model>) -> bool {
    !E::name_of(&draft.model).trim().is_empty()
}

#[async_trait]
impl<E> Repository<E> for BaseRepository<E>
where
    E: CatalogEntity,
    E::Model: IntoActiveModel<E::ActiveModel> + Send + Sync,
    E::ActiveModel: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send + Sync,
{
    fn list(&self) -> Select<E> {
        E::find()
    }

    async fn get_by_id(&self, id: i32) -> Result<Option<E::Model>, DbErr> {
        E::find()
            .filter(E::id_column().eq(id))
            .one(&self.db)
            .await
    }

    async fn get_all(&self) -> Result<Vec<E::Model>, DbErr> {
        E::find()
            .order_by_asc(E::id_column())
            .all(&self.db)
            .await
    }

    async fn find(&self, condition: Condition) -> Result<Vec<E::Model>, DbErr> {
        E::find()
            .filter(condition)
            .order_by_asc(E::id_column())
            .all(&self.db)
            .await
    }

    async fn find_by_name(&self, fragment: &str) -> Result<Vec<E::Model>, DbErr> {
        // LIKE is case-insensitive on some backends
        let rows = self
            .find(Condition::all().add(E::name_column().like(like_fragment(fragment))))
            .await?;
        Ok(rows
            .into_iter()
            .filter(|m| E::name_of(m).contains(fragment))
            .collect())
    }

    fn add(&mut self, draft: Draft<E::Model>) -> bool {
        if !has_name::<E>(&draft) {
            return false;
        }
        self.staged.push(Change::Insert(draft));
        true
    }

    fn add_range(&mut self, drafts: Vec<Draft<E::Model>>) -> bool {
        if drafts.is_empty() || !drafts.iter().all(has_name::<E>) {
            return false;
        }
        self.staged.extend(drafts.into_iter().map(Change::Insert));
        true
    }

    fn remove(&mut self, entity: &E::Model) {
        self.stage_delete(E::id_of(entity));
    }

    fn remove_range(&mut self, entities: &[E::Model]) {
        for entity in entities {
            self.stage_delete(E::id_of(entity));
        }
    }

    fn update(&mut self, entity: E::Model) {
        self.stage_update(entity);
    }

    async fn complete(&mut self) -> Result<bool, DbErr> {
        let staged = std::mem::take(&mut self.staged);
        if staged.is_empty() {
            return Ok(false);
        }

        let table = E::default().table_name().to_string();
        let count = staged.len();
        let txn = self.db.begin().await?;

        let mut affected = 0u64;
        for change in staged {
            match apply::<E, _>(&txn, change).await {
                Ok(n) => affected += n,
                Err(e) => {
                    tracing::warn!(table = %table, error = %e, "rolling back unit of work");
                    if let Err(rb) = txn.rollback().await {
                        tracing::error!(table = %table, error = %rb, "rollback failed");
                    }
                    return Err(e);
                }
            }
        }
        txn.commit().await?;

        tracing::debug!(table = %table, changes = count, rows = affected, "unit of work committed");
        Ok(affected > 0)
    }

    fn dispose(self) {
        if !self.staged.is_empty() {
            tracing::debug!(
                table = E::default().table_name(),
                discarded = self.staged.len(),
                "repository disposed with staged changes"
            );
        }
    }
}

async fn apply<E, C>(db: &C, change: Change<E::Model>) -> Result<u64, DbErr>
where
    E: CatalogEntity,
    E::Model: IntoActiveModel<E::ActiveModel> + Send,
    E::ActiveModel: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send,
    C: ConnectionTrait,
{
    match change {
        Change::Insert(draft) => {
            let mut am = draft.model.into_active_model();
            am.not_set(E::id_column());
            let saved = am.insert(db).await?;
            let id = E::id_of(&saved);

            let mut affected = 1;
            for (link, other_id) in draft.links {
                affected += link.attach(db, id, other_id).await?;
            }
            Ok(affected)
        }
        Change::Update(model) => {
            let id = E::id_of(&model);
            let mut am = model.into_active_model();
            for col in E::Column::iter() {
                if let Some(value) = am.get(col).into_value() {
                    am.set(col, value);
                }
            }
            am.not_set(E::id_column());

            let res = E::update_many()
                .set(am)
                .filter(E::id_column().eq(id))
                .exec(db)
                .await?;
            Ok(res.rows_affected)
        }
        Change::Delete(id) => {
            let res = E::delete_many()
                .filter(E::id_column().eq(id))
                .exec(db)
                .await?;
            Ok(res.rows_affected)
        }
        Change::Links(changes) => changes.apply(db).await,
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::entities::album_artist;
    use crate::test_support::memory_db;

    fn now() -> DateTimeWithTimeZone {
        chrono::Utc::now().fixed_offset()
    }

    pub(crate) fn artist_model(id: i32, name: &str) -> artist::Model {
        artist::Model {
            id,
            name: name.to_string(),
            gender: None,
            description: None,
            date_of_birth: None,
            country: None,
            avatar_img: None,
            created_on: now(),
            updated_on: now(),
        }
    }

    pub(crate) fn album_model(id: i32, name: &str) -> album::Model {
        album::Model {
            id,
            name: name.to_string(),
            description: None,
            avatar_img: None,
            release_date: None,
            created_on: now(),
            updated_on: now(),
        }
    }

    pub(crate) fn song_model(id: i32, name: &str) -> song::Model {
        song::Model {
            id,
            name: name.to_string(),
            description: None,
            avatar_img: None,
            lyric: None,
            release_date: None,
            created_on: now(),
            updated_on: now(),
        }
    }

    pub(crate) fn genre_model(id: i32, name: &str) -> genre::Model {
        genre::Model {
            id,
            name: name.to_string(),
            created_on: now(),
            updated_on: now(),
        }
    }

    /// Insert one record directly, bypassing the unit of work.
    pub(crate) async fn seed<E>(db: &DatabaseConnection, model: E::Model) -> E::Model
    where
        E: CatalogEntity,
        E::Model: IntoActiveModel<E::ActiveModel>,
        E::ActiveModel: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send,
    {
        let mut am = model.into_active_model();
        am.not_set(E::id_column());
        am.insert(db).await.unwrap()
    }

    #[test]
    fn test_draft_links() {
        let draft = Draft::new(album_model(0, "Kind of Blue"))
            .link(Link::AlbumArtists, 3)
            .link(Link::AlbumGenres, 5);
        assert_eq!(draft.links, vec![(Link::AlbumArtists, 3), (Link::AlbumGenres, 5)]);

        let bare: Draft<album::Model> = album_model(0, "Bare").into();
        assert!(bare.links.is_empty());
    }

    #[tokio::test]
    async fn test_add_rejects_blank_name() {
        let db = memory_db().await;
        let mut repo = ArtistRepository::new(db);
        assert!(!repo.add(Draft::new(artist_model(0, "   "))));
        assert_eq!(repo.staged_len(), 0);
        assert!(!repo.complete().await.unwrap());
    }

    #[tokio::test]
    async fn test_add_range_rejects_empty_or_blank() {
        let db = memory_db().await;
        let mut repo = GenreRepository::new(db);
        assert!(!repo.add_range(Vec::new()));
        assert!(!repo.add_range(vec![
            Draft::new(genre_model(0, "Jazz")),
            Draft::new(genre_model(0, "")),
        ]));
        assert_eq!(repo.staged_len(), 0);
    }

    #[tokio::test]
    async fn test_add_and_complete() {
        let db = memory_db().await;
        let mut repo = GenreRepository::new(db);
        assert!(repo.add_range(vec![
            Draft::new(genre_model(0, "Jazz")),
            Draft::new(genre_model(0, "Blues")),
        ]));
        assert!(repo.complete().await.unwrap());
        assert_eq!(repo.staged_len(), 0);

        let all = repo.get_all().await.unwrap();
        let names: Vec<&str> = all.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["Jazz", "Blues"]);
        assert!(all[0].id < all[1].id);
    }

    #[tokio::test]
    async fn test_complete_with_nothing_staged() {
        let db = memory_db().await;
        let mut repo = SongRepository::new(db);
        assert!(!repo.complete().await.unwrap());
    }

    #[tokio::test]
    async fn test_find_by_name_is_case_sensitive_substring() {
        let db = memory_db().await;
        for name in ["Foo Fighters", "foobar", "The Foo", "Bar"] {
            seed::<artist::Entity>(&db, artist_model(0, name)).await;
        }
        let repo = ArtistRepository::new(db);

        let hits = repo.find_by_name("Foo").await.unwrap();
        let names: Vec<&str> = hits.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["Foo Fighters", "The Foo"]);

        assert!(repo.find_by_name("Qux").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_find_by_name_treats_wildcards_literally() {
        let db = memory_db().await;
        seed::<genre::Entity>(&db, genre_model(0, "100% Hits")).await;
        seed::<genre::Entity>(&db, genre_model(0, "1000 Hits")).await;
        let repo = GenreRepository::new(db);

        let hits = repo.find_by_name("0%").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "100% Hits");
    }

    #[tokio::test]
    async fn test_update_last_write_wins() {
        let db = memory_db().await;
        let saved = seed::<song::Entity>(&db, song_model(0, "Draft")).await;
        let mut repo = SongRepository::new(db);

        let mut first = saved.clone();
        first.name = "First".into();
        let mut second = saved.clone();
        second.name = "Second".into();
        second.lyric = Some("la la".into());
        repo.update(first);
        repo.update(second);
        assert_eq!(repo.staged_len(), 1);

        assert!(repo.complete().await.unwrap());
        let reloaded = repo.get_by_id(saved.id).await.unwrap().unwrap();
        assert_eq!(reloaded.name, "Second");
        assert_eq!(reloaded.lyric.as_deref(), Some("la la"));
    }

    #[tokio::test]
    async fn test_remove_and_remove_range() {
        let db = memory_db().await;
        let a = seed::<genre::Entity>(&db, genre_model(0, "A")).await;
        let b = seed::<genre::Entity>(&db, genre_model(0, "B")).await;
        let c = seed::<genre::Entity>(&db, genre_model(0, "C")).await;
        let mut repo = GenreRepository::new(db);

        repo.remove(&a);
        repo.remove_range(&[a.clone(), b.clone()]);
        assert_eq!(repo.staged_len(), 2);
        assert!(repo.complete().await.unwrap());

        let left: Vec<i32> = repo.get_all().await.unwrap().iter().map(|g| g.id).collect();
        assert_eq!(left, vec![c.id]);
    }

    #[tokio::test]
    async fn test_remove_missing_reports_no_rows() {
        let db = memory_db().await;
        let mut repo = GenreRepository::new(db);
        repo.remove(&genre_model(404, "Ghost"));
        assert!(!repo.complete().await.unwrap());
    }

    #[tokio::test]
    async fn test_insert_with_links() {
        let db = memory_db().await;
        let artist = seed::<artist::Entity>(&db, artist_model(0, "Miles")).await;
        let mut repo = AlbumRepository::new(db);

        let draft = Draft::new(album_model(0, "Kind of Blue")).link(Link::AlbumArtists, artist.id);
        assert!(repo.add(draft));
        assert!(repo.complete().await.unwrap());

        let album = repo.get_all().await.unwrap().remove(0);
        let (_, artists) = repo
            .load_with::<album_artist::Entity>(album.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(artists.iter().map(|a| a.id).collect::<Vec<_>>(), vec![artist.id]);
    }

    #[tokio::test]
    async fn test_failed_batch_rolls_back() {
        let db = memory_db().await;
        let mut repo = AlbumRepository::new(db);

        assert!(repo.add_range(vec![
            Draft::new(album_model(0, "Fine")),
            Draft::new(album_model(0, "Broken")).link(Link::AlbumArtists, 999),
        ]));
        assert!(repo.complete().await.is_err());
        assert_eq!(repo.staged_len(), 0);
        assert!(repo.get_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_with_collection() {
        let db = memory_db().await;
        let album = seed::<album::Entity>(&db, album_model(0, "Mix")).await;
        let x = seed::<artist::Entity>(&db, artist_model(0, "X")).await;
        let y = seed::<artist::Entity>(&db, artist_model(0, "Y")).await;
        let mut repo = AlbumRepository::new(db);

        let (owner, mut artists) = repo
            .load_with::<album_artist::Entity>(album.id)
            .await
            .unwrap()
            .unwrap();
        artists.add(x.clone());
        artists.add(y.clone());
        repo.update_with(owner, &artists);
        assert!(repo.complete().await.unwrap());

        let (owner, mut artists) = repo
            .load_with::<album_artist::Entity>(album.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(artists.len(), 2);
        assert!(artists.remove(x.id));
        repo.update_with(owner, &artists);
        assert!(repo.complete().await.unwrap());

        let (_, artists) = repo
            .load_with::<album_artist::Entity>(album.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(artists.iter().map(|a| a.id).collect::<Vec<_>>(), vec![y.id]);
    }

    #[tokio::test]
    async fn test_load_with_missing_owner() {
        let db = memory_db().await;
        let repo = AlbumRepository::new(db);
        assert!(repo
            .load_with::<album_artist::Entity>(1)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_list_is_composable() {
        let db = memory_db().await;
        seed::<genre::Entity>(&db, genre_model(0, "B")).await;
        seed::<genre::Entity>(&db, genre_model(0, "A")).await;
        let repo = GenreRepository::new(db);

        let sorted = repo
            .list()
            .order_by_asc(genre::Column::Name)
            .all(repo.connection())
            .await
            .unwrap();
        assert_eq!(sorted[0].name, "A");
    }

    #[tokio::test]
    async fn test_dispose_discards_staged() {
        let db = memory_db().await;
        let mut repo = GenreRepository::new(db.clone());
        repo.add(Draft::new(genre_model(0, "Lost")));
        repo.dispose();

        let repo = GenreRepository::new(db);
        assert!(repo.get_all().await.unwrap().is_empty());
    }
}
