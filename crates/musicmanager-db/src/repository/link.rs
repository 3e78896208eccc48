//! Many-to-many links between catalog records.
//!
//! Every join table implements [`Junction`]. A [`Collection`] is one owner's
//! side of a join table loaded into memory; mutating it records the rows to
//! insert and the rows to delete, which the repository then applies inside
//! its unit of work.

use std::collections::HashMap;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, IntoActiveModel,
    QueryFilter, QueryOrder,
};

use super::CatalogEntity;
use crate::entities::{album_artist, album_genre, album_song, song_artist, song_genre};

/// A join table between an owner record and its members.
pub trait Junction: EntityTrait {
    type Owner: CatalogEntity;
    type Member: CatalogEntity;

    /// Link used when this table is mutated from the owner side.
    const LINK: Link;

    fn row_id_column() -> Self::Column;
    fn owner_column() -> Self::Column;
    fn member_column() -> Self::Column;

    fn row_id(row: &Self::Model) -> i32;
    fn owner_id(row: &Self::Model) -> i32;
    fn member_id(row: &Self::Model) -> i32;

    /// New join row, id left to the database.
    fn row(owner_id: i32, member_id: i32) -> Self::ActiveModel;
}

/// Named relationship a record can be linked through.
///
/// The first half of the name is the record being written, the second half
/// the record it points at. `SongAlbums` writes `album_songs` from the song
/// side.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Link {
    AlbumArtists,
    AlbumSongs,
    AlbumGenres,
    SongArtists,
    SongGenres,
    SongAlbums,
}

impl Link {
    pub fn table(self) -> &'static str {
        match self {
            Link::AlbumArtists => "album_artists",
            Link::AlbumSongs | Link::SongAlbums => "album_songs",
            Link::AlbumGenres => "album_genres",
            Link::SongArtists => "song_artists",
            Link::SongGenres => "song_genres",
        }
    }

    /// Insert one join row between `record_id` and `other_id`.
    pub(crate) async fn attach<C: ConnectionTrait>(
        self,
        db: &C,
        record_id: i32,
        other_id: i32,
    ) -> Result<u64, DbErr> {
        match self {
            Link::AlbumArtists => insert_row::<album_artist::Entity, _>(db, record_id, other_id).await,
            Link::AlbumSongs => insert_row::<album_song::Entity, _>(db, record_id, other_id).await,
            Link::AlbumGenres => insert_row::<album_genre::Entity, _>(db, record_id, other_id).await,
            Link::SongArtists => insert_row::<song_artist::Entity, _>(db, record_id, other_id).await,
            Link::SongGenres => insert_row::<song_genre::Entity, _>(db, record_id, other_id).await,
            Link::SongAlbums => insert_row::<album_song::Entity, _>(db, other_id, record_id).await,
        }
    }

    /// Delete one join row by its own id.
    pub(crate) async fn detach<C: ConnectionTrait>(self, db: &C, row_id: i32) -> Result<u64, DbErr> {
        match self {
            Link::AlbumArtists => delete_row::<album_artist::Entity, _>(db, row_id).await,
            Link::AlbumSongs | Link::SongAlbums => delete_row::<album_song::Entity, _>(db, row_id).await,
            Link::AlbumGenres => delete_row::<album_genre::Entity, _>(db, row_id).await,
            Link::SongArtists => delete_row::<song_artist::Entity, _>(db, row_id).await,
            Link::SongGenres => delete_row::<song_genre::Entity, _>(db, row_id).await,
        }
    }
}

async fn insert_row<J, C>(db: &C, owner_id: i32, member_id: i32) -> Result<u64, DbErr>
where
    J: Junction,
    J::Model: IntoActiveModel<J::ActiveModel>,
    J::ActiveModel: ActiveModelTrait<Entity = J> + Send,
    C: ConnectionTrait,
{
    J::insert(J::row(owner_id, member_id))
        .exec_without_returning(db)
        .await
}

async fn delete_row<J, C>(db: &C, row_id: i32) -> Result<u64, DbErr>
where
    J: Junction,
    C: ConnectionTrait,
{
    let res = J::delete_many()
        .filter(J::row_id_column().eq(row_id))
        .exec(db)
        .await?;
    Ok(res.rows_affected)
}

/// Join rows staged by a [`Collection`], applied by `complete()`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LinkChanges {
    pub link: Link,
    pub owner_id: i32,
    pub attach: Vec<i32>,
    pub detach: Vec<i32>,
}

impl LinkChanges {
    pub fn is_empty(&self) -> bool {
        self.attach.is_empty() && self.detach.is_empty()
    }

    pub(crate) async fn apply<C: ConnectionTrait>(self, db: &C) -> Result<u64, DbErr> {
        let mut affected = 0;
        for row_id in self.detach {
            affected += self.link.detach(db, row_id).await?;
        }
        for member_id in self.attach {
            affected += self.link.attach(db, self.owner_id, member_id).await?;
        }
        Ok(affected)
    }
}

type MemberModel<J> = <<J as Junction>::Member as EntityTrait>::Model;
type OwnerModel<J> = <<J as Junction>::Owner as EntityTrait>::Model;

#[derive(Clone, Debug)]
struct Entry<M> {
    /// `None` until the join row is written.
    row_id: Option<i32>,
    model: M,
}

/// One owner's members through a join table.
///
/// Order follows join-row insertion order. The same member may appear more
/// than once, one entry per join row.
pub struct Collection<J: Junction> {
    owner_id: i32,
    entries: Vec<Entry<MemberModel<J>>>,
    detached: Vec<i32>,
}

impl<J: Junction> Collection<J> {
    /// Empty collection, as for an owner that has no join rows yet.
    pub fn empty(owner_id: i32) -> Self {
        Self {
            owner_id,
            entries: Vec::new(),
            detached: Vec::new(),
        }
    }

    /// Load the join rows of `owner_id` and their member records.
    pub async fn load<C: ConnectionTrait>(db: &C, owner_id: i32) -> Result<Self, DbErr> {
        let rows = J::find()
            .filter(J::owner_column().eq(owner_id))
            .order_by_asc(J::row_id_column())
            .all(db)
            .await?;

        let member_ids: Vec<i32> = rows.iter().map(J::member_id).collect();
        let members = fetch_by_ids::<J::Member, C>(db, &member_ids).await?;

        let entries = rows
            .iter()
            .filter_map(|row| {
                members.get(&J::member_id(row)).map(|m| Entry {
                    row_id: Some(J::row_id(row)),
                    model: m.clone(),
                })
            })
            .collect();

        Ok(Self {
            owner_id,
            entries,
            detached: Vec::new(),
        })
    }

    pub fn owner_id(&self) -> i32 {
        self.owner_id
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MemberModel<J>> {
        self.entries.iter().map(|e| &e.model)
    }

    pub fn contains(&self, member_id: i32) -> bool {
        self.entries
            .iter()
            .any(|e| <J::Member as CatalogEntity>::id_of(&e.model) == member_id)
    }

    /// Append a member. An existing membership is not checked.
    pub fn add(&mut self, member: MemberModel<J>) {
        self.entries.push(Entry {
            row_id: None,
            model: member,
        });
    }

    /// Drop the first entry for `member_id`. Returns false if there was none.
    pub fn remove(&mut self, member_id: i32) -> bool {
        let Some(pos) = self
            .entries
            .iter()
            .position(|e| <J::Member as CatalogEntity>::id_of(&e.model) == member_id)
        else {
            return false;
        };
        let entry = self.entries.remove(pos);
        if let Some(row_id) = entry.row_id {
            self.detached.push(row_id);
        }
        true
    }

    /// Join rows to write and delete so the table matches this collection.
    pub fn changes(&self) -> LinkChanges {
        LinkChanges {
            link: J::LINK,
            owner_id: self.owner_id,
            attach: self
                .entries
                .iter()
                .filter(|e| e.row_id.is_none())
                .map(|e| <J::Member as CatalogEntity>::id_of(&e.model))
                .collect(),
            detach: self.detached.clone(),
        }
    }
}

/// Upper bound on ids bound into one `IN (...)` list. SQLite allows 32766
/// variables per statement and Postgres 65535.
const IN_CHUNK: usize = 1000;

async fn fetch_by_ids<E, C>(db: &C, ids: &[i32]) -> Result<HashMap<i32, E::Model>, DbErr>
where
    E: CatalogEntity,
    C: ConnectionTrait,
{
    let mut unique = ids.to_vec();
    unique.sort_unstable();
    unique.dedup();

    let mut found = HashMap::with_capacity(unique.len());
    for chunk in unique.chunks(IN_CHUNK) {
        let rows = E::find()
            .filter(E::id_column().is_in(chunk.iter().copied()))
            .all(db)
            .await?;
        found.extend(rows.into_iter().map(|m| (E::id_of(&m), m)));
    }
    Ok(found)
}

/// Join rows whose `column` is one of `ids`, in row-id order within each chunk.
async fn join_rows<J, C>(
    db: &C,
    column: J::Column,
    ids: &[i32],
) -> Result<Vec<J::Model>, DbErr>
where
    J: Junction,
    C: ConnectionTrait,
{
    let mut rows = Vec::new();
    for chunk in ids.chunks(IN_CHUNK) {
        let batch = J::find()
            .filter(column.is_in(chunk.iter().copied()))
            .order_by_asc(J::row_id_column())
            .all(db)
            .await?;
        rows.extend(batch);
    }
    Ok(rows)
}

/// Members of every owner in `owner_ids`, keyed by owner id.
///
/// Ids are bound in chunks, so the number of queries grows with the number
/// of owners but never with the size of a single statement.
pub async fn load_members<J, C>(
    db: &C,
    owner_ids: &[i32],
) -> Result<HashMap<i32, Vec<MemberModel<J>>>, DbErr>
where
    J: Junction,
    C: ConnectionTrait,
{
    if owner_ids.is_empty() {
        return Ok(HashMap::new());
    }
    let rows = join_rows::<J, C>(db, J::owner_column(), owner_ids).await?;

    let member_ids: Vec<i32> = rows.iter().map(J::member_id).collect();
    let members = fetch_by_ids::<J::Member, C>(db, &member_ids).await?;

    let mut grouped: HashMap<i32, Vec<MemberModel<J>>> = HashMap::new();
    for row in &rows {
        if let Some(m) = members.get(&J::member_id(row)) {
            grouped.entry(J::owner_id(row)).or_default().push(m.clone());
        }
    }
    Ok(grouped)
}

/// Owners of every member in `member_ids`, keyed by member id.
pub async fn load_owners<J, C>(
    db: &C,
    member_ids: &[i32],
) -> Result<HashMap<i32, Vec<OwnerModel<J>>>, DbErr>
where
    J: Junction,
    C: ConnectionTrait,
{
    if member_ids.is_empty() {
        return Ok(HashMap::new());
    }
    let rows = join_rows::<J, C>(db, J::member_column(), member_ids).await?;

    let owner_ids: Vec<i32> = rows.iter().map(J::owner_id).collect();
    let owners = fetch_by_ids::<J::Owner, C>(db, &owner_ids).await?;

    let mut grouped: HashMap<i32, Vec<OwnerModel<J>>> = HashMap::new();
    for row in &rows {
        if let Some(o) = owners.get(&J::owner_id(row)) {
            grouped.entry(J::member_id(row)).or_default().push(o.clone());
        }
    }
    Ok(grouped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{album, artist, genre, song};
    use crate::repository::tests::{album_model, artist_model, genre_model, seed, song_model};
    use crate::test_support::memory_db;

    #[test]
    fn test_link_tables() {
        assert_eq!(Link::AlbumSongs.table(), "album_songs");
        assert_eq!(Link::SongAlbums.table(), "album_songs");
        assert_eq!(Link::SongGenres.table(), "song_genres");
    }

    #[test]
    fn test_collection_bookkeeping() {
        let mut songs: Collection<album_song::Entity> = Collection::empty(1);
        songs.add(song_model(7, "Intro"));
        songs.add(song_model(7, "Intro"));
        songs.add(song_model(9, "Outro"));
        assert_eq!(songs.len(), 3);

        assert!(songs.remove(7));
        assert!(!songs.remove(42));
        assert_eq!(songs.len(), 2);
        assert!(songs.contains(7));

        // Unsaved entries leave nothing to delete
        let changes = songs.changes();
        assert_eq!(changes.link, Link::AlbumSongs);
        assert_eq!(changes.owner_id, 1);
        assert_eq!(changes.attach, vec![7, 9]);
        assert!(changes.detach.is_empty());
    }

    #[test]
    fn test_empty_changes() {
        let genres: Collection<song_genre::Entity> = Collection::empty(3);
        assert!(genres.is_empty());
        assert!(genres.changes().is_empty());
    }

    #[tokio::test]
    async fn test_attach_load_and_detach() {
        let db = memory_db().await;
        let a = seed::<album::Entity>(&db, album_model(0, "Blue")).await;
        let s1 = seed::<song::Entity>(&db, song_model(0, "One")).await;
        let s2 = seed::<song::Entity>(&db, song_model(0, "Two")).await;

        assert_eq!(Link::AlbumSongs.attach(&db, a.id, s1.id).await.unwrap(), 1);
        assert_eq!(Link::SongAlbums.attach(&db, s2.id, a.id).await.unwrap(), 1);

        let songs = Collection::<album_song::Entity>::load(&db, a.id).await.unwrap();
        let names: Vec<&str> = songs.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["One", "Two"]);

        let mut songs = songs;
        assert!(songs.remove(s1.id));
        let changes = songs.changes();
        assert_eq!(changes.detach.len(), 1);
        assert_eq!(changes.apply(&db).await.unwrap(), 1);

        let reloaded = Collection::<album_song::Entity>::load(&db, a.id).await.unwrap();
        assert_eq!(reloaded.len(), 1);
        assert!(reloaded.contains(s2.id));
    }

    #[tokio::test]
    async fn test_load_members_and_owners_grouped() {
        let db = memory_db().await;
        let x = seed::<artist::Entity>(&db, artist_model(0, "X")).await;
        let y = seed::<artist::Entity>(&db, artist_model(0, "Y")).await;
        let s1 = seed::<song::Entity>(&db, song_model(0, "A")).await;
        let s2 = seed::<song::Entity>(&db, song_model(0, "B")).await;
        let rock = seed::<genre::Entity>(&db, genre_model(0, "Rock")).await;

        Link::SongArtists.attach(&db, s1.id, x.id).await.unwrap();
        Link::SongArtists.attach(&db, s1.id, y.id).await.unwrap();
        Link::SongArtists.attach(&db, s2.id, x.id).await.unwrap();
        Link::SongGenres.attach(&db, s2.id, rock.id).await.unwrap();

        let artists = load_members::<song_artist::Entity, _>(&db, &[s1.id, s2.id])
            .await
            .unwrap();
        assert_eq!(artists[&s1.id].len(), 2);
        assert_eq!(artists[&s2.id][0].name, "X");

        let genres = load_members::<song_genre::Entity, _>(&db, &[s1.id, s2.id])
            .await
            .unwrap();
        assert!(!genres.contains_key(&s1.id));
        assert_eq!(genres[&s2.id][0].name, "Rock");

        let songs_by_artist = load_owners::<song_artist::Entity, _>(&db, &[x.id])
            .await
            .unwrap();
        assert_eq!(songs_by_artist[&x.id].len(), 2);
    }

    #[tokio::test]
    async fn test_load_members_with_no_owners() {
        let db = memory_db().await;
        let map = load_members::<album_genre::Entity, _>(&db, &[]).await.unwrap();
        assert!(map.is_empty());
    }

    #[tokio::test]
    async fn test_load_past_statement_variable_limit() {
        const N: i32 = 33_000;
        let db = memory_db().await;
        let first = seed::<album::Entity>(&db, album_model(0, "First")).await;
        let rock = seed::<genre::Entity>(&db, genre_model(0, "Rock")).await;

        // Copy the seeded timestamps so every generated row decodes.
        db.execute_unprepared(&format!(
            "WITH RECURSIVE n(x) AS (SELECT 1 UNION ALL SELECT x + 1 FROM n WHERE x < {N}) \
             INSERT INTO albums (name, created_on, updated_on) \
             SELECT 'Album ' || x, a.created_on, a.updated_on FROM n, albums a WHERE a.id = {}",
            first.id
        ))
        .await
        .unwrap();
        db.execute_unprepared(&format!(
            "WITH RECURSIVE n(x) AS (SELECT 1 UNION ALL SELECT x + 1 FROM n WHERE x < {N}) \
             INSERT INTO genres (name, created_on, updated_on) \
             SELECT 'Genre ' || x, g.created_on, g.updated_on FROM n, genres g WHERE g.id = {}",
            rock.id
        ))
        .await
        .unwrap();
        db.execute_unprepared(&format!(
            "INSERT INTO album_genres (album_id, genre_id) SELECT id, {} FROM albums",
            rock.id
        ))
        .await
        .unwrap();
        db.execute_unprepared(&format!(
            "INSERT INTO album_genres (album_id, genre_id) \
             SELECT {}, id FROM genres WHERE id <> {}",
            first.id, rock.id
        ))
        .await
        .unwrap();

        let album_ids: Vec<i32> = (1..=N + 1).collect();
        let genres = load_members::<album_genre::Entity, _>(&db, &album_ids)
            .await
            .unwrap();
        assert_eq!(genres.len(), (N + 1) as usize);
        assert_eq!(genres[&first.id].len(), (N + 1) as usize);
        assert_eq!(genres[&first.id][0].name, "Rock");
        assert_eq!(genres[&(N + 1)][0].name, "Rock");

        let albums = load_owners::<album_genre::Entity, _>(&db, &[rock.id])
            .await
            .unwrap();
        assert_eq!(albums[&rock.id].len(), (N + 1) as usize);
        assert_eq!(albums[&rock.id][0].name, "First");
    }
}
