//! Tags Repository

use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};
use tracing::debug;
use uuid::Uuid;

use super::{
    Taggable,
    records::{Tag, TagUuid},
};

const SYNC_TAGS_SQL: &str = include_str!("sql/sync_tags.sql");
const CREATE_TAGGABLES_SQL: &str = include_str!("sql/create_taggables.sql");
const DELETE_TAGGABLES_SQL: &str = include_str!("sql/delete_taggables.sql");
const LIST_TAGS_SQL: &str = include_str!("sql/list_tags.sql");
const LIST_TAG_NAMES_FOR_SQL: &str = include_str!("sql/list_tag_names_for.sql");

pub(crate) type TagNames = SmallVec<[String; 3]>;

#[derive(Debug, Clone, Default)]
pub(crate) struct PgTagsRepository;

impl PgTagsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn list_tags(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<Tag>, sqlx::Error> {
        query_as::<Postgres, Tag>(LIST_TAGS_SQL)
            .fetch_all(&mut **tx)
            .await
    }

    /// Find or create a tag for every name, keyed by name.
    #[tracing::instrument(
        name = "tags.repository.sync_tags",
        skip(self, tx, names),
        fields(
            names_count = names.len(),
            synced_tag_count = tracing::field::Empty
        ),
        err
    )]
    pub(crate) async fn sync_tags(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        names: &[&str],
    ) -> Result<FxHashMap<String, TagUuid>, sqlx::Error> {
        let mut unique: SmallVec<[&str; 5]> = names
            .iter()
            .map(|name| name.trim())
            .filter(|name| !name.is_empty())
            .collect();

        unique.sort_unstable();
        unique.dedup();

        if unique.is_empty() {
            return Ok(FxHashMap::default());
        }

        let new_uuids: Vec<Uuid> = unique.iter().map(|_| Uuid::now_v7()).collect();
        let names_vec: Vec<String> = unique.iter().map(|s| (*s).to_owned()).collect();

        let rows: Vec<(Uuid, String)> = query_as(SYNC_TAGS_SQL)
            .bind(&new_uuids)
            .bind(&names_vec)
            .fetch_all(&mut **tx)
            .await?;

        let tag_map: FxHashMap<String, TagUuid> = rows
            .into_iter()
            .map(|(uuid, name)| (name, TagUuid::from_uuid(uuid)))
            .collect();

        let synced_tag_count = tag_map.len();

        tracing::Span::current().record("synced_tag_count", synced_tag_count);

        debug!(synced_tag_count, "synchronized tags");

        Ok(tag_map)
    }

    pub(crate) async fn create_taggables<T>(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        pairs: &[(TagUuid, T)],
    ) -> Result<(), sqlx::Error>
    where
        T: Taggable + Copy + Into<Uuid>,
    {
        if pairs.is_empty() {
            return Ok(());
        }

        let (tag_uuids, taggable_uuids): (Vec<Uuid>, Vec<Uuid>) = pairs
            .iter()
            .map(|(tag, taggable)| (tag.into_uuid(), (*taggable).into()))
            .unzip();

        query(CREATE_TAGGABLES_SQL)
            .bind(&tag_uuids)
            .bind(&taggable_uuids)
            .bind(T::KIND)
            .execute(&mut **tx)
            .await?;

        debug!(
            pair_count = pairs.len(),
            taggable_type = T::KIND,
            "created taggables"
        );

        Ok(())
    }

    pub(crate) async fn delete_taggables<T>(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        taggables: &[T],
    ) -> Result<u64, sqlx::Error>
    where
        T: Taggable + Copy + Into<Uuid>,
    {
        if taggables.is_empty() {
            return Ok(0);
        }

        let uuids: Vec<Uuid> = taggables.iter().copied().map(Into::into).collect();

        let result = query(DELETE_TAGGABLES_SQL)
            .bind(T::KIND)
            .bind(&uuids)
            .execute(&mut **tx)
            .await?;

        Ok(result.rows_affected())
    }

    /// Replace the tag set of one taggable with `names`.
    #[tracing::instrument(
        name = "tags.repository.replace_tags",
        skip(self, tx, taggable, names),
        fields(taggable_type = T::KIND),
        err
    )]
    pub(crate) async fn replace_tags<T>(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        taggable: T,
        names: &[String],
    ) -> Result<(), sqlx::Error>
    where
        T: Taggable + Copy + Into<Uuid>,
    {
        self.delete_taggables(tx, &[taggable]).await?;

        let borrowed: SmallVec<[&str; 5]> = names.iter().map(String::as_str).collect();
        let tag_map = self.sync_tags(tx, &borrowed).await?;

        let pairs: SmallVec<[(TagUuid, T); 5]> =
            tag_map.values().map(|tag| (*tag, taggable)).collect();

        self.create_taggables(tx, &pairs).await
    }

    /// Tag names for each taggable, sorted by name. Taggables without tags
    /// are absent from the map.
    pub(crate) async fn list_tag_names_for<T>(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        taggables: &[T],
    ) -> Result<FxHashMap<T, TagNames>, sqlx::Error>
    where
        T: Taggable + Copy + Eq + std::hash::Hash + From<Uuid> + Into<Uuid>,
    {
        let mut names: FxHashMap<T, TagNames> = FxHashMap::default();

        if taggables.is_empty() {
            return Ok(names);
        }

        let uuids: Vec<Uuid> = taggables.iter().copied().map(Into::into).collect();

        let rows: Vec<(Uuid, String)> = query_as(LIST_TAG_NAMES_FOR_SQL)
            .bind(T::KIND)
            .bind(&uuids)
            .fetch_all(&mut **tx)
            .await?;

        for (uuid, name) in rows {
            names.entry(T::from(uuid)).or_default().push(name);
        }

        Ok(names)
    }
}

impl<'r> FromRow<'r, PgRow> for Tag {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: TagUuid::from_uuid(row.try_get("uuid")?),
            name: row.try_get("name")?,
        })
    }
}
