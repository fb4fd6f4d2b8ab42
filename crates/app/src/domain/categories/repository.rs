//! Categories Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};
use uuid::Uuid;

use crate::domain::categories::models::{Category, CategoryUuid, NewCategory};

const LIST_CATEGORIES_SQL: &str = include_str!("sql/list_categories.sql");
const LIST_CATEGORY_LINKS_SQL: &str = include_str!("sql/list_category_links.sql");
const CREATE_CATEGORY_SQL: &str = include_str!("sql/create_category.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCategoriesRepository;

impl PgCategoriesRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn list_categories(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<Category>, sqlx::Error> {
        query_as::<Postgres, Category>(LIST_CATEGORIES_SQL)
            .fetch_all(&mut **tx)
            .await
    }

    /// Every `(category, parent)` pair.
    pub(crate) async fn list_category_links(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<(CategoryUuid, Option<CategoryUuid>)>, sqlx::Error> {
        let rows: Vec<(Uuid, Option<Uuid>)> = query_as(LIST_CATEGORY_LINKS_SQL)
            .fetch_all(&mut **tx)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(uuid, parent)| {
                (
                    CategoryUuid::from_uuid(uuid),
                    parent.map(CategoryUuid::from_uuid),
                )
            })
            .collect())
    }

    pub(crate) async fn create_category(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        category: &NewCategory,
    ) -> Result<Category, sqlx::Error> {
        query_as::<Postgres, Category>(CREATE_CATEGORY_SQL)
            .bind(category.uuid.into_uuid())
            .bind(category.parent_uuid.map(CategoryUuid::into_uuid))
            .bind(&category.title)
            .bind(category.image_src.as_deref())
            .fetch_one(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for Category {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: CategoryUuid::from_uuid(row.try_get("uuid")?),
            parent_uuid: row
                .try_get::<Option<Uuid>, _>("parent_uuid")?
                .map(CategoryUuid::from_uuid),
            title: row.try_get("title")?,
            image_src: row.try_get("image_src")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
        })
    }
}
