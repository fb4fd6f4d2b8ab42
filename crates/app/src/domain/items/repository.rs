//! Items Repository

use jiff::civil::Date;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};
use uuid::Uuid;

use crate::{
    database::{amount_to_i64, try_get_amount, try_get_count, try_get_optional_percent, try_get_percent},
    domain::{
        categories::models::CategoryUuid,
        items::{
            models::{Item, ItemImage, ItemUuid, NewItem, NewReview, Review, ReviewUuid, Specification},
            query::{CatalogQuery, banner_query, catalog_query, item_query, limited_query, popular_query},
        },
    },
};

const CREATE_ITEM_SQL: &str = include_str!("sql/create_item.sql");
const CREATE_ITEM_IMAGES_SQL: &str = include_str!("sql/create_item_images.sql");
const CREATE_ITEM_SPECIFICATIONS_SQL: &str = include_str!("sql/create_item_specifications.sql");
const LIST_ITEM_IMAGES_SQL: &str = include_str!("sql/list_item_images.sql");
const LIST_ITEM_SPECIFICATIONS_SQL: &str = include_str!("sql/list_item_specifications.sql");
const CREATE_REVIEW_SQL: &str = include_str!("sql/create_review.sql");
const LIST_REVIEWS_SQL: &str = include_str!("sql/list_reviews.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgItemsRepository;

impl PgItemsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn list_catalog(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        catalog: &CatalogQuery,
        categories: Option<&[CategoryUuid]>,
        on: Date,
    ) -> Result<Vec<Item>, sqlx::Error> {
        catalog_query(catalog, categories, on)
            .build_query_as::<Item>()
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn get_item(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        item: ItemUuid,
        on: Date,
    ) -> Result<Item, sqlx::Error> {
        item_query(item, on)
            .build_query_as::<Item>()
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn popular_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        on: Date,
    ) -> Result<Vec<Item>, sqlx::Error> {
        popular_query(on)
            .build_query_as::<Item>()
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn limited_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        on: Date,
    ) -> Result<Vec<Item>, sqlx::Error> {
        limited_query(on)
            .build_query_as::<Item>()
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn banner_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        on: Date,
    ) -> Result<Vec<Item>, sqlx::Error> {
        banner_query(on)
            .build_query_as::<Item>()
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn create_item(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        item: &NewItem,
    ) -> Result<(), sqlx::Error> {
        let count = i32::try_from(item.count).map_err(|e| sqlx::Error::Encode(Box::new(e)))?;

        query(CREATE_ITEM_SQL)
            .bind(item.uuid.into_uuid())
            .bind(item.category_uuid.map(CategoryUuid::into_uuid))
            .bind(&item.name)
            .bind(&item.description)
            .bind(amount_to_i64(item.price)?)
            .bind(count)
            .bind(i16::from(item.discount))
            .bind(item.available)
            .bind(item.free_delivery)
            .execute(&mut **tx)
            .await?;

        let (srcs, descriptions): (Vec<&str>, Vec<&str>) = item
            .images
            .iter()
            .map(|image| (image.src.as_str(), image.description.as_str()))
            .unzip();

        query(CREATE_ITEM_IMAGES_SQL)
            .bind(item.uuid.into_uuid())
            .bind(srcs)
            .bind(descriptions)
            .execute(&mut **tx)
            .await?;

        let (names, values): (Vec<&str>, Vec<&str>) = item
            .specifications
            .iter()
            .map(|spec| (spec.name.as_str(), spec.value.as_str()))
            .unzip();

        query(CREATE_ITEM_SPECIFICATIONS_SQL)
            .bind(item.uuid.into_uuid())
            .bind(names)
            .bind(values)
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    /// Images of the given items, keyed by item and in display order.
    pub(crate) async fn list_images(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        items: &[ItemUuid],
    ) -> Result<Vec<(ItemUuid, ItemImage)>, sqlx::Error> {
        let uuids: Vec<Uuid> = items.iter().map(|item| item.into_uuid()).collect();

        let rows = query(LIST_ITEM_IMAGES_SQL)
            .bind(uuids)
            .fetch_all(&mut **tx)
            .await?;

        rows.iter()
            .map(|row| {
                Ok((
                    ItemUuid::from_uuid(row.try_get("item_uuid")?),
                    ItemImage {
                        src: row.try_get("src")?,
                        description: row.try_get("description")?,
                    },
                ))
            })
            .collect()
    }

    pub(crate) async fn list_specifications(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        item: ItemUuid,
    ) -> Result<Vec<Specification>, sqlx::Error> {
        query_as::<Postgres, Specification>(LIST_ITEM_SPECIFICATIONS_SQL)
            .bind(item.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn list_reviews(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        item: ItemUuid,
    ) -> Result<Vec<Review>, sqlx::Error> {
        query_as::<Postgres, Review>(LIST_REVIEWS_SQL)
            .bind(item.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn create_review(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        review: &NewReview,
    ) -> Result<Review, sqlx::Error> {
        query_as::<Postgres, Review>(CREATE_REVIEW_SQL)
            .bind(review.uuid.into_uuid())
            .bind(review.item_uuid.into_uuid())
            .bind(&review.author)
            .bind(&review.email)
            .bind(&review.text)
            .bind(i16::from(review.rate))
            .fetch_one(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for Item {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: ItemUuid::from_uuid(row.try_get("uuid")?),
            category_uuid: row
                .try_get::<Option<Uuid>, _>("category_uuid")?
                .map(CategoryUuid::from_uuid),
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            price: try_get_amount(row, "price")?,
            count: try_get_count(row, "count")?,
            discount: try_get_percent(row, "discount")?,
            available: row.try_get("available")?,
            free_delivery: row.try_get("free_delivery")?,
            archived: row.try_get("archived")?,
            rating_sum: try_get_amount(row, "rating_sum")?,
            feedback_count: try_get_count(row, "feedback_count")?,
            sale_discount: try_get_optional_percent(row, "sale_discount")?,
            tags: Vec::new(),
            images: Vec::new(),
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for Review {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: ReviewUuid::from_uuid(row.try_get("uuid")?),
            item_uuid: ItemUuid::from_uuid(row.try_get("item_uuid")?),
            author: row.try_get("author")?,
            email: row.try_get("email")?,
            text: row.try_get("text")?,
            rate: try_get_percent(row, "rate")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for Specification {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            name: row.try_get("name")?,
            value: row.try_get("value")?,
        })
    }
}
