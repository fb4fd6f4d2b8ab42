//! Catalog queries.
//!
//! Every item read goes through [`push_item_select`] so list and detail
//! queries share the review aggregates and the running sale discount.

use std::str::FromStr;

use jiff::civil::Date;
use jiff_sqlx::Date as SqlxDate;
use serde::{Deserialize, Serialize};
use sqlx::{Postgres, QueryBuilder};
use thiserror::Error;

use crate::domain::{
    categories::models::CategoryUuid,
    items::models::{Item, ItemUuid},
    tags::Taggable,
};

/// Average review rate below which an item is not popular.
pub const POPULAR_MIN_RATING: &str = "2.5";

/// Number of items returned as popular.
pub const POPULAR_LIMIT: i64 = 10;

/// Stock count below which an item is limited.
pub const LIMITED_STOCK_BELOW: i32 = 5;

const ITEM_COLUMNS_SQL: &str = "SELECT
    items.uuid,
    items.category_uuid,
    items.name,
    items.description,
    items.price,
    items.count,
    items.discount,
    items.available,
    items.free_delivery,
    items.archived,
    items.created_at,
    items.updated_at,
    COALESCE(reviews.rating_sum, 0) AS rating_sum,
    COALESCE(reviews.feedback_count, 0) AS feedback_count,
    running_sale.discount AS sale_discount
FROM items
LEFT JOIN LATERAL (
    SELECT SUM(feedbacks.rate)::bigint AS rating_sum, COUNT(*)::int AS feedback_count
    FROM feedbacks
    WHERE feedbacks.item_uuid = items.uuid
) AS reviews ON TRUE
LEFT JOIN LATERAL (
    SELECT MAX(sales.discount) AS discount
    FROM sale_items
    JOIN sales ON sales.uuid = sale_items.sale_uuid
    WHERE sale_items.item_uuid = items.uuid
      AND ";

const RATING_SQL: &str =
    "COALESCE(reviews.rating_sum::numeric / NULLIF(reviews.feedback_count, 0), 0)";

/// Sort key for catalog listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogSort {
    Rating,
    Price,
    Reviews,
    #[default]
    Date,
}

impl CatalogSort {
    fn order_expression(self) -> &'static str {
        match self {
            Self::Rating => RATING_SQL,
            Self::Price => "items.price",
            Self::Reviews => "COALESCE(reviews.feedback_count, 0)",
            Self::Date => "items.created_at",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Inc,
    #[default]
    Dec,
}

impl SortDirection {
    fn as_sql(self) -> &'static str {
        match self {
            Self::Inc => "ASC",
            Self::Dec => "DESC",
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown sort option: {0}")]
pub struct UnknownSortOption(pub String);

impl FromStr for CatalogSort {
    type Err = UnknownSortOption;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "rating" => Ok(Self::Rating),
            "price" => Ok(Self::Price),
            "reviews" => Ok(Self::Reviews),
            "date" => Ok(Self::Date),
            other => Err(UnknownSortOption(other.to_string())),
        }
    }
}

impl FromStr for SortDirection {
    type Err = UnknownSortOption;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "inc" => Ok(Self::Inc),
            "dec" => Ok(Self::Dec),
            other => Err(UnknownSortOption(other.to_string())),
        }
    }
}

/// Conjunctive catalog filters with a single sort key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogQuery {
    pub name: Option<String>,
    pub min_price: Option<u64>,
    pub max_price: Option<u64>,
    pub available_only: bool,
    pub free_delivery_only: bool,
    pub category: Option<CategoryUuid>,
    pub tags: Vec<String>,
    pub sort: CatalogSort,
    pub direction: SortDirection,
}

/// Start an item query whose sale discount is evaluated on `on`.
pub(crate) fn push_item_select(builder: &mut QueryBuilder<'_, Postgres>, on: Date) {
    builder
        .push(ITEM_COLUMNS_SQL)
        .push_bind(SqlxDate::from(on))
        .push(" BETWEEN sales.date_from AND sales.date_to\n) AS running_sale ON TRUE\n");
}

/// Build the catalog listing. `categories` is the already expanded subtree
/// of `query.category`.
pub(crate) fn catalog_query(
    query: &CatalogQuery,
    categories: Option<&[CategoryUuid]>,
    on: Date,
) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new("");

    push_item_select(&mut builder, on);

    builder.push("WHERE NOT items.archived");

    if let Some(name) = query.name.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
        builder
            .push(" AND items.name ILIKE ")
            .push_bind(format!("%{}%", escape_like(name)));
    }

    if let Some(min_price) = query.min_price {
        builder
            .push(" AND items.price >= ")
            .push_bind(i64::try_from(min_price).unwrap_or(i64::MAX));
    }

    if let Some(max_price) = query.max_price {
        builder
            .push(" AND items.price <= ")
            .push_bind(i64::try_from(max_price).unwrap_or(i64::MAX));
    }

    if query.available_only {
        builder.push(" AND items.available");
    }

    if query.free_delivery_only {
        builder.push(" AND items.free_delivery");
    }

    if let Some(categories) = categories {
        let uuids: Vec<uuid::Uuid> = categories.iter().map(|c| c.into_uuid()).collect();

        builder
            .push(" AND items.category_uuid = ANY(")
            .push_bind(uuids)
            .push(")");
    }

    if !query.tags.is_empty() {
        builder
            .push(
                " AND EXISTS (SELECT 1 FROM taggables JOIN tags ON tags.uuid = taggables.tag_uuid \
                 WHERE taggables.taggable_uuid = items.uuid AND taggables.taggable_type = ",
            )
            .push_bind(Item::KIND)
            .push(" AND tags.name = ANY(")
            .push_bind(query.tags.clone())
            .push("))");
    }

    builder
        .push(" ORDER BY ")
        .push(query.sort.order_expression())
        .push(" ")
        .push(query.direction.as_sql())
        .push(", items.uuid ASC");

    builder
}

pub(crate) fn item_query(item: ItemUuid, on: Date) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new("");

    push_item_select(&mut builder, on);

    builder
        .push("WHERE items.uuid = ")
        .push_bind(item.into_uuid());

    builder
}

pub(crate) fn popular_query(on: Date) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new("");

    push_item_select(&mut builder, on);

    builder
        .push("WHERE NOT items.archived AND ")
        .push(RATING_SQL)
        .push(" > ")
        .push(POPULAR_MIN_RATING)
        .push(" ORDER BY ")
        .push(RATING_SQL)
        .push(" DESC, COALESCE(reviews.feedback_count, 0) DESC, items.uuid ASC LIMIT ")
        .push_bind(POPULAR_LIMIT);

    builder
}

pub(crate) fn limited_query(on: Date) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new("");

    push_item_select(&mut builder, on);

    builder
        .push("WHERE NOT items.archived AND items.count < ")
        .push_bind(LIMITED_STOCK_BELOW)
        .push(" ORDER BY items.count ASC, items.created_at DESC");

    builder
}

/// Every unarchived item, newest first.
pub(crate) fn banner_query(on: Date) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new("");

    push_item_select(&mut builder, on);

    builder.push("WHERE NOT items.archived ORDER BY items.created_at DESC, items.uuid ASC");

    builder
}

fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());

    for c in value.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }

        escaped.push(c);
    }

    escaped
}
