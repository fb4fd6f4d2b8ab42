//! Sales Repository

use jiff_sqlx::{Date as SqlxDate, Timestamp as SqlxTimestamp};
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};
use uuid::Uuid;

use crate::{
    database::{try_get_amount, try_get_percent},
    domain::{
        items::models::ItemUuid,
        sales::models::{NewSale, Sale, SaleItem, SaleUuid},
    },
};

const CREATE_SALE_SQL: &str = include_str!("sql/create_sale.sql");
const CREATE_SALE_ITEMS_SQL: &str = include_str!("sql/create_sale_items.sql");
const LIST_RUNNING_SALE_ITEMS_SQL: &str = include_str!("sql/list_running_sale_items.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgSalesRepository;

impl PgSalesRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn list_running_sale_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        on: jiff::civil::Date,
    ) -> Result<Vec<SaleItem>, sqlx::Error> {
        query_as::<Postgres, SaleItem>(LIST_RUNNING_SALE_ITEMS_SQL)
            .bind(SqlxDate::from(on))
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn create_sale(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        sale: &NewSale,
    ) -> Result<Sale, sqlx::Error> {
        let created = query_as::<Postgres, Sale>(CREATE_SALE_SQL)
            .bind(sale.uuid.into_uuid())
            .bind(&sale.name)
            .bind(i16::from(sale.discount))
            .bind(SqlxDate::from(sale.date_from))
            .bind(SqlxDate::from(sale.date_to))
            .fetch_one(&mut **tx)
            .await?;

        if !sale.items.is_empty() {
            let items: Vec<Uuid> = sale.items.iter().copied().map(ItemUuid::into_uuid).collect();

            query(CREATE_SALE_ITEMS_SQL)
                .bind(sale.uuid.into_uuid())
                .bind(&items)
                .execute(&mut **tx)
                .await?;
        }

        Ok(created)
    }
}

impl<'r> FromRow<'r, PgRow> for Sale {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: SaleUuid::from_uuid(row.try_get("uuid")?),
            name: row.try_get("name")?,
            discount: try_get_percent(row, "discount")?,
            date_from: row.try_get::<SqlxDate, _>("date_from")?.to_jiff(),
            date_to: row.try_get::<SqlxDate, _>("date_to")?.to_jiff(),
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for SaleItem {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            sale_uuid: SaleUuid::from_uuid(row.try_get("sale_uuid")?),
            item_uuid: ItemUuid::from_uuid(row.try_get("item_uuid")?),
            title: row.try_get("title")?,
            price: try_get_amount(row, "price")?,
            discount: try_get_percent(row, "discount")?,
            date_from: row.try_get::<SqlxDate, _>("date_from")?.to_jiff(),
            date_to: row.try_get::<SqlxDate, _>("date_to")?.to_jiff(),
        })
    }
}
