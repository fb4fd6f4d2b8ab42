//! Order Lines Repository

use jiff::civil::Date;
use jiff_sqlx::{Date as SqlxDate, Timestamp as SqlxTimestamp};
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, query_scalar};
use uuid::Uuid;

use crate::{
    database::{amount_to_i64, try_get_amount, try_get_count, try_get_optional_percent, try_get_percent},
    domain::{
        items::models::ItemUuid,
        orders::models::{OrderLine, OrderUuid},
    },
};

const LIST_LINES_SQL: &str = include_str!("../sql/list_lines.sql");
const ADD_LINE_SQL: &str = include_str!("../sql/add_line.sql");
const GET_LINE_QUANTITY_SQL: &str = include_str!("../sql/get_line_quantity.sql");
const DECREMENT_LINE_SQL: &str = include_str!("../sql/decrement_line.sql");
const DELETE_LINE_SQL: &str = include_str!("../sql/delete_line.sql");
const COUNT_LINES_SQL: &str = include_str!("../sql/count_lines.sql");
const UPDATE_SALE_PRICES_SQL: &str = include_str!("../sql/update_sale_prices.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgOrderLinesRepository;

impl PgOrderLinesRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Lines of every given order, with item discounts evaluated on `on`.
    pub(crate) async fn list_lines(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        orders: &[OrderUuid],
        on: Date,
    ) -> Result<Vec<OrderLine>, sqlx::Error> {
        let uuids: Vec<Uuid> = orders.iter().copied().map(OrderUuid::into_uuid).collect();

        query_as::<Postgres, OrderLine>(LIST_LINES_SQL)
            .bind(&uuids)
            .bind(SqlxDate::from(on))
            .fetch_all(&mut **tx)
            .await
    }

    /// Add `quantity` to the line, creating it when missing. Returns the new
    /// quantity.
    pub(crate) async fn add_line(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        item: ItemUuid,
        quantity: u32,
        sale_price: u64,
    ) -> Result<u32, sqlx::Error> {
        let total: i32 = query_scalar(ADD_LINE_SQL)
            .bind(order.into_uuid())
            .bind(item.into_uuid())
            .bind(bind_quantity(quantity)?)
            .bind(amount_to_i64(sale_price)?)
            .fetch_one(&mut **tx)
            .await?;

        decode_quantity(total)
    }

    pub(crate) async fn get_line_quantity(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        item: ItemUuid,
    ) -> Result<Option<u32>, sqlx::Error> {
        let quantity: Option<i32> = query_scalar(GET_LINE_QUANTITY_SQL)
            .bind(order.into_uuid())
            .bind(item.into_uuid())
            .fetch_optional(&mut **tx)
            .await?;

        quantity.map(decode_quantity).transpose()
    }

    pub(crate) async fn decrement_line(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        item: ItemUuid,
        quantity: u32,
    ) -> Result<u32, sqlx::Error> {
        let remaining: i32 = query_scalar(DECREMENT_LINE_SQL)
            .bind(order.into_uuid())
            .bind(item.into_uuid())
            .bind(bind_quantity(quantity)?)
            .fetch_one(&mut **tx)
            .await?;

        decode_quantity(remaining)
    }

    pub(crate) async fn delete_line(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        item: ItemUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_LINE_SQL)
            .bind(order.into_uuid())
            .bind(item.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn count_lines(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<i64, sqlx::Error> {
        query_scalar(COUNT_LINES_SQL)
            .bind(order.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    /// Overwrite the captured unit price of each `(item, sale_price)` line.
    pub(crate) async fn update_sale_prices(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        prices: &[(ItemUuid, u64)],
    ) -> Result<(), sqlx::Error> {
        if prices.is_empty() {
            return Ok(());
        }

        let items: Vec<Uuid> = prices.iter().map(|(item, _)| item.into_uuid()).collect();
        let sale_prices = prices
            .iter()
            .map(|(_, price)| amount_to_i64(*price))
            .collect::<Result<Vec<i64>, _>>()?;

        query(UPDATE_SALE_PRICES_SQL)
            .bind(order.into_uuid())
            .bind(&items)
            .bind(&sale_prices)
            .execute(&mut **tx)
            .await?;

        Ok(())
    }
}

fn bind_quantity(quantity: u32) -> Result<i32, sqlx::Error> {
    i32::try_from(quantity).map_err(|e| sqlx::Error::Encode(Box::new(e)))
}

fn decode_quantity(quantity: i32) -> Result<u32, sqlx::Error> {
    u32::try_from(quantity).map_err(|e| sqlx::Error::Decode(Box::new(e)))
}

impl<'r> FromRow<'r, PgRow> for OrderLine {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            order_uuid: OrderUuid::from_uuid(row.try_get("order_uuid")?),
            item_uuid: ItemUuid::from_uuid(row.try_get("item_uuid")?),
            name: row.try_get("name")?,
            price: try_get_amount(row, "price")?,
            discount: try_get_percent(row, "discount")?,
            sale_discount: try_get_optional_percent(row, "sale_discount")?,
            quantity: try_get_count(row, "quantity")?,
            sale_price: try_get_amount(row, "sale_price")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
