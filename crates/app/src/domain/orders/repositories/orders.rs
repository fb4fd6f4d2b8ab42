//! Orders Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};

use crate::{
    database::{amount_to_i64, try_get_amount},
    domain::{
        customers::models::CustomerUuid,
        orders::{
            models::{DEFAULT_PAYMENT_TYPE, DeliveryDetails, Order, OrderUuid},
            status::OrderStatus,
        },
        pricing::OrderTotals,
    },
};

const CREATE_ACTIVE_ORDER_SQL: &str = include_str!("../sql/create_active_order.sql");
const LOCK_ACTIVE_ORDER_SQL: &str = include_str!("../sql/lock_active_order.sql");
const FIND_ACTIVE_ORDER_SQL: &str = include_str!("../sql/find_active_order.sql");
const GET_ORDER_SQL: &str = include_str!("../sql/get_order.sql");
const LOCK_ORDER_SQL: &str = include_str!("../sql/lock_order.sql");
const LOCK_ANY_ORDER_SQL: &str = include_str!("../sql/lock_any_order.sql");
const LIST_ORDERS_SQL: &str = include_str!("../sql/list_orders.sql");
const UPDATE_STATUS_SQL: &str = include_str!("../sql/update_status.sql");
const UPDATE_TOTALS_SQL: &str = include_str!("../sql/update_totals.sql");
const UPDATE_DELIVERY_DETAILS_SQL: &str = include_str!("../sql/update_delivery_details.sql");
const DELETE_ORDER_SQL: &str = include_str!("../sql/delete_order.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgOrdersRepository;

impl PgOrdersRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Lock the customer's active order, creating it first when missing.
    ///
    /// A concurrent creator blocks on the partial unique index until the
    /// other transaction finishes, so both end up locking the same row.
    pub(crate) async fn lock_or_create_active_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        customer: CustomerUuid,
    ) -> Result<Order, sqlx::Error> {
        query(CREATE_ACTIVE_ORDER_SQL)
            .bind(OrderUuid::new().into_uuid())
            .bind(customer.into_uuid())
            .bind(DEFAULT_PAYMENT_TYPE)
            .execute(&mut **tx)
            .await?;

        self.lock_active_order(tx, customer).await
    }

    pub(crate) async fn lock_active_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        customer: CustomerUuid,
    ) -> Result<Order, sqlx::Error> {
        query_as::<Postgres, Order>(LOCK_ACTIVE_ORDER_SQL)
            .bind(customer.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn find_active_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        customer: CustomerUuid,
    ) -> Result<Option<Order>, sqlx::Error> {
        query_as::<Postgres, Order>(FIND_ACTIVE_ORDER_SQL)
            .bind(customer.into_uuid())
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn get_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        customer: CustomerUuid,
        order: OrderUuid,
    ) -> Result<Order, sqlx::Error> {
        query_as::<Postgres, Order>(GET_ORDER_SQL)
            .bind(order.into_uuid())
            .bind(customer.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn lock_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        customer: CustomerUuid,
        order: OrderUuid,
    ) -> Result<Order, sqlx::Error> {
        query_as::<Postgres, Order>(LOCK_ORDER_SQL)
            .bind(order.into_uuid())
            .bind(customer.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    /// Lock an order regardless of its owner.
    pub(crate) async fn lock_any_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<Order, sqlx::Error> {
        query_as::<Postgres, Order>(LOCK_ANY_ORDER_SQL)
            .bind(order.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn list_orders(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        customer: CustomerUuid,
    ) -> Result<Vec<Order>, sqlx::Error> {
        query_as::<Postgres, Order>(LIST_ORDERS_SQL)
            .bind(customer.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn update_status(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        status: OrderStatus,
    ) -> Result<Order, sqlx::Error> {
        query_as::<Postgres, Order>(UPDATE_STATUS_SQL)
            .bind(order.into_uuid())
            .bind(status.as_str())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn update_totals(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        totals: OrderTotals,
    ) -> Result<(), sqlx::Error> {
        query(UPDATE_TOTALS_SQL)
            .bind(order.into_uuid())
            .bind(amount_to_i64(totals.subtotal)?)
            .bind(amount_to_i64(totals.delivery_fee)?)
            .bind(amount_to_i64(totals.total)?)
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    pub(crate) async fn update_delivery_details(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        details: &DeliveryDetails,
    ) -> Result<(), sqlx::Error> {
        query(UPDATE_DELIVERY_DETAILS_SQL)
            .bind(order.into_uuid())
            .bind(details.full_name.trim())
            .bind(details.email.trim())
            .bind(details.phone.trim())
            .bind(details.city.trim())
            .bind(details.address.trim())
            .bind(details.delivery_type.as_str())
            .bind(details.payment_type.trim())
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    pub(crate) async fn delete_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_ORDER_SQL)
            .bind(order.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

fn decode_text<T>(row: &PgRow, col: &str) -> Result<T, sqlx::Error>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let text: String = row.try_get(col)?;

    text.parse().map_err(|e| sqlx::Error::ColumnDecode {
        index: col.to_string(),
        source: Box::new(e),
    })
}

impl<'r> FromRow<'r, PgRow> for Order {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: OrderUuid::from_uuid(row.try_get("uuid")?),
            customer_uuid: CustomerUuid::from_uuid(row.try_get("customer_uuid")?),
            status: decode_text(row, "status")?,
            delivery_type: decode_text(row, "delivery_type")?,
            payment_type: row.try_get("payment_type")?,
            full_name: row.try_get("full_name")?,
            email: row.try_get("email")?,
            phone: row.try_get("phone")?,
            city: row.try_get("city")?,
            address: row.try_get("address")?,
            subtotal: try_get_amount(row, "subtotal")?,
            delivery_fee: try_get_amount(row, "delivery_fee")?,
            total_amount: try_get_amount(row, "total_amount")?,
            lines: Vec::new(),
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
