//! Orders service.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use rustc_hash::FxHashMap;
use sqlx::{Postgres, Transaction};
use tracing::info;

use crate::{
    database::Db,
    domain::{
        customers::models::CustomerUuid,
        delivery::{PgDeliveryRepository, models::DeliveryType},
        items::models::ItemUuid,
        orders::{
            PgOrderLinesRepository, PgOrdersRepository,
            errors::OrdersServiceError,
            models::{DeliveryDetails, Order, OrderLine, OrderUuid, PaymentDetails},
            status::OrderStatus,
        },
        pricing::{self, OrderTotals, PricedLine},
        sales::models::sale_date,
    },
};

#[derive(Debug, Clone)]
pub struct PgOrdersService {
    db: Db,
    orders: PgOrdersRepository,
    lines: PgOrderLinesRepository,
    delivery: PgDeliveryRepository,
}

impl PgOrdersService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            orders: PgOrdersRepository::new(),
            lines: PgOrderLinesRepository::new(),
            delivery: PgDeliveryRepository::new(),
        }
    }

    async fn with_lines(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        mut order: Order,
        point_in_time: Timestamp,
    ) -> Result<Order, sqlx::Error> {
        order.lines = self
            .lines
            .list_lines(tx, &[order.uuid], sale_date(point_in_time))
            .await?;

        Ok(order)
    }

    /// Capture current unit prices on every line and store fresh totals.
    async fn reprice(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        delivery_type: DeliveryType,
        point_in_time: Timestamp,
    ) -> Result<OrderTotals, OrdersServiceError> {
        let lines = self
            .lines
            .list_lines(tx, &[order], sale_date(point_in_time))
            .await?;

        if lines.is_empty() {
            return Err(OrdersServiceError::EmptyOrder);
        }

        let mut prices: Vec<(ItemUuid, u64)> = Vec::with_capacity(lines.len());
        let mut priced: Vec<PricedLine> = Vec::with_capacity(lines.len());

        for line in &lines {
            let unit_price = line.current_unit_price()?;

            prices.push((line.item_uuid, unit_price));
            priced.push(PricedLine {
                unit_price,
                quantity: line.quantity,
            });
        }

        self.lines.update_sale_prices(tx, order, &prices).await?;

        let settings = self.delivery.get_settings(tx, delivery_type).await?;
        let totals = pricing::order_totals(&priced, delivery_type, settings.as_ref())?;

        self.orders.update_totals(tx, order, totals).await?;

        Ok(totals)
    }
}

#[async_trait]
impl OrdersService for PgOrdersService {
    async fn list_orders(
        &self,
        customer: CustomerUuid,
        point_in_time: Timestamp,
    ) -> Result<Vec<Order>, OrdersServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let mut orders = self.orders.list_orders(&mut tx, customer).await?;
        let uuids: Vec<OrderUuid> = orders.iter().map(|order| order.uuid).collect();

        let mut lines_by_order: FxHashMap<OrderUuid, Vec<OrderLine>> = FxHashMap::default();

        for line in self
            .lines
            .list_lines(&mut tx, &uuids, sale_date(point_in_time))
            .await?
        {
            lines_by_order.entry(line.order_uuid).or_default().push(line);
        }

        tx.commit().await?;

        for order in &mut orders {
            order.lines = lines_by_order.remove(&order.uuid).unwrap_or_default();
        }

        Ok(orders)
    }

    async fn get_order(
        &self,
        customer: CustomerUuid,
        order: OrderUuid,
        point_in_time: Timestamp,
    ) -> Result<Order, OrdersServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let found = self.orders.get_order(&mut tx, customer, order).await?;
        let found = self.with_lines(&mut tx, found, point_in_time).await?;

        tx.commit().await?;

        Ok(found)
    }

    #[tracing::instrument(
        name = "orders.service.checkout",
        skip(self),
        fields(order_uuid = tracing::field::Empty),
        err
    )]
    async fn checkout(&self, customer: CustomerUuid) -> Result<Order, OrdersServiceError> {
        let now = Timestamp::now();
        let mut tx = self.db.begin_transaction().await?;

        let active = self.orders.lock_active_order(&mut tx, customer).await?;

        tracing::Span::current().record("order_uuid", tracing::field::display(active.uuid));

        let next = active.status.transition_to(OrderStatus::Pending)?;

        self.reprice(&mut tx, active.uuid, active.delivery_type, now)
            .await?;

        let updated = self.orders.update_status(&mut tx, active.uuid, next).await?;
        let updated = self.with_lines(&mut tx, updated, now).await?;

        tx.commit().await?;

        info!(order_uuid = %updated.uuid, total = updated.total_amount, "order checked out");

        Ok(updated)
    }

    #[tracing::instrument(
        name = "orders.service.confirm_order",
        skip(self, details),
        fields(delivery_type = %details.delivery_type),
        err
    )]
    async fn confirm_order(
        &self,
        customer: CustomerUuid,
        order: OrderUuid,
        details: DeliveryDetails,
    ) -> Result<Order, OrdersServiceError> {
        details.validate()?;

        let now = Timestamp::now();
        let mut tx = self.db.begin_transaction().await?;

        let locked = self.orders.lock_order(&mut tx, customer, order).await?;
        let next = locked.status.transition_to(OrderStatus::InProcess)?;

        self.orders
            .update_delivery_details(&mut tx, order, &details)
            .await?;

        let totals = self
            .reprice(&mut tx, order, details.delivery_type, now)
            .await?;

        let updated = self.orders.update_status(&mut tx, order, next).await?;
        let updated = self.with_lines(&mut tx, updated, now).await?;

        tx.commit().await?;

        info!(
            subtotal = totals.subtotal,
            delivery_fee = totals.delivery_fee,
            total = totals.total,
            "order confirmed"
        );

        Ok(updated)
    }

    #[tracing::instrument(
        name = "orders.service.pay_order",
        skip(self, payment),
        err
    )]
    async fn pay_order(
        &self,
        customer: CustomerUuid,
        order: OrderUuid,
        payment: PaymentDetails,
    ) -> Result<Order, OrdersServiceError> {
        payment.validate()?;

        let mut tx = self.db.begin_transaction().await?;

        let locked = self.orders.lock_order(&mut tx, customer, order).await?;
        let next = locked.status.transition_to(OrderStatus::Delivery)?;

        let updated = self.orders.update_status(&mut tx, order, next).await?;
        let updated = self.with_lines(&mut tx, updated, Timestamp::now()).await?;

        tx.commit().await?;

        info!(total = updated.total_amount, "order paid");

        Ok(updated)
    }

    #[tracing::instrument(name = "orders.service.archive_order", skip(self), err)]
    async fn archive_order(&self, order: OrderUuid) -> Result<Order, OrdersServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let locked = self.orders.lock_any_order(&mut tx, order).await?;
        let next = locked.status.transition_to(OrderStatus::Archived)?;

        let updated = self.orders.update_status(&mut tx, order, next).await?;

        tx.commit().await?;

        info!(from = %locked.status, "order archived");

        Ok(updated)
    }
}

#[automock]
#[async_trait]
pub trait OrdersService: Send + Sync {
    /// The customer's placed orders, newest first. The active basket is
    /// not included.
    async fn list_orders(
        &self,
        customer: CustomerUuid,
        point_in_time: Timestamp,
    ) -> Result<Vec<Order>, OrdersServiceError>;

    async fn get_order(
        &self,
        customer: CustomerUuid,
        order: OrderUuid,
        point_in_time: Timestamp,
    ) -> Result<Order, OrdersServiceError>;

    /// Turns the active basket into a pending order, priced with the sales
    /// running today.
    async fn checkout(&self, customer: CustomerUuid) -> Result<Order, OrdersServiceError>;

    /// Records delivery details and recomputes the total at today's prices.
    async fn confirm_order(
        &self,
        customer: CustomerUuid,
        order: OrderUuid,
        details: DeliveryDetails,
    ) -> Result<Order, OrdersServiceError>;

    /// Accepts payment and hands the order to delivery.
    async fn pay_order(
        &self,
        customer: CustomerUuid,
        order: OrderUuid,
        payment: PaymentDetails,
    ) -> Result<Order, OrdersServiceError>;

    async fn archive_order(&self, order: OrderUuid) -> Result<Order, OrdersServiceError>;
}
