//! Baskets service.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use sqlx::{Postgres, Transaction};
use tracing::{debug, info};

use crate::{
    database::Db,
    domain::{
        baskets::{
            errors::BasketsServiceError,
            models::{Basket, MAX_LINE_QUANTITY},
        },
        customers::models::CustomerUuid,
        items::{PgItemsRepository, models::ItemUuid},
        orders::{PgOrderLinesRepository, PgOrdersRepository, models::OrderUuid},
        sales::models::sale_date,
    },
};

#[derive(Debug, Clone)]
pub struct PgBasketsService {
    db: Db,
    orders: PgOrdersRepository,
    lines: PgOrderLinesRepository,
    items: PgItemsRepository,
}

impl PgBasketsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            orders: PgOrdersRepository::new(),
            lines: PgOrderLinesRepository::new(),
            items: PgItemsRepository::new(),
        }
    }

    async fn load(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: Option<OrderUuid>,
        point_in_time: Timestamp,
    ) -> Result<Basket, sqlx::Error> {
        let Some(order) = order else {
            return Ok(Basket::default());
        };

        let lines = self
            .lines
            .list_lines(tx, &[order], sale_date(point_in_time))
            .await?;

        Ok(Basket {
            order_uuid: Some(order),
            lines,
        })
    }
}

#[async_trait]
impl BasketsService for PgBasketsService {
    async fn get_basket(
        &self,
        customer: CustomerUuid,
        point_in_time: Timestamp,
    ) -> Result<Basket, BasketsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let active = self.orders.find_active_order(&mut tx, customer).await?;
        let basket = self
            .load(&mut tx, active.map(|order| order.uuid), point_in_time)
            .await?;

        tx.commit().await?;

        Ok(basket)
    }

    #[tracing::instrument(
        name = "baskets.service.add_item",
        skip(self),
        fields(order_uuid = tracing::field::Empty, quantity = tracing::field::Empty),
        err
    )]
    async fn add_item(
        &self,
        customer: CustomerUuid,
        item: ItemUuid,
        count: u32,
    ) -> Result<Basket, BasketsServiceError> {
        if !(1..=MAX_LINE_QUANTITY).contains(&count) {
            return Err(BasketsServiceError::InvalidData);
        }

        let now = Timestamp::now();
        let mut tx = self.db.begin_transaction().await?;

        let found = match self
            .items
            .get_item(&mut tx, item, sale_date(now))
            .await
        {
            Ok(found) => found,
            Err(sqlx::Error::RowNotFound) => return Err(BasketsServiceError::ItemNotFound),
            Err(error) => return Err(error.into()),
        };

        if found.archived || !found.available {
            return Err(BasketsServiceError::ItemUnavailable);
        }

        let order = self
            .orders
            .lock_or_create_active_order(&mut tx, customer)
            .await?;

        tracing::Span::current().record("order_uuid", tracing::field::display(order.uuid));

        let quantity = self
            .lines
            .add_line(&mut tx, order.uuid, item, count, found.sale_price()?)
            .await?;

        tracing::Span::current().record("quantity", quantity);

        let basket = self.load(&mut tx, Some(order.uuid), now).await?;

        tx.commit().await?;

        info!(quantity, "added item to basket");

        Ok(basket)
    }

    #[tracing::instrument(
        name = "baskets.service.remove_item",
        skip(self),
        fields(order_uuid = tracing::field::Empty),
        err
    )]
    async fn remove_item(
        &self,
        customer: CustomerUuid,
        item: ItemUuid,
        count: u32,
    ) -> Result<Basket, BasketsServiceError> {
        if !(1..=MAX_LINE_QUANTITY).contains(&count) {
            return Err(BasketsServiceError::InvalidData);
        }

        let now = Timestamp::now();
        let mut tx = self.db.begin_transaction().await?;

        let order = self.orders.lock_active_order(&mut tx, customer).await?;

        tracing::Span::current().record("order_uuid", tracing::field::display(order.uuid));

        let quantity = self
            .lines
            .get_line_quantity(&mut tx, order.uuid, item)
            .await?
            .ok_or(BasketsServiceError::NotFound)?;

        if count < quantity {
            let remaining = self
                .lines
                .decrement_line(&mut tx, order.uuid, item, count)
                .await?;

            let basket = self.load(&mut tx, Some(order.uuid), now).await?;

            tx.commit().await?;

            debug!(remaining, "decremented basket line");

            return Ok(basket);
        }

        self.lines.delete_line(&mut tx, order.uuid, item).await?;

        if self.lines.count_lines(&mut tx, order.uuid).await? > 0 {
            let basket = self.load(&mut tx, Some(order.uuid), now).await?;

            tx.commit().await?;

            info!("removed basket line");

            return Ok(basket);
        }

        self.orders.delete_order(&mut tx, order.uuid).await?;

        tx.commit().await?;

        info!("removed last basket line, deleted active order");

        Ok(Basket::default())
    }
}

#[automock]
#[async_trait]
pub trait BasketsService: Send + Sync {
    /// The customer's basket, empty when there is no active order.
    async fn get_basket(
        &self,
        customer: CustomerUuid,
        point_in_time: Timestamp,
    ) -> Result<Basket, BasketsServiceError>;

    /// Adds `count` of an item, creating the active order on first use.
    /// The line is priced with the sales running today.
    async fn add_item(
        &self,
        customer: CustomerUuid,
        item: ItemUuid,
        count: u32,
    ) -> Result<Basket, BasketsServiceError>;

    /// Removes `count` of an item. The line goes once `count` reaches its
    /// quantity, and the order goes with its last line.
    async fn remove_item(
        &self,
        customer: CustomerUuid,
        item: ItemUuid,
        count: u32,
    ) -> Result<Basket, BasketsServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::test::TestContext;

    use super::*;

    #[tokio::test]
    async fn adding_same_item_twice_increments_quantity() -> TestResult {
        let ctx = TestContext::new().await;
        let customer = ctx.create_customer().await;
        let lamp = ctx.create_item("Lamp", 1000).await;

        ctx.baskets.add_item(customer, lamp, 1).await?;
        let basket = ctx.baskets.add_item(customer, lamp, 2).await?;

        assert_eq!(basket.lines.len(), 1);
        assert_eq!(basket.lines.first().map(|line| line.quantity), Some(3));

        Ok(())
    }

    #[tokio::test]
    async fn basket_captures_discounted_sale_price() -> TestResult {
        let ctx = TestContext::new().await;
        let customer = ctx.create_customer().await;
        let lamp = ctx.create_discounted_item("Lamp", 1000, 10).await;

        let basket = ctx.baskets.add_item(customer, lamp, 2).await?;

        assert_eq!(basket.lines.first().map(|line| line.sale_price), Some(900));
        assert_eq!(basket.subtotal()?, 1800);

        Ok(())
    }

    #[tokio::test]
    async fn removing_part_of_a_line_decrements() -> TestResult {
        let ctx = TestContext::new().await;
        let customer = ctx.create_customer().await;
        let lamp = ctx.create_item("Lamp", 1000).await;

        ctx.baskets.add_item(customer, lamp, 3).await?;
        let basket = ctx.baskets.remove_item(customer, lamp, 2).await?;

        assert_eq!(basket.lines.first().map(|line| line.quantity), Some(1));

        Ok(())
    }

    #[tokio::test]
    async fn removing_whole_line_keeps_other_lines() -> TestResult {
        let ctx = TestContext::new().await;
        let customer = ctx.create_customer().await;
        let lamp = ctx.create_item("Lamp", 1000).await;
        let desk = ctx.create_item("Desk", 3000).await;

        ctx.baskets.add_item(customer, lamp, 1).await?;
        ctx.baskets.add_item(customer, desk, 1).await?;

        let basket = ctx.baskets.remove_item(customer, lamp, 5).await?;

        assert_eq!(basket.lines.len(), 1);
        assert_eq!(basket.lines.first().map(|line| line.item_uuid), Some(desk));

        Ok(())
    }

    #[tokio::test]
    async fn removing_last_line_deletes_the_order() -> TestResult {
        let ctx = TestContext::new().await;
        let customer = ctx.create_customer().await;
        let lamp = ctx.create_item("Lamp", 1000).await;

        let added = ctx.baskets.add_item(customer, lamp, 2).await?;
        let order = added.order_uuid.ok_or("expected an active order")?;

        let basket = ctx.baskets.remove_item(customer, lamp, 2).await?;

        assert_eq!(basket, Basket::default());
        assert!(!ctx.order_exists(order).await, "active order should be deleted");

        Ok(())
    }

    #[tokio::test]
    async fn removing_from_missing_basket_is_not_found() -> TestResult {
        let ctx = TestContext::new().await;
        let customer = ctx.create_customer().await;
        let lamp = ctx.create_item("Lamp", 1000).await;

        let result = ctx.baskets.remove_item(customer, lamp, 1).await;

        assert!(
            matches!(result, Err(BasketsServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn unavailable_item_cannot_be_added() -> TestResult {
        let ctx = TestContext::new().await;
        let customer = ctx.create_customer().await;
        let lamp = ctx.create_item("Lamp", 1000).await;

        ctx.archive_item(lamp).await;

        let result = ctx.baskets.add_item(customer, lamp, 1).await;

        assert!(
            matches!(result, Err(BasketsServiceError::ItemUnavailable)),
            "expected ItemUnavailable, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn unknown_item_cannot_be_added() {
        let ctx = TestContext::new().await;
        let customer = ctx.create_customer().await;

        let result = ctx
            .baskets
            .add_item(customer, ItemUuid::new(), 1)
            .await;

        assert!(
            matches!(result, Err(BasketsServiceError::ItemNotFound)),
            "expected ItemNotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn zero_count_is_invalid() -> TestResult {
        let ctx = TestContext::new().await;
        let customer = ctx.create_customer().await;
        let lamp = ctx.create_item("Lamp", 1000).await;

        let result = ctx.baskets.add_item(customer, lamp, 0).await;

        assert!(
            matches!(result, Err(BasketsServiceError::InvalidData)),
            "expected InvalidData, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn count_above_line_cap_is_invalid() -> TestResult {
        let ctx = TestContext::new().await;
        let customer = ctx.create_customer().await;
        let lamp = ctx.create_item("Lamp", 1000).await;

        let result = ctx.baskets.add_item(customer, lamp, 2_147_483_648).await;

        assert!(
            matches!(result, Err(BasketsServiceError::InvalidData)),
            "expected InvalidData, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn growing_a_line_past_the_cap_is_invalid() -> TestResult {
        let ctx = TestContext::new().await;
        let customer = ctx.create_customer().await;
        let lamp = ctx.create_item("Lamp", 1000).await;

        ctx.baskets.add_item(customer, lamp, MAX_LINE_QUANTITY).await?;

        let result = ctx.baskets.add_item(customer, lamp, 1).await;

        assert!(
            matches!(result, Err(BasketsServiceError::InvalidData)),
            "expected InvalidData, got {result:?}"
        );

        let basket = ctx.baskets.get_basket(customer, Timestamp::now()).await?;

        assert_eq!(
            basket.lines.first().map(|line| line.quantity),
            Some(MAX_LINE_QUANTITY)
        );

        Ok(())
    }

    #[tokio::test]
    async fn concurrent_adds_share_one_active_order() -> TestResult {
        let ctx = TestContext::new().await;
        let customer = ctx.create_customer().await;
        let lamp = ctx.create_item("Lamp", 1000).await;

        let (first, second) = tokio::join!(
            ctx.baskets.add_item(customer, lamp, 1),
            ctx.baskets.add_item(customer, lamp, 1),
        );

        let first = first?;
        let second = second?;

        assert_eq!(first.order_uuid, second.order_uuid);

        let basket = ctx.baskets.get_basket(customer, Timestamp::now()).await?;

        assert_eq!(basket.lines.first().map(|line| line.quantity), Some(2));

        Ok(())
    }
}
