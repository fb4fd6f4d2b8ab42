//! Get Order Handler

use std::sync::Arc;

use salvo::{
    oapi::extract::{PathParam, QueryParam},
    prelude::*,
};
use uuid::Uuid;

use crate::{errors::into_status_error, extensions::*, orders::OrderResponse, state::State};

/// Get Order Handler
#[endpoint(
    tags("orders"),
    summary = "Get Order",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Order found"),
        (status_code = StatusCode::NOT_FOUND, description = "Order not found"),
    ),
)]
pub(crate) async fn handler(
    order: PathParam<Uuid>,
    at: QueryParam<String, false>,
    depot: &mut Depot,
) -> Result<Json<OrderResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let customer = depot.customer_uuid_or_500()?;
    let point_in_time = at.into_point_in_time()?;

    let order = state
        .app
        .orders
        .get_order(customer, order.into_inner().into(), point_in_time)
        .await
        .map_err(into_status_error)?;

    Ok(Json(order.try_into()?))
}

#[cfg(test)]
mod tests {
    use megano_app::domain::orders::{
        MockOrdersService, OrderStatus, OrdersServiceError, models::OrderUuid,
    };
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use crate::test_helpers::{Mocks, customer_service, make_order};

    use super::*;

    fn make_service(orders: MockOrdersService) -> Service {
        customer_service(
            Mocks {
                orders,
                ..Mocks::default()
            },
            Router::with_path("orders/{order}").get(handler),
        )
    }

    #[tokio::test]
    async fn test_returns_order_with_lines() -> TestResult {
        let order = OrderUuid::new();

        let mut orders = MockOrdersService::new();

        orders
            .expect_get_order()
            .once()
            .withf(move |_, requested, _| *requested == order)
            .return_once(move |_, _, _| Ok(make_order(order, OrderStatus::InProcess)));

        let mut res = TestClient::get(format!("http://example.com/orders/{order}"))
            .send(&make_service(orders))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        let body: OrderResponse = res.take_json().await?;

        assert_eq!(body.products.len(), 1);
        assert_eq!(body.subtotal, 1800);
        assert_eq!(body.delivery_cost, 200);

        Ok(())
    }

    #[tokio::test]
    async fn test_other_customers_order_returns_404() {
        let mut orders = MockOrdersService::new();

        orders
            .expect_get_order()
            .once()
            .return_once(|_, _, _| Err(OrdersServiceError::NotFound));

        let res = TestClient::get(format!("http://example.com/orders/{}", OrderUuid::new()))
            .send(&make_service(orders))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));
    }

    #[tokio::test]
    async fn test_malformed_uuid_returns_400() {
        let mut orders = MockOrdersService::new();

        orders.expect_get_order().never();

        let res = TestClient::get("http://example.com/orders/not-a-uuid")
            .send(&make_service(orders))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
    }
}
