//! List Orders Handler

use std::sync::Arc;

use salvo::{oapi::extract::QueryParam, prelude::*};

use crate::{errors::into_status_error, extensions::*, orders::OrderResponse, state::State};

/// List Orders Handler
///
/// The customer's placed orders, newest first. The basket is not an order.
#[endpoint(
    tags("orders"),
    summary = "List Orders",
    security(("bearer_auth" = [])),
)]
pub(crate) async fn handler(
    at: QueryParam<String, false>,
    depot: &mut Depot,
) -> Result<Json<Vec<OrderResponse>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let customer = depot.customer_uuid_or_500()?;
    let point_in_time = at.into_point_in_time()?;

    let orders = state
        .app
        .orders
        .list_orders(customer, point_in_time)
        .await
        .map_err(into_status_error)?;

    let orders = orders
        .into_iter()
        .map(OrderResponse::try_from)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(orders))
}
