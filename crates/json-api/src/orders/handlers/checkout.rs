//! Checkout Handler

use std::sync::Arc;

use salvo::{http::header::LOCATION, prelude::*};

use crate::{
    errors::into_status_error,
    extensions::*,
    observability::{StorefrontEvent, record_event},
    orders::OrderResponse,
    state::State,
};

/// Checkout Handler
///
/// Turns the basket into a pending order and starts a fresh empty basket.
#[endpoint(
    tags("orders"),
    summary = "Checkout",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Pending order created"),
        (status_code = StatusCode::NOT_FOUND, description = "Basket is empty"),
    ),
)]
pub(crate) async fn handler(
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<OrderResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let customer = depot.customer_uuid_or_500()?;

    let order = state
        .app
        .orders
        .checkout(customer)
        .await
        .map_err(into_status_error)?;

    record_event(StorefrontEvent::OrderCheckedOut);

    res.add_header(LOCATION, format!("/orders/{}", order.uuid), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(order.try_into()?))
}
