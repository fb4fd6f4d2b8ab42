//! Add To Basket Handler

use std::sync::Arc;

use salvo::{oapi::extract::JsonBody, prelude::*};

use crate::{
    basket::{BasketChangeRequest, BasketResponse},
    errors::into_status_error,
    extensions::*,
    observability::{StorefrontEvent, record_event},
    state::State,
};

/// Add To Basket Handler
///
/// Adds `count` of an item, merging with an existing line.
#[endpoint(
    tags("basket"),
    summary = "Add To Basket",
    responses(
        (status_code = StatusCode::OK, description = "Updated basket"),
        (status_code = StatusCode::NOT_FOUND, description = "Item not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Item unavailable or bad count"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<BasketChangeRequest>,
    depot: &mut Depot,
) -> Result<Json<BasketResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let customer = depot.customer_uuid_or_500()?;
    let request = json.into_validated()?;

    let basket = state
        .app
        .baskets
        .add_item(customer, request.id.into(), request.count)
        .await
        .map_err(into_status_error)?;

    record_event(StorefrontEvent::BasketItemAdded);

    Ok(Json(basket.try_into()?))
}
