//! Get Basket Handler

use std::sync::Arc;

use salvo::{oapi::extract::QueryParam, prelude::*};

use crate::{basket::BasketResponse, errors::into_status_error, extensions::*, state::State};

/// Get Basket Handler
///
/// Returns the current customer's basket, empty when nothing was added.
#[endpoint(tags("basket"), summary = "Get Basket")]
pub(crate) async fn handler(
    at: QueryParam<String, false>,
    depot: &mut Depot,
) -> Result<Json<BasketResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let customer = depot.customer_uuid_or_500()?;
    let point_in_time = at.into_point_in_time()?;

    let basket = state
        .app
        .baskets
        .get_basket(customer, point_in_time)
        .await
        .map_err(into_status_error)?;

    Ok(Json(basket.try_into()?))
}
