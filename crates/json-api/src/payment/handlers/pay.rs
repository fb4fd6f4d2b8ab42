//! Pay Order Handler

use std::sync::Arc;

use salvo::{
    oapi::{
        ToSchema,
        extract::{JsonBody, PathParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use megano_app::domain::orders::models::PaymentDetails;

use crate::{
    errors::into_status_error,
    extensions::*,
    observability::{StorefrontEvent, record_event},
    orders::OrderResponse,
    state::State,
};

/// Card details. Checked for shape only and never stored.
#[derive(Deserialize, Serialize, ToSchema)]
pub(crate) struct PaymentRequest {
    /// 8 to 19 digits
    pub number: String,
    pub name: String,
    pub month: u8,
    pub year: u16,

    /// 3 digits
    pub code: String,
}

impl From<PaymentRequest> for PaymentDetails {
    fn from(request: PaymentRequest) -> Self {
        Self {
            number: request.number,
            name: request.name,
            month: request.month,
            year: request.year,
            code: request.code,
        }
    }
}

/// Pay Order Handler
///
/// Accepts payment for an order in process and hands it to delivery.
#[endpoint(
    tags("payment"),
    summary = "Pay Order",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Order paid"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid card or order state"),
        (status_code = StatusCode::NOT_FOUND, description = "Order not found"),
    ),
)]
pub(crate) async fn handler(
    order: PathParam<Uuid>,
    json: JsonBody<PaymentRequest>,
    depot: &mut Depot,
) -> Result<Json<OrderResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let customer = depot.customer_uuid_or_500()?;

    let order = state
        .app
        .orders
        .pay_order(customer, order.into_inner().into(), json.into_inner().into())
        .await
        .map_err(into_status_error)?;

    record_event(StorefrontEvent::OrderPaid);

    Ok(Json(order.try_into()?))
}
