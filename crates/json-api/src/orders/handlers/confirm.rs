//! Confirm Order Handler

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
use validator::Validate;

use megano_app::domain::{
    delivery::models::DeliveryType,
    orders::models::{DEFAULT_PAYMENT_TYPE, DeliveryDetails},
};

use crate::{
    errors::into_status_error,
    extensions::*,
    observability::{StorefrontEvent, record_event},
    orders::OrderResponse,
    state::State,
};

fn default_payment_type() -> String {
    DEFAULT_PAYMENT_TYPE.to_string()
}

/// Confirm Order Request
#[derive(Debug, Serialize, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ConfirmOrderRequest {
    #[validate(length(min = 1, max = 300))]
    pub full_name: String,

    #[validate(email)]
    pub email: String,

    #[validate(length(min = 1, max = 30))]
    pub phone: String,

    #[validate(length(min = 1, max = 150))]
    pub city: String,

    #[validate(length(min = 1, max = 500))]
    pub address: String,

    /// `ordinary` or `express`
    pub delivery_type: String,

    #[serde(default = "default_payment_type")]
    pub payment_type: String,
}

impl ConfirmOrderRequest {
    fn into_details(self) -> Result<DeliveryDetails, StatusError> {
        let delivery_type = self
            .delivery_type
            .parse::<DeliveryType>()
            .or_400("unknown delivery type")?;

        Ok(DeliveryDetails {
            full_name: self.full_name,
            email: self.email,
            phone: self.phone,
            city: self.city,
            address: self.address,
            delivery_type,
            payment_type: self.payment_type,
        })
    }
}

/// Confirm Order Handler
///
/// Records delivery details on a pending order, prices delivery and moves
/// it to `in process`. An order already in process may be confirmed again.
/// Lines are repriced with the sales running today.
#[endpoint(
    tags("orders"),
    summary = "Confirm Order",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Order confirmed"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid details or order state"),
        (status_code = StatusCode::NOT_FOUND, description = "Order not found"),
    ),
)]
pub(crate) async fn handler(
    order: PathParam<Uuid>,
    json: JsonBody<ConfirmOrderRequest>,
    depot: &mut Depot,
) -> Result<Json<OrderResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let customer = depot.customer_uuid_or_500()?;
    let details = json.into_validated()?.into_details()?;

    let order = state
        .app
        .orders
        .confirm_order(customer, order.into_inner().into(), details)
        .await
        .map_err(into_status_error)?;

    record_event(StorefrontEvent::OrderConfirmed);

    Ok(Json(order.try_into()?))
}
