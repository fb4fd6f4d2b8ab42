//! Basket

use salvo::{oapi::ToSchema, prelude::StatusError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use megano_app::domain::baskets::models::{Basket, MAX_LINE_QUANTITY};

use crate::{
    extensions::*,
    orders::{LineResponse, line_responses},
};

pub(crate) mod handlers;

/// Basket Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct BasketResponse {
    /// The active order, absent while the basket is empty
    pub order_id: Option<Uuid>,
    pub items: Vec<LineResponse>,

    /// Sum of captured unit prices times quantity
    pub subtotal: u64,

    /// Total quantity across lines
    pub count: u64,
}

impl TryFrom<Basket> for BasketResponse {
    type Error = StatusError;

    fn try_from(basket: Basket) -> Result<Self, Self::Error> {
        Ok(Self {
            subtotal: basket.subtotal().or_500("failed to total basket")?,
            count: basket.item_count(),
            order_id: basket.order_uuid.map(Into::into),
            items: line_responses(basket.lines)?,
        })
    }
}

/// Basket change: add or remove `count` of item `id`, at most
/// [`MAX_LINE_QUANTITY`] at a time
#[derive(Debug, Serialize, Deserialize, ToSchema, Validate)]
pub(crate) struct BasketChangeRequest {
    pub id: Uuid,

    #[validate(range(min = 1, max = MAX_LINE_QUANTITY))]
    pub count: u32,
}
