//! Orders

use salvo::{oapi::ToSchema, prelude::StatusError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use megano_app::domain::orders::models::{Order, OrderLine};

use crate::extensions::*;

pub(crate) mod handlers;

/// Order or basket line
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LineResponse {
    /// Item UUID
    pub id: Uuid,
    pub title: String,

    /// Unit price captured when the line was last priced
    pub price: u64,

    /// Current unit price, which may differ from `price` once a sale
    /// starts or ends
    pub current_price: u64,

    /// Quantity
    pub count: u32,
}

impl TryFrom<OrderLine> for LineResponse {
    type Error = StatusError;

    fn try_from(line: OrderLine) -> Result<Self, Self::Error> {
        Ok(Self {
            current_price: line.current_unit_price().or_500("failed to price order line")?,
            id: line.item_uuid.into(),
            price: line.sale_price,
            count: line.quantity,
            title: line.name,
        })
    }
}

pub(crate) fn line_responses(lines: Vec<OrderLine>) -> Result<Vec<LineResponse>, StatusError> {
    lines.into_iter().map(LineResponse::try_from).collect()
}

/// Order Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OrderResponse {
    pub id: Uuid,

    /// `YYYY-MM-DD HH:MM`, UTC
    pub created_at: String,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,

    /// `ordinary` or `express`
    pub delivery_type: String,
    pub payment_type: String,

    /// `pending`, `in process`, `delivery` or `archived`
    pub status: String,
    pub city: Option<String>,
    pub address: Option<String>,
    pub products: Vec<LineResponse>,
    pub subtotal: u64,
    pub delivery_cost: u64,
    pub total_cost: u64,
}

impl TryFrom<Order> for OrderResponse {
    type Error = StatusError;

    fn try_from(order: Order) -> Result<Self, Self::Error> {
        Ok(Self {
            id: order.uuid.into(),
            created_at: order.created_at.strftime("%Y-%m-%d %H:%M").to_string(),
            delivery_type: order.delivery_type.to_string(),
            status: order.status.to_string(),
            products: line_responses(order.lines)?,
            full_name: order.full_name,
            email: order.email,
            phone: order.phone,
            payment_type: order.payment_type,
            city: order.city,
            address: order.address,
            subtotal: order.subtotal,
            delivery_cost: order.delivery_fee,
            total_cost: order.total_amount,
        })
    }
}
