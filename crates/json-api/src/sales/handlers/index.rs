//! Running Sales Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::QueryParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use megano_app::domain::sales::models::SaleItem;

use crate::{errors::into_status_error, extensions::*, state::State};

/// Sale Item Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SaleItemResponse {
    pub id: Uuid,
    pub sale: Uuid,
    pub title: String,

    /// Base price in minor units
    pub price: u64,

    /// Price with the sale discount applied
    pub sale_price: u64,

    /// First day, `DD-MM`
    pub date_from: String,

    /// Last day, `DD-MM`
    pub date_to: String,
}

impl TryFrom<SaleItem> for SaleItemResponse {
    type Error = StatusError;

    fn try_from(sale_item: SaleItem) -> Result<Self, Self::Error> {
        Ok(Self {
            sale_price: sale_item.sale_price().or_500("failed to price sale item")?,
            id: sale_item.item_uuid.into(),
            sale: sale_item.sale_uuid.into(),
            price: sale_item.price,
            date_from: sale_item.date_from.strftime("%d-%m").to_string(),
            date_to: sale_item.date_to.strftime("%d-%m").to_string(),
            title: sale_item.title,
        })
    }
}

/// Running Sales Handler
///
/// Items of every sale running on `at` (a `YYYY-MM-DD` day, today by
/// default).
#[endpoint(tags("sales"), summary = "List Sales")]
pub(crate) async fn handler(
    at: QueryParam<String, false>,
    depot: &mut Depot,
) -> Result<Json<Vec<SaleItemResponse>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let on = at.into_sale_date()?;

    let sale_items = state
        .app
        .sales
        .list_sales(on)
        .await
        .map_err(into_status_error)?;

    Ok(Json(
        sale_items
            .into_iter()
            .map(SaleItemResponse::try_from)
            .collect::<Result<_, _>>()?,
    ))
}
