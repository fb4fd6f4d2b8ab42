//! Get Product Handler

use std::sync::Arc;

use salvo::{
    oapi::{
        ToSchema,
        extract::{PathParam, QueryParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use megano_app::domain::items::models::{ItemDetail, Specification};

use crate::{
    catalog::ItemResponse, errors::into_status_error, extensions::*,
    products::handlers::ReviewResponse, state::State,
};

/// Product Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ProductResponse {
    /// Catalog card fields
    pub item: ItemResponse,

    /// Full description
    pub full_description: String,

    /// Item discount percentage
    pub discount: u8,

    /// Discount of the sale running now, if any
    pub sale_discount: Option<u8>,

    /// Name/value rows in display order
    pub specifications: Vec<SpecificationResponse>,

    /// Newest first
    pub review_list: Vec<ReviewResponse>,
}

/// Specification row
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct SpecificationResponse {
    pub name: String,
    pub value: String,
}

impl From<Specification> for SpecificationResponse {
    fn from(spec: Specification) -> Self {
        Self {
            name: spec.name,
            value: spec.value,
        }
    }
}

impl TryFrom<ItemDetail> for ProductResponse {
    type Error = StatusError;

    fn try_from(detail: ItemDetail) -> Result<Self, Self::Error> {
        let full_description = detail.item.description.clone();
        let discount = detail.item.discount;
        let sale_discount = detail.item.sale_discount;

        Ok(Self {
            item: detail.item.try_into()?,
            full_description,
            discount,
            sale_discount,
            specifications: detail.specifications.into_iter().map(Into::into).collect(),
            review_list: detail.reviews.into_iter().map(Into::into).collect(),
        })
    }
}

/// Get Product Handler
///
/// Returns the item with its specifications and reviews.
#[endpoint(
    tags("products"),
    summary = "Get Product",
    responses(
        (status_code = StatusCode::OK, description = "Product found"),
        (status_code = StatusCode::NOT_FOUND, description = "Product not found"),
    ),
)]
pub(crate) async fn handler(
    item: PathParam<Uuid>,
    at: QueryParam<String, false>,
    depot: &mut Depot,
) -> Result<Json<ProductResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let point_in_time = at.into_point_in_time()?;

    let detail = state
        .app
        .items
        .get_item(item.into_inner().into(), point_in_time)
        .await
        .map_err(into_status_error)?;

    Ok(Json(detail.try_into()?))
}
