//! Catalog Listing Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToParameters, ToSchema, extract::QueryParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use megano_app::domain::items::query::{CatalogQuery, CatalogSort, SortDirection};

use crate::{
    catalog::{ItemResponse, item_responses},
    errors::into_status_error,
    extensions::*,
    state::State,
};

/// Catalog filters. Every given filter must match.
#[derive(Debug, Deserialize, ToParameters)]
#[salvo(parameters(default_parameter_in = Query))]
pub(crate) struct CatalogParams {
    /// Case-insensitive substring of the item name
    #[serde(rename = "filter[name]")]
    pub name: Option<String>,

    #[serde(rename = "filter[minPrice]")]
    pub min_price: Option<u64>,

    #[serde(rename = "filter[maxPrice]")]
    pub max_price: Option<u64>,

    #[serde(rename = "filter[freeDelivery]")]
    pub free_delivery: Option<bool>,

    /// Only items that can be bought now
    #[serde(rename = "filter[available]")]
    pub available: Option<bool>,

    /// Category; its subcategories are included
    pub category: Option<Uuid>,

    /// Tag names, repeatable; an item matches if it has any of them
    #[serde(default)]
    pub tags: Vec<String>,

    /// `rating`, `price`, `reviews` or `date`
    pub sort: Option<String>,

    /// `inc` or `dec`
    #[serde(rename = "sortType")]
    pub sort_type: Option<String>,
}

impl CatalogParams {
    fn into_query(self) -> Result<CatalogQuery, StatusError> {
        let sort = self
            .sort
            .map(|value| value.parse::<CatalogSort>())
            .transpose()
            .or_400("could not parse \"sort\" query parameter")?
            .unwrap_or_default();

        let direction = self
            .sort_type
            .map(|value| value.parse::<SortDirection>())
            .transpose()
            .or_400("could not parse \"sortType\" query parameter")?
            .unwrap_or_default();

        Ok(CatalogQuery {
            name: self.name.filter(|name| !name.trim().is_empty()),
            min_price: self.min_price,
            max_price: self.max_price,
            available_only: self.available.unwrap_or(false),
            free_delivery_only: self.free_delivery.unwrap_or(false),
            category: self.category.map(Into::into),
            tags: self.tags,
            sort,
            direction,
        })
    }
}

/// Catalog Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CatalogResponse {
    pub items: Vec<ItemResponse>,
}

/// Catalog Handler
///
/// Lists unarchived items matching the filters.
#[endpoint(tags("catalog"), summary = "List Catalog")]
pub(crate) async fn handler(
    params: CatalogParams,
    at: QueryParam<String, false>,
    depot: &mut Depot,
) -> Result<Json<CatalogResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let point_in_time = at.into_point_in_time()?;

    let items = state
        .app
        .items
        .list_catalog(params.into_query()?, point_in_time)
        .await
        .map_err(into_status_error)?;

    Ok(Json(CatalogResponse {
        items: item_responses(items)?,
    }))
}

#[cfg(test)]
mod tests {
    use megano_app::domain::items::{MockItemsService, models::ItemUuid};
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use crate::test_helpers::{Mocks, make_item, public_service};

    use super::*;

    fn make_service(items: MockItemsService) -> Service {
        public_service(
            Mocks {
                items,
                ..Mocks::default()
            },
            Router::with_path("catalog").get(handler),
        )
    }

    #[tokio::test]
    async fn test_filters_are_forwarded() -> TestResult {
        let category = Uuid::now_v7();
        let item = make_item(ItemUuid::new(), 1500);

        let mut items = MockItemsService::new();

        items
            .expect_list_catalog()
            .once()
            .withf(move |query, _| {
                query.name.as_deref() == Some("speak")
                    && query.min_price == Some(1000)
                    && query.max_price == Some(2000)
                    && query.free_delivery_only
                    && !query.available_only
                    && query.category == Some(category.into())
                    && query.tags == ["audio", "sale"]
                    && query.sort == CatalogSort::Price
                    && query.direction == SortDirection::Inc
            })
            .return_once(move |_, _| Ok(vec![item]));

        let mut res = TestClient::get(format!(
            "http://example.com/catalog?filter%5Bname%5D=speak&filter%5BminPrice%5D=1000\
             &filter%5BmaxPrice%5D=2000&filter%5BfreeDelivery%5D=true&category={category}\
             &tags=audio&tags=sale&sort=price&sortType=inc"
        ))
        .send(&make_service(items))
        .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        let body: CatalogResponse = res.take_json().await?;

        assert_eq!(body.items.len(), 1);
        assert_eq!(body.items.first().map(|item| item.price), Some(1500));

        Ok(())
    }

    #[tokio::test]
    async fn test_defaults_sort_newest_first() -> TestResult {
        let mut items = MockItemsService::new();

        items
            .expect_list_catalog()
            .once()
            .withf(|query, _| *query == CatalogQuery::default())
            .return_once(|_, _| Ok(Vec::new()));

        let mut res = TestClient::get("http://example.com/catalog")
            .send(&make_service(items))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        let body: serde_json::Value = res.take_json().await?;

        assert_eq!(body, serde_json::json!({ "items": [] }));

        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_sort_returns_400() {
        let mut items = MockItemsService::new();

        items.expect_list_catalog().never();

        let res = TestClient::get("http://example.com/catalog?sort=colour")
            .send(&make_service(items))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
    }
}
