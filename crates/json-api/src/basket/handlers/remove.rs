//! Remove From Basket Handler

use std::sync::Arc;

use salvo::{oapi::extract::JsonBody, prelude::*};

use crate::{
    basket::{BasketChangeRequest, BasketResponse},
    errors::into_status_error,
    extensions::*,
    observability::{StorefrontEvent, record_event},
    state::State,
};

/// Remove From Basket Handler
///
/// Removes `count` of an item. Removing the whole quantity drops the line.
#[endpoint(
    tags("basket"),
    summary = "Remove From Basket",
    responses(
        (status_code = StatusCode::OK, description = "Updated basket"),
        (status_code = StatusCode::NOT_FOUND, description = "Item is not in the basket"),
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
        .remove_item(customer, request.id.into(), request.count)
        .await
        .map_err(into_status_error)?;

    record_event(StorefrontEvent::BasketItemRemoved);

    Ok(Json(basket.try_into()?))
}

#[cfg(test)]
mod tests {
    use megano_app::domain::{
        baskets::{BasketsServiceError, MockBasketsService, models::Basket},
        items::models::ItemUuid,
    };
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use crate::test_helpers::{Mocks, customer_service};

    use super::*;

    fn make_service(baskets: MockBasketsService) -> Service {
        customer_service(
            Mocks {
                baskets,
                ..Mocks::default()
            },
            Router::with_path("basket").delete(handler),
        )
    }

    #[tokio::test]
    async fn test_removing_last_line_empties_basket() -> TestResult {
        let item = ItemUuid::new();

        let mut baskets = MockBasketsService::new();

        baskets
            .expect_remove_item()
            .once()
            .withf(move |_, requested, count| *requested == item && *count == 5)
            .return_once(|_, _, _| Ok(Basket::default()));

        let mut res = TestClient::delete("http://example.com/basket")
            .json(&json!({ "id": item.into_uuid(), "count": 5 }))
            .send(&make_service(baskets))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        let body: BasketResponse = res.take_json().await?;

        assert_eq!(body.order_id, None);

        Ok(())
    }

    #[tokio::test]
    async fn test_item_not_in_basket_returns_404() {
        let mut baskets = MockBasketsService::new();

        baskets
            .expect_remove_item()
            .once()
            .return_once(|_, _, _| Err(BasketsServiceError::NotFound));

        let res = TestClient::delete("http://example.com/basket")
            .json(&json!({ "id": ItemUuid::new().into_uuid(), "count": 1 }))
            .send(&make_service(baskets))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));
    }
}
