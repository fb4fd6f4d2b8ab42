//! Popular Items Handler

use std::sync::Arc;

use salvo::{oapi::extract::QueryParam, prelude::*};

use crate::{
    catalog::{ItemResponse, item_responses},
    errors::into_status_error,
    extensions::*,
    state::State,
};

/// Popular Items Handler
///
/// Top rated items, best first.
#[endpoint(tags("catalog"), summary = "List Popular Items")]
pub(crate) async fn handler(
    at: QueryParam<String, false>,
    depot: &mut Depot,
) -> Result<Json<Vec<ItemResponse>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let point_in_time = at.into_point_in_time()?;

    let items = state
        .app
        .items
        .popular_items(point_in_time)
        .await
        .map_err(into_status_error)?;

    Ok(Json(item_responses(items)?))
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use megano_app::domain::items::{MockItemsService, models::ItemUuid};
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use crate::test_helpers::{Mocks, make_item, public_service};

    use super::*;

    #[tokio::test]
    async fn test_popular_forwards_point_in_time() -> TestResult {
        let at: Timestamp = "2026-03-01T09:30:00Z".parse()?;
        let item = make_item(ItemUuid::new(), 2500);

        let mut items = MockItemsService::new();

        items
            .expect_popular_items()
            .once()
            .withf(move |point_in_time| *point_in_time == at)
            .return_once(move |_| Ok(vec![item]));

        let mut res = TestClient::get("http://example.com/catalog/popular?at=2026-03-01T09:30:00Z")
            .send(&public_service(
                Mocks {
                    items,
                    ..Mocks::default()
                },
                Router::with_path("catalog/popular").get(handler),
            ))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        let body: Vec<ItemResponse> = res.take_json().await?;

        assert_eq!(body.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_bad_point_in_time_returns_400() {
        let mut items = MockItemsService::new();

        items.expect_popular_items().never();

        let res = TestClient::get("http://example.com/catalog/popular?at=yesterday")
            .send(&public_service(
                Mocks {
                    items,
                    ..Mocks::default()
                },
                Router::with_path("catalog/popular").get(handler),
            ))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
    }
}
