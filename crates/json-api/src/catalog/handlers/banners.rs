//! Banner Items Handler

use std::sync::Arc;

use salvo::{oapi::extract::QueryParam, prelude::*};

use crate::{
    catalog::{ItemResponse, item_responses},
    errors::into_status_error,
    extensions::*,
    state::State,
};

/// Banner Items Handler
///
/// Every unarchived item, newest first.
#[endpoint(tags("catalog"), summary = "List Banner Items")]
pub(crate) async fn handler(
    at: QueryParam<String, false>,
    depot: &mut Depot,
) -> Result<Json<Vec<ItemResponse>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let point_in_time = at.into_point_in_time()?;

    let items = state
        .app
        .items
        .banner_items(point_in_time)
        .await
        .map_err(into_status_error)?;

    Ok(Json(item_responses(items)?))
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
            Router::with_path("banners").get(handler),
        )
    }

    #[tokio::test]
    async fn test_banners_list_items_as_cards() -> TestResult {
        let newer = ItemUuid::new();
        let older = ItemUuid::new();
        let cards = vec![make_item(newer, 1200), make_item(older, 800)];

        let mut items = MockItemsService::new();

        items
            .expect_banner_items()
            .once()
            .return_once(move |_| Ok(cards));

        let mut res = TestClient::get("http://example.com/banners")
            .send(&make_service(items))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        let body: Vec<ItemResponse> = res.take_json().await?;
        let ids: Vec<_> = body.iter().map(|item| item.id).collect();

        assert_eq!(ids, vec![newer.into_uuid(), older.into_uuid()]);

        Ok(())
    }

    #[tokio::test]
    async fn test_bad_point_in_time_returns_400() {
        let mut items = MockItemsService::new();

        items.expect_banner_items().never();

        let res = TestClient::get("http://example.com/banners?at=yesterday")
            .send(&make_service(items))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
    }
}
