//! Create Review Handler

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

use megano_app::domain::items::models::{ItemUuid, MAX_RATE, NewReview, ReviewUuid};

use crate::{
    errors::into_status_error, extensions::*, products::handlers::ReviewResponse, state::State,
};

/// Create Review Request
#[derive(Debug, Serialize, Deserialize, ToSchema, Validate)]
pub(crate) struct CreateReviewRequest {
    #[validate(length(min = 1, max = 150))]
    pub author: String,

    #[validate(email)]
    pub email: String,

    #[validate(length(min = 1))]
    pub text: String,

    #[validate(range(min = 1, max = MAX_RATE))]
    pub rate: u8,
}

impl CreateReviewRequest {
    fn into_new_review(self, item: ItemUuid) -> NewReview {
        NewReview {
            uuid: ReviewUuid::new(),
            item_uuid: item,
            author: self.author,
            email: self.email,
            text: self.text,
            rate: self.rate,
        }
    }
}

/// Create Review Handler
#[endpoint(
    tags("products"),
    summary = "Review Product",
    responses(
        (status_code = StatusCode::CREATED, description = "Review created"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
    ),
)]
pub(crate) async fn handler(
    item: PathParam<Uuid>,
    json: JsonBody<CreateReviewRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<ReviewResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let request = json.into_validated()?;

    let review = state
        .app
        .items
        .create_review(request.into_new_review(item.into_inner().into()))
        .await
        .map_err(into_status_error)?;

    res.status_code(StatusCode::CREATED);

    Ok(Json(review.into()))
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use megano_app::domain::items::{ItemsServiceError, MockItemsService, models::Review};
    use salvo::test::TestClient;
    use serde_json::json;

    use crate::test_helpers::{Mocks, public_service};

    use super::*;

    fn make_service(items: MockItemsService) -> Service {
        public_service(
            Mocks {
                items,
                ..Mocks::default()
            },
            Router::with_path("products/{item}/reviews").post(handler),
        )
    }

    #[tokio::test]
    async fn test_review_returns_201() {
        let item = ItemUuid::new();

        let mut items = MockItemsService::new();

        items
            .expect_create_review()
            .once()
            .withf(move |review| review.item_uuid == item && review.rate == 4)
            .return_once(|review| {
                Ok(Review {
                    uuid: review.uuid,
                    item_uuid: review.item_uuid,
                    author: review.author,
                    email: review.email,
                    text: review.text,
                    rate: review.rate,
                    created_at: Timestamp::UNIX_EPOCH,
                })
            });

        let res = TestClient::post(format!("http://example.com/products/{item}/reviews"))
            .json(&json!({
                "author": "Grace",
                "email": "grace@example.com",
                "text": "Solid build",
                "rate": 4,
            }))
            .send(&make_service(items))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CREATED));
    }

    #[tokio::test]
    async fn test_rate_above_five_returns_400() {
        let mut items = MockItemsService::new();

        items.expect_create_review().never();

        let res = TestClient::post(format!(
            "http://example.com/products/{}/reviews",
            Uuid::now_v7()
        ))
        .json(&json!({
            "author": "Grace",
            "email": "grace@example.com",
            "text": "Solid build",
            "rate": 6,
        }))
        .send(&make_service(items))
        .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
    }

    #[tokio::test]
    async fn test_unknown_item_returns_400() {
        let mut items = MockItemsService::new();

        items
            .expect_create_review()
            .once()
            .return_once(|_| Err(ItemsServiceError::InvalidReference));

        let res = TestClient::post(format!(
            "http://example.com/products/{}/reviews",
            Uuid::now_v7()
        ))
        .json(&json!({
            "author": "Grace",
            "email": "grace@example.com",
            "text": "Solid build",
            "rate": 3,
        }))
        .send(&make_service(items))
        .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
    }
}
