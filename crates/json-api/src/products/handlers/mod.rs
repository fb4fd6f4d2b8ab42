//! Product Handlers

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use megano_app::domain::items::models::Review;

pub(crate) mod get;
pub(crate) mod reviews;

/// Product review
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ReviewResponse {
    pub id: Uuid,
    pub item: Uuid,
    pub author: String,
    pub email: String,
    pub text: String,
    pub rate: u8,

    /// Day the review was left, `DD-MM-YYYY`
    pub date: String,
}

impl From<Review> for ReviewResponse {
    fn from(review: Review) -> Self {
        Self {
            id: review.uuid.into(),
            item: review.item_uuid.into(),
            date: review.created_at.strftime("%d-%m-%Y").to_string(),
            author: review.author,
            email: review.email,
            text: review.text,
            rate: review.rate,
        }
    }
}
