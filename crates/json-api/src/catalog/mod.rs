//! Catalog

use salvo::{oapi::ToSchema, prelude::StatusError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use megano_app::domain::items::models::{Item, ItemImage};

use crate::extensions::*;

pub(crate) mod handlers;

/// Catalog card for an item
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ItemResponse {
    pub id: Uuid,
    pub category: Option<Uuid>,

    /// Base price in minor units
    pub price: u64,

    /// Price after the larger of the item and sale discount
    pub sale_price: u64,
    pub count: u32,

    /// Creation time, RFC 3339
    pub date: String,
    pub title: String,

    /// First characters of the description
    pub description: String,
    pub free_delivery: bool,
    pub available: bool,
    pub tags: Vec<String>,

    /// Pictures in display order
    pub images: Vec<ImageResponse>,

    /// Number of reviews
    pub reviews: u32,

    /// Average review rate, one decimal place
    pub rating: String,

    /// `"4.5 / 5"`, or `"0"` without reviews
    pub rating_label: String,
}

impl TryFrom<Item> for ItemResponse {
    type Error = StatusError;

    fn try_from(item: Item) -> Result<Self, Self::Error> {
        let sale_price = item.sale_price().or_500("failed to price item")?;

        Ok(Self {
            id: item.uuid.into(),
            category: item.category_uuid.map(Into::into),
            price: item.price,
            sale_price,
            count: item.count,
            date: item.created_at.to_string(),
            description: item.short_description(),
            rating: item.rating().to_string(),
            rating_label: item.rating_label(),
            title: item.name,
            free_delivery: item.free_delivery,
            available: item.available,
            tags: item.tags,
            images: item.images.into_iter().map(Into::into).collect(),
            reviews: item.feedback_count,
        })
    }
}

/// Item picture
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ImageResponse {
    pub src: String,
    pub alt: String,
}

impl From<ItemImage> for ImageResponse {
    fn from(image: ItemImage) -> Self {
        Self {
            src: image.src,
            alt: image.description,
        }
    }
}

pub(crate) fn item_responses(items: Vec<Item>) -> Result<Vec<ItemResponse>, StatusError> {
    items.into_iter().map(ItemResponse::try_from).collect()
}

#[cfg(test)]
mod tests {
    use megano_app::domain::items::models::ItemUuid;
    use testresult::TestResult;

    use crate::test_helpers::make_item;

    use super::*;

    #[test]
    fn sale_discount_shows_in_sale_price() -> TestResult {
        let mut item = make_item(ItemUuid::new(), 1000);

        item.discount = 10;
        item.sale_discount = Some(20);

        let response = ItemResponse::try_from(item)?;

        assert_eq!(response.price, 1000);
        assert_eq!(response.sale_price, 800);
        assert_eq!(response.rating, "4.5");
        assert_eq!(response.rating_label, "4.5 / 5");

        Ok(())
    }

    #[test]
    fn images_keep_their_order() -> TestResult {
        let mut item = make_item(ItemUuid::new(), 1000);

        item.images = vec![
            ItemImage {
                src: "/media/front.png".to_string(),
                description: "Front".to_string(),
            },
            ItemImage {
                src: "/media/back.png".to_string(),
                description: String::new(),
            },
        ];

        let response = ItemResponse::try_from(item)?;
        let srcs: Vec<&str> = response.images.iter().map(|image| image.src.as_str()).collect();

        assert_eq!(srcs, vec!["/media/front.png", "/media/back.png"]);
        assert_eq!(response.images.first().map(|image| image.alt.as_str()), Some("Front"));

        Ok(())
    }
}
