//! Item Models

use jiff::Timestamp;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::{
    domain::{
        categories::models::CategoryUuid,
        pricing::{self, PricingError},
        tags::Taggable,
    },
    uuids::TypedUuid,
};

/// Item UUID
pub type ItemUuid = TypedUuid<Item>;

/// Review UUID
pub type ReviewUuid = TypedUuid<Review>;

/// Characters kept by [`Item::short_description`].
pub const SHORT_DESCRIPTION_LEN: usize = 50;

/// Highest review rate.
pub const MAX_RATE: u8 = 5;

/// Longest image caption.
pub const MAX_IMAGE_DESCRIPTION_LEN: usize = 100;

/// Longest specification name or value.
pub const MAX_SPECIFICATION_LEN: usize = 50;

/// Item Model
///
/// Carries the review aggregates and the best sale discount running at the
/// point in time the item was read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub uuid: ItemUuid,
    pub category_uuid: Option<CategoryUuid>,
    pub name: String,
    pub description: String,
    pub price: u64,
    pub count: u32,
    pub discount: u8,
    pub available: bool,
    pub free_delivery: bool,
    pub archived: bool,
    pub rating_sum: u64,
    pub feedback_count: u32,
    pub sale_discount: Option<u8>,
    pub tags: Vec<String>,
    pub images: Vec<ItemImage>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Item {
    /// Mean review rate to one decimal place, zero without reviews.
    #[must_use]
    pub fn rating(&self) -> Decimal {
        average_rating(self.rating_sum, self.feedback_count)
    }

    /// `"4.5 / 5"`, or `"0"` when nobody has reviewed the item.
    #[must_use]
    pub fn rating_label(&self) -> String {
        if self.feedback_count == 0 {
            return "0".to_string();
        }

        format!("{} / {MAX_RATE}", self.rating().normalize())
    }

    #[must_use]
    pub fn short_description(&self) -> String {
        truncate_description(&self.description)
    }

    /// Unit price after the larger of the item and sale discounts.
    ///
    /// # Errors
    ///
    /// Returns an error when a stored percentage is out of range.
    pub fn sale_price(&self) -> Result<u64, PricingError> {
        pricing::unit_sale_price(self.price, self.discount, self.sale_discount)
    }
}

impl Taggable for Item {
    const KIND: &'static str = "item";
}

/// Item picture, in display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemImage {
    pub src: String,
    pub description: String,
}

/// Name/value pair shown in the item's specification table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Specification {
    pub name: String,
    pub value: String,
}

/// Item with its specifications and its reviews, newest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemDetail {
    pub item: Item,
    pub specifications: Vec<Specification>,
    pub reviews: Vec<Review>,
}

/// New Item Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewItem {
    pub uuid: ItemUuid,
    pub category_uuid: Option<CategoryUuid>,
    pub name: String,
    pub description: String,
    pub price: u64,
    pub count: u32,
    pub discount: u8,
    pub available: bool,
    pub free_delivery: bool,
    pub tags: Vec<String>,
    pub images: Vec<ItemImage>,
    pub specifications: Vec<Specification>,
}

impl NewItem {
    /// Whether every image caption and specification fits its column.
    #[must_use]
    pub fn has_valid_attachments(&self) -> bool {
        let fits = |text: &str, max: usize| text.chars().count() <= max;

        self.images
            .iter()
            .all(|image| !image.src.is_empty() && fits(&image.description, MAX_IMAGE_DESCRIPTION_LEN))
            && self.specifications.iter().all(|spec| {
                !spec.name.is_empty()
                    && !spec.value.is_empty()
                    && fits(&spec.name, MAX_SPECIFICATION_LEN)
                    && fits(&spec.value, MAX_SPECIFICATION_LEN)
            })
    }
}

/// Review Model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Review {
    pub uuid: ReviewUuid,
    pub item_uuid: ItemUuid,
    pub author: String,
    pub email: String,
    pub text: String,
    pub rate: u8,
    pub created_at: Timestamp,
}

/// New Review Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReview {
    pub uuid: ReviewUuid,
    pub item_uuid: ItemUuid,
    pub author: String,
    pub email: String,
    pub text: String,
    pub rate: u8,
}

#[must_use]
pub fn average_rating(rating_sum: u64, feedback_count: u32) -> Decimal {
    if feedback_count == 0 {
        return Decimal::ZERO;
    }

    (Decimal::from(rating_sum) / Decimal::from(feedback_count))
        .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
}

/// Descriptions of [`SHORT_DESCRIPTION_LEN`] characters or more are cut to
/// that length and marked with `...`.
fn truncate_description(description: &str) -> String {
    if description.chars().count() < SHORT_DESCRIPTION_LEN {
        return description.to_string();
    }

    let kept: String = description.chars().take(SHORT_DESCRIPTION_LEN).collect();

    format!("{kept}...")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(description: &str, rating_sum: u64, feedback_count: u32) -> Item {
        Item {
            uuid: ItemUuid::new(),
            category_uuid: None,
            name: "Lamp".to_string(),
            description: description.to_string(),
            price: 1000,
            count: 3,
            discount: 10,
            available: true,
            free_delivery: false,
            archived: false,
            rating_sum,
            feedback_count,
            sale_discount: None,
            tags: Vec::new(),
            images: Vec::new(),
            created_at: Timestamp::UNIX_EPOCH,
            updated_at: Timestamp::UNIX_EPOCH,
        }
    }

    #[test]
    fn rating_label_without_reviews_is_zero() {
        assert_eq!(item("", 0, 0).rating_label(), "0");
    }

    #[test]
    fn rating_label_drops_trailing_zero() {
        assert_eq!(item("", 8, 2).rating_label(), "4 / 5");
        assert_eq!(item("", 9, 2).rating_label(), "4.5 / 5");
    }

    #[test]
    fn rating_rounds_to_one_place() {
        assert_eq!(average_rating(10, 3), Decimal::new(33, 1));
    }

    #[test]
    fn short_description_truncates_long_text() {
        let long = "x".repeat(60);

        assert_eq!(item(&long, 0, 0).short_description(), format!("{}...", "x".repeat(50)));
        assert_eq!(item("short", 0, 0).short_description(), "short");
    }

    #[test]
    fn short_description_marks_text_at_exactly_the_limit() {
        let exact = "x".repeat(SHORT_DESCRIPTION_LEN);
        let under = "x".repeat(SHORT_DESCRIPTION_LEN - 1);

        assert_eq!(item(&exact, 0, 0).short_description(), format!("{exact}..."));
        assert_eq!(item(&under, 0, 0).short_description(), under);
    }

    #[test]
    fn short_description_counts_characters_not_bytes() {
        let text = "ж".repeat(51);

        assert_eq!(item(&text, 0, 0).short_description(), format!("{}...", "ж".repeat(50)));
    }

    fn new_item(images: Vec<ItemImage>, specifications: Vec<Specification>) -> NewItem {
        NewItem {
            uuid: ItemUuid::new(),
            category_uuid: None,
            name: "Lamp".to_string(),
            description: String::new(),
            price: 1000,
            count: 1,
            discount: 0,
            available: true,
            free_delivery: false,
            tags: Vec::new(),
            images,
            specifications,
        }
    }

    fn spec(name: &str, value: &str) -> Specification {
        Specification {
            name: name.to_string(),
            value: value.to_string(),
        }
    }

    #[test]
    fn attachments_within_limits_are_valid() {
        let image = ItemImage {
            src: "/media/lamp.png".to_string(),
            description: "x".repeat(MAX_IMAGE_DESCRIPTION_LEN),
        };

        assert!(new_item(vec![image], vec![spec("Colour", "Brass")]).has_valid_attachments());
        assert!(new_item(Vec::new(), Vec::new()).has_valid_attachments());
    }

    #[test]
    fn oversized_attachments_are_invalid() {
        let image = ItemImage {
            src: "/media/lamp.png".to_string(),
            description: "x".repeat(MAX_IMAGE_DESCRIPTION_LEN + 1),
        };
        let long = "x".repeat(MAX_SPECIFICATION_LEN + 1);

        assert!(!new_item(vec![image], Vec::new()).has_valid_attachments());
        assert!(!new_item(Vec::new(), vec![spec(&long, "Brass")]).has_valid_attachments());
        assert!(!new_item(Vec::new(), vec![spec("Colour", "")]).has_valid_attachments());
    }

    #[test]
    fn sale_price_prefers_larger_discount() -> Result<(), PricingError> {
        let mut lamp = item("", 0, 0);

        assert_eq!(lamp.sale_price()?, 900);

        lamp.sale_discount = Some(20);

        assert_eq!(lamp.sale_price()?, 800);

        Ok(())
    }
}
