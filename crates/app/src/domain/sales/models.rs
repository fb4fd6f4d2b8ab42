//! Sale Models

use jiff::{Timestamp, civil::Date, tz::TimeZone};

use crate::{
    domain::{
        items::models::ItemUuid,
        pricing::{self, PricingError},
    },
    uuids::TypedUuid,
};

/// Sale UUID
pub type SaleUuid = TypedUuid<Sale>;

/// A discount campaign running on every day of `[date_from, date_to]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sale {
    pub uuid: SaleUuid,
    pub name: String,
    pub discount: u8,
    pub date_from: Date,
    pub date_to: Date,
    pub created_at: Timestamp,
}

impl Sale {
    #[must_use]
    pub fn is_running_on(&self, date: Date) -> bool {
        self.date_from <= date && date <= self.date_to
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSale {
    pub uuid: SaleUuid,
    pub name: String,
    pub discount: u8,
    pub date_from: Date,
    pub date_to: Date,
    pub items: Vec<ItemUuid>,
}

/// An item taking part in a running sale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaleItem {
    pub sale_uuid: SaleUuid,
    pub item_uuid: ItemUuid,
    pub title: String,
    pub price: u64,
    pub discount: u8,
    pub date_from: Date,
    pub date_to: Date,
}

impl SaleItem {
    /// Base price less the sale discount.
    ///
    /// # Errors
    ///
    /// Returns an error when the stored discount is out of range.
    pub fn sale_price(&self) -> Result<u64, PricingError> {
        pricing::discounted_price(self.price, self.discount)
    }
}

/// Calendar day used to decide which sales are running at `point_in_time`.
#[must_use]
pub fn sale_date(point_in_time: Timestamp) -> Date {
    point_in_time.to_zoned(TimeZone::UTC).date()
}
