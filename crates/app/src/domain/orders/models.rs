//! Order Models

use jiff::Timestamp;
use thiserror::Error;

use crate::{
    domain::{
        customers::models::CustomerUuid,
        delivery::models::DeliveryType,
        items::models::ItemUuid,
        orders::status::OrderStatus,
        pricing::{self, PricedLine, PricingError},
    },
    uuids::TypedUuid,
};

/// Order UUID
pub type OrderUuid = TypedUuid<Order>;

/// Payment type recorded on new orders.
pub const DEFAULT_PAYMENT_TYPE: &str = "online";

/// Longest accepted payment type label.
pub const PAYMENT_TYPE_MAX_LEN: usize = 20;

/// Order Model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub uuid: OrderUuid,
    pub customer_uuid: CustomerUuid,
    pub status: OrderStatus,
    pub delivery_type: DeliveryType,
    pub payment_type: String,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub address: Option<String>,
    pub subtotal: u64,
    pub delivery_fee: u64,
    pub total_amount: u64,
    pub lines: Vec<OrderLine>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// One item within an order.
///
/// `sale_price` is the unit price captured when the line was last priced;
/// `price`, `discount` and `sale_discount` are the item's current values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderLine {
    pub order_uuid: OrderUuid,
    pub item_uuid: ItemUuid,
    pub name: String,
    pub price: u64,
    pub discount: u8,
    pub sale_discount: Option<u8>,
    pub quantity: u32,
    pub sale_price: u64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl OrderLine {
    /// Unit price from the item's current price and discounts.
    ///
    /// # Errors
    ///
    /// Returns an error when a stored percentage is out of range.
    pub fn current_unit_price(&self) -> Result<u64, PricingError> {
        pricing::unit_sale_price(self.price, self.discount, self.sale_discount)
    }

    #[must_use]
    pub fn priced(&self) -> PricedLine {
        PricedLine {
            unit_price: self.sale_price,
            quantity: self.quantity,
        }
    }
}

/// Contact and shipping details supplied when confirming an order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryDetails {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub city: String,
    pub address: String,
    pub delivery_type: DeliveryType,
    pub payment_type: String,
}

#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum DeliveryDetailsError {
    #[error("city is required")]
    MissingCity,

    #[error("address is required")]
    MissingAddress,

    #[error("payment type must be 1 to {PAYMENT_TYPE_MAX_LEN} characters")]
    InvalidPaymentType,
}

impl DeliveryDetails {
    /// # Errors
    ///
    /// Returns the first missing or malformed field.
    pub fn validate(&self) -> Result<(), DeliveryDetailsError> {
        if self.city.trim().is_empty() {
            return Err(DeliveryDetailsError::MissingCity);
        }

        if self.address.trim().is_empty() {
            return Err(DeliveryDetailsError::MissingAddress);
        }

        let payment_type_len = self.payment_type.trim().chars().count();

        if payment_type_len == 0 || payment_type_len > PAYMENT_TYPE_MAX_LEN {
            return Err(DeliveryDetailsError::InvalidPaymentType);
        }

        Ok(())
    }
}

/// Card details submitted to pay for an order. Only validated, never stored.
#[derive(Clone, PartialEq, Eq)]
pub struct PaymentDetails {
    pub number: String,
    pub name: String,
    pub month: u8,
    pub year: u16,
    pub code: String,
}

impl std::fmt::Debug for PaymentDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaymentDetails")
            .field("name", &self.name)
            .field("month", &self.month)
            .field("year", &self.year)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum PaymentDetailsError {
    #[error("card number must be 8 to 19 digits")]
    InvalidNumber,

    #[error("card holder name is required")]
    MissingName,

    #[error("expiry month must be between 1 and 12")]
    InvalidMonth,

    #[error("expiry year must have four digits")]
    InvalidYear,

    #[error("security code must be 3 digits")]
    InvalidCode,
}

impl PaymentDetails {
    /// # Errors
    ///
    /// Returns the first malformed field.
    pub fn validate(&self) -> Result<(), PaymentDetailsError> {
        let number_len = self.number.len();

        if !(8..=19).contains(&number_len) || !self.number.bytes().all(|b| b.is_ascii_digit()) {
            return Err(PaymentDetailsError::InvalidNumber);
        }

        if self.name.trim().is_empty() {
            return Err(PaymentDetailsError::MissingName);
        }

        if !(1..=12).contains(&self.month) {
            return Err(PaymentDetailsError::InvalidMonth);
        }

        if !(1000..=9999).contains(&self.year) {
            return Err(PaymentDetailsError::InvalidYear);
        }

        if self.code.len() != 3 || !self.code.bytes().all(|b| b.is_ascii_digit()) {
            return Err(PaymentDetailsError::InvalidCode);
        }

        Ok(())
    }
}
