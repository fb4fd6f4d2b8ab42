//! Pricing
//!
//! Unit prices and order totals in minor currency units. Percentages are
//! whole numbers in `0..=100` and are rounded half away from zero.

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use thiserror::Error;
use tracing::warn;

use crate::domain::delivery::models::{DeliverySettings, DeliveryType};

/// Largest accepted discount percentage.
pub const MAX_PERCENT: u8 = 100;

#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum PricingError {
    #[error("percentage {0} is out of range")]
    PercentOutOfRange(u8),

    #[error("amount overflowed")]
    Overflow,
}

/// A priced basket line: unit sale price and quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricedLine {
    pub unit_price: u64,
    pub quantity: u32,
}

/// Computed totals for an order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OrderTotals {
    pub subtotal: u64,
    pub delivery_fee: u64,
    pub total: u64,
}

/// Calculate `percent`% of `minor` units.
///
/// # Errors
///
/// Returns [`PricingError::PercentOutOfRange`] above 100% and
/// [`PricingError::Overflow`] when the result cannot be represented.
pub fn percent_of_minor(percent: u8, minor: u64) -> Result<u64, PricingError> {
    if percent > MAX_PERCENT {
        return Err(PricingError::PercentOutOfRange(percent));
    }

    Decimal::from(minor)
        .checked_mul(Decimal::new(i64::from(percent), 2))
        .ok_or(PricingError::Overflow)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u64()
        .ok_or(PricingError::Overflow)
}

/// Price after removing `percent`% of it.
///
/// # Errors
///
/// Propagates [`percent_of_minor`] failures.
pub fn discounted_price(price: u64, percent: u8) -> Result<u64, PricingError> {
    Ok(price.saturating_sub(percent_of_minor(percent, price)?))
}

/// Unit sale price of an item: its own discount and the best running sale do
/// not stack, the larger one applies.
///
/// # Errors
///
/// Propagates [`percent_of_minor`] failures.
pub fn unit_sale_price(
    price: u64,
    item_discount: u8,
    sale_discount: Option<u8>,
) -> Result<u64, PricingError> {
    let percent = sale_discount.map_or(item_discount, |sale| sale.max(item_discount));

    discounted_price(price, percent)
}

/// Sum of `unit_price * quantity` across lines.
///
/// # Errors
///
/// Returns [`PricingError::Overflow`] if the sum does not fit in `u64`.
pub fn subtotal(lines: &[PricedLine]) -> Result<u64, PricingError> {
    lines.iter().try_fold(0_u64, |acc, line| {
        line.unit_price
            .checked_mul(u64::from(line.quantity))
            .and_then(|line_total| acc.checked_add(line_total))
            .ok_or(PricingError::Overflow)
    })
}

/// Delivery fee owed for a subtotal.
///
/// Express always pays its fee. Ordinary delivery is free once the subtotal
/// reaches the configured threshold. Without settings nothing is charged.
pub fn delivery_fee(
    subtotal: u64,
    delivery_type: DeliveryType,
    settings: Option<&DeliverySettings>,
) -> u64 {
    let Some(settings) = settings else {
        warn!(%delivery_type, "no delivery settings configured, charging no delivery fee");

        return 0;
    };

    match delivery_type {
        DeliveryType::Express => settings.fee,
        DeliveryType::Ordinary => match settings.free_threshold {
            Some(threshold) if subtotal >= threshold => 0,
            _ => settings.fee,
        },
    }
}

/// Subtotal, delivery fee and grand total for a set of lines.
///
/// # Errors
///
/// Returns [`PricingError::Overflow`] if any sum does not fit in `u64`.
pub fn order_totals(
    lines: &[PricedLine],
    delivery_type: DeliveryType,
    settings: Option<&DeliverySettings>,
) -> Result<OrderTotals, PricingError> {
    let subtotal = subtotal(lines)?;
    let delivery_fee = delivery_fee(subtotal, delivery_type, settings);

    let total = subtotal
        .checked_add(delivery_fee)
        .ok_or(PricingError::Overflow)?;

    Ok(OrderTotals {
        subtotal,
        delivery_fee,
        total,
    })
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use testresult::TestResult;

    use super::*;

    fn settings(delivery_type: DeliveryType, fee: u64, free_threshold: Option<u64>) -> DeliverySettings {
        DeliverySettings {
            delivery_type,
            fee,
            free_threshold,
            updated_at: Timestamp::UNIX_EPOCH,
        }
    }

    #[test]
    fn percent_of_minor_rounds_half_away_from_zero() -> TestResult {
        assert_eq!(percent_of_minor(10, 1000)?, 100);
        assert_eq!(percent_of_minor(15, 5)?, 1);
        assert_eq!(percent_of_minor(10, 4)?, 0);
        assert_eq!(percent_of_minor(100, 999)?, 999);

        Ok(())
    }

    #[test]
    fn percent_above_hundred_is_rejected() {
        assert_eq!(
            percent_of_minor(101, 1000),
            Err(PricingError::PercentOutOfRange(101))
        );
    }

    #[test]
    fn twenty_percent_sale_on_thousand_is_eight_hundred() -> TestResult {
        assert_eq!(discounted_price(1000, 20)?, 800);

        Ok(())
    }

    #[test]
    fn larger_of_item_and_sale_discount_applies() -> TestResult {
        assert_eq!(unit_sale_price(1000, 10, None)?, 900);
        assert_eq!(unit_sale_price(1000, 10, Some(20))?, 800);
        assert_eq!(unit_sale_price(1000, 30, Some(20))?, 700);

        Ok(())
    }

    #[test]
    fn ordinary_delivery_becomes_free_at_threshold() -> TestResult {
        let ordinary = settings(DeliveryType::Ordinary, 200, Some(2000));

        let lines = [PricedLine {
            unit_price: unit_sale_price(1000, 10, None)?,
            quantity: 2,
        }];

        let totals = order_totals(&lines, DeliveryType::Ordinary, Some(&ordinary))?;

        assert_eq!(totals.subtotal, 1800);
        assert_eq!(totals.delivery_fee, 200);
        assert_eq!(totals.total, 2000);

        let lines = [PricedLine {
            unit_price: 1000,
            quantity: 2,
        }];

        let totals = order_totals(&lines, DeliveryType::Ordinary, Some(&ordinary))?;

        assert_eq!(totals.delivery_fee, 0, "subtotal at threshold ships free");
        assert_eq!(totals.total, 2000);

        Ok(())
    }

    #[test]
    fn express_delivery_always_pays_fee() -> TestResult {
        let express = settings(DeliveryType::Express, 500, Some(10));

        let lines = [PricedLine {
            unit_price: 5000,
            quantity: 1,
        }];

        let totals = order_totals(&lines, DeliveryType::Express, Some(&express))?;

        assert_eq!(totals.delivery_fee, 500);
        assert_eq!(totals.total, 5500);

        Ok(())
    }

    #[test]
    fn missing_settings_charge_no_fee() -> TestResult {
        let lines = [PricedLine {
            unit_price: 150,
            quantity: 3,
        }];

        let totals = order_totals(&lines, DeliveryType::Ordinary, None)?;

        assert_eq!(totals, OrderTotals {
            subtotal: 450,
            delivery_fee: 0,
            total: 450,
        });

        Ok(())
    }

    #[test]
    fn subtotal_overflow_is_reported() {
        let lines = [PricedLine {
            unit_price: u64::MAX,
            quantity: 2,
        }];

        assert_eq!(subtotal(&lines), Err(PricingError::Overflow));
    }
}
