//! Basket Models

use crate::domain::{
    orders::models::{OrderLine, OrderUuid},
    pricing::{self, PricedLine, PricingError},
};

/// Largest quantity a single basket line may hold.
pub const MAX_LINE_QUANTITY: u32 = 10_000;

/// The active order's lines. `order_uuid` is `None` when the customer has
/// nothing in their basket.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Basket {
    pub order_uuid: Option<OrderUuid>,
    pub lines: Vec<OrderLine>,
}

impl Basket {
    /// Sum of captured unit prices times quantity.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::Overflow`] when the sum does not fit.
    pub fn subtotal(&self) -> Result<u64, PricingError> {
        let priced: Vec<PricedLine> = self.lines.iter().map(OrderLine::priced).collect();

        pricing::subtotal(&priced)
    }

    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }
}
