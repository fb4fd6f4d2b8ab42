//! Order status workflow.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    /// Basket in progress.
    #[default]
    #[serde(rename = "active")]
    Active,

    /// Checkout started, waiting for delivery details.
    #[serde(rename = "pending")]
    Pending,

    /// Delivery details confirmed and total computed, waiting for payment.
    #[serde(rename = "in process", alias = "payment")]
    InProcess,

    /// Paid and handed to delivery.
    #[serde(rename = "delivery")]
    Delivery,

    #[serde(rename = "archived")]
    Archived,
}

/// Every legal `(from, to)` move.
const TRANSITIONS: &[(OrderStatus, OrderStatus)] = &[
    (OrderStatus::Active, OrderStatus::Pending),
    (OrderStatus::Pending, OrderStatus::InProcess),
    (OrderStatus::InProcess, OrderStatus::InProcess),
    (OrderStatus::InProcess, OrderStatus::Delivery),
    (OrderStatus::Pending, OrderStatus::Archived),
    (OrderStatus::InProcess, OrderStatus::Archived),
    (OrderStatus::Delivery, OrderStatus::Archived),
];

#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("cannot move order from {from} to {to}")]
pub struct InvalidTransition {
    pub from: OrderStatus,
    pub to: OrderStatus,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown order status: {0}")]
pub struct UnknownOrderStatus(pub String);

impl OrderStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Pending => "pending",
            Self::InProcess => "in process",
            Self::Delivery => "delivery",
            Self::Archived => "archived",
        }
    }

    #[must_use]
    pub fn can_transition_to(self, to: Self) -> bool {
        TRANSITIONS.contains(&(self, to))
    }

    /// Validate a move to `to`.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidTransition`] when `to` is not reachable from `self`.
    pub fn transition_to(self, to: Self) -> Result<Self, InvalidTransition> {
        if self.can_transition_to(to) {
            Ok(to)
        } else {
            Err(InvalidTransition { from: self, to })
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = UnknownOrderStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "active" => Ok(Self::Active),
            "pending" => Ok(Self::Pending),
            "in process" | "payment" => Ok(Self::InProcess),
            "delivery" => Ok(Self::Delivery),
            "archived" => Ok(Self::Archived),
            other => Err(UnknownOrderStatus(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [OrderStatus; 5] = [
        OrderStatus::Active,
        OrderStatus::Pending,
        OrderStatus::InProcess,
        OrderStatus::Delivery,
        OrderStatus::Archived,
    ];

    #[test]
    fn checkout_path_is_legal() {
        assert_eq!(
            OrderStatus::Active.transition_to(OrderStatus::Pending),
            Ok(OrderStatus::Pending)
        );
        assert!(OrderStatus::Pending.can_transition_to(OrderStatus::InProcess));
        assert!(OrderStatus::InProcess.can_transition_to(OrderStatus::InProcess));
        assert!(OrderStatus::InProcess.can_transition_to(OrderStatus::Delivery));
    }

    #[test]
    fn skipping_steps_is_rejected() {
        assert_eq!(
            OrderStatus::Active.transition_to(OrderStatus::Delivery),
            Err(InvalidTransition {
                from: OrderStatus::Active,
                to: OrderStatus::Delivery,
            })
        );
        assert!(!OrderStatus::Pending.can_transition_to(OrderStatus::Delivery));
    }

    #[test]
    fn archived_is_terminal() {
        for to in ALL {
            assert!(!OrderStatus::Archived.can_transition_to(to), "archived -> {to}");
        }
    }

    #[test]
    fn nothing_returns_to_active() {
        for from in ALL {
            assert!(!from.can_transition_to(OrderStatus::Active), "{from} -> active");
        }
    }

    #[test]
    fn active_orders_cannot_be_archived() {
        assert!(!OrderStatus::Active.can_transition_to(OrderStatus::Archived));
    }

    #[test]
    fn legacy_payment_label_parses_as_in_process() {
        assert_eq!("payment".parse(), Ok(OrderStatus::InProcess));
        assert_eq!("in process".parse(), Ok(OrderStatus::InProcess));
        assert_eq!(OrderStatus::InProcess.to_string(), "in process");
    }

    #[test]
    fn labels_round_trip_through_from_str() {
        for status in ALL {
            assert_eq!(status.as_str().parse(), Ok(status));
        }
    }
}
