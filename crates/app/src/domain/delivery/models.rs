//! Delivery Models

use std::{fmt, str::FromStr};

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How an order is shipped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryType {
    /// Standard shipping, free above the configured threshold.
    #[default]
    #[serde(alias = "standard")]
    Ordinary,

    /// Express shipping, always charged.
    Express,
}

impl DeliveryType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ordinary => "ordinary",
            Self::Express => "express",
        }
    }
}

impl fmt::Display for DeliveryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown delivery type: {0}")]
pub struct UnknownDeliveryType(pub String);

impl FromStr for DeliveryType {
    type Err = UnknownDeliveryType;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "ordinary" | "standard" => Ok(Self::Ordinary),
            "express" => Ok(Self::Express),
            other => Err(UnknownDeliveryType(other.to_string())),
        }
    }
}

/// Fee table row for one delivery type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliverySettings {
    pub delivery_type: DeliveryType,
    pub fee: u64,
    pub free_threshold: Option<u64>,
    pub updated_at: Timestamp,
}

/// Replacement values for a delivery type's settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliverySettingsUpdate {
    pub delivery_type: DeliveryType,
    pub fee: u64,
    pub free_threshold: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_is_accepted_as_ordinary() {
        assert_eq!("standard".parse(), Ok(DeliveryType::Ordinary));
        assert_eq!("ordinary".parse(), Ok(DeliveryType::Ordinary));
        assert_eq!("express".parse(), Ok(DeliveryType::Express));
    }

    #[test]
    fn unknown_delivery_type_is_rejected() {
        assert_eq!(
            "drone".parse::<DeliveryType>(),
            Err(UnknownDeliveryType("drone".to_string()))
        );
    }

    #[test]
    fn deserializes_legacy_label() -> serde_json::Result<()> {
        let parsed: DeliveryType = serde_json::from_str("\"standard\"")?;

        assert_eq!(parsed, DeliveryType::Ordinary);

        Ok(())
    }
}
