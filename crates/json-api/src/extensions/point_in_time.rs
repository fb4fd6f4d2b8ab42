//! Point-in-time query parsing helpers.

use jiff::{Timestamp, civil::Date};
use salvo::{oapi::extract::QueryParam, prelude::StatusError};

use megano_app::domain::sales::models::sale_date;

use crate::extensions::*;

pub(crate) trait PointInTimeExt {
    fn into_point_in_time(self) -> Result<Timestamp, StatusError>;
}

impl PointInTimeExt for QueryParam<String, false> {
    fn into_point_in_time(self) -> Result<Timestamp, StatusError> {
        self.into_inner()
            .map(|value| value.parse::<Timestamp>())
            .transpose()
            .or_400("could not parse \"at\" query parameter")
            .map(|point_in_time| point_in_time.unwrap_or_else(Timestamp::now))
    }
}

/// Reads a `YYYY-MM-DD` day, defaulting to today in UTC.
pub(crate) trait SaleDateExt {
    fn into_sale_date(self) -> Result<Date, StatusError>;
}

impl SaleDateExt for QueryParam<String, false> {
    fn into_sale_date(self) -> Result<Date, StatusError> {
        self.into_inner()
            .map(|value| value.parse::<Date>())
            .transpose()
            .or_400("could not parse \"at\" query parameter as a date")
            .map(|date| date.unwrap_or_else(|| sale_date(Timestamp::now())))
    }
}
