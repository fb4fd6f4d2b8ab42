//! Extension traits

mod depot;
mod point_in_time;
mod result;
mod validation;

pub(crate) use depot::DepotExt as _;
pub(crate) use point_in_time::{PointInTimeExt as _, SaleDateExt as _};
pub(crate) use result::ResultExt as _;
pub(crate) use validation::ValidatedJsonExt as _;
