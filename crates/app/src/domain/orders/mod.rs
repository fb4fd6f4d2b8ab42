//! Orders
//!
//! A customer's active order doubles as their basket; checkout moves it
//! through the [`OrderStatus`] workflow.

pub mod errors;
pub mod models;
mod repositories;
pub mod service;
pub mod status;

pub use errors::OrdersServiceError;
pub(crate) use repositories::{PgOrderLinesRepository, PgOrdersRepository};
pub use service::*;
pub use status::{InvalidTransition, OrderStatus};
