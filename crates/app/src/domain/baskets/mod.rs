//! Baskets
//!
//! A basket is the line items of a customer's active order.

pub mod errors;
pub mod models;
pub mod service;

pub use errors::BasketsServiceError;
pub use service::*;
