//! Customers
//!
//! A customer is the identity that owns orders: either a registered user or
//! an anonymous guest key.

pub mod errors;
pub mod models;
mod repository;
pub mod service;

pub use errors::CustomersServiceError;
pub use service::*;
