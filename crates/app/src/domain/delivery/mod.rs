//! Delivery Settings

pub mod errors;
pub mod models;
mod repository;
pub mod service;

pub use errors::DeliveryServiceError;
pub(crate) use repository::PgDeliveryRepository;
pub use service::*;
