//! Sales

pub mod errors;
pub mod models;
mod repository;
pub mod service;

pub use errors::SalesServiceError;
pub(crate) use repository::PgSalesRepository;
pub use service::*;
