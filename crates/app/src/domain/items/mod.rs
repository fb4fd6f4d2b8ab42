//! Items
//!
//! The product catalog: item records, their reviews, and catalog queries.

pub mod errors;
pub mod models;
pub mod query;
mod repository;
pub mod service;

pub use errors::ItemsServiceError;
pub(crate) use repository::PgItemsRepository;
pub use service::*;
