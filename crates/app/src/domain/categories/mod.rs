//! Categories

pub mod errors;
pub mod models;
mod repository;
pub mod service;
mod tree;

pub use errors::CategoriesServiceError;
pub(crate) use repository::PgCategoriesRepository;
pub use service::*;
pub use tree::{build_tree, descendants};
