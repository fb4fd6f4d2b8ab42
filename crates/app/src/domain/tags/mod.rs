//! Tags

pub mod errors;
pub mod records;
mod repository;
pub mod service;
mod taggable;

pub use errors::TagsServiceError;
pub(crate) use repository::PgTagsRepository;
pub use service::*;
pub(crate) use taggable::Taggable;
