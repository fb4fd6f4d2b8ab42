//! Users
//!
//! Registered shopper accounts and their profile data.

pub mod errors;
pub mod models;
mod repository;
pub mod service;

pub use errors::UsersServiceError;
pub(crate) use repository::PgUsersRepository;
pub use service::*;
