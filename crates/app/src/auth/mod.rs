//! Authentication
//!
//! Password sign-in and bearer session tokens.

mod errors;
pub mod models;
mod password;
mod repository;
mod service;
mod token;

pub use errors::*;
pub use password::*;
pub use service::*;
pub use token::*;
