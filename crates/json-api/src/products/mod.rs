//! Product Pages

pub(crate) mod handlers;
