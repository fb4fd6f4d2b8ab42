//! Payment

pub(crate) mod handlers;
