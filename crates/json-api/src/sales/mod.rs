//! Sales

pub(crate) mod handlers;
