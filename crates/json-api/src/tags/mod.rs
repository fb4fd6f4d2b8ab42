//! Tags

pub(crate) mod handlers;
