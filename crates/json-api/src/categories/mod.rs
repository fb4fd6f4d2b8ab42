//! Categories

pub(crate) mod handlers;
