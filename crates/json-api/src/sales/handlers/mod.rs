//! Sale Handlers

pub(crate) mod index;
