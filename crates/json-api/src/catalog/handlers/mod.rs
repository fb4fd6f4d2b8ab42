//! Catalog Handlers

pub(crate) mod banners;
pub(crate) mod index;
pub(crate) mod limited;
pub(crate) mod popular;
