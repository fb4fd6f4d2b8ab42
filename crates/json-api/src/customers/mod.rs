//! Customer resolution

pub(crate) mod middleware;
