//! Payment Handlers

pub(crate) mod pay;
