//! Storefront Domain Concerns

pub mod baskets;
pub mod categories;
pub mod customers;
pub mod delivery;
pub mod items;
pub mod orders;
pub mod pricing;
pub mod sales;
pub mod tags;
pub mod users;
