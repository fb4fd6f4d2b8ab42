//! Depot helper extensions.

use std::any::Any;

use salvo::prelude::{Depot, StatusError};

use megano_app::domain::{customers::models::CustomerUuid, users::models::UserUuid};

const USER_UUID_KEY: &str = "megano.user_uuid";
const CUSTOMER_UUID_KEY: &str = "megano.customer_uuid";

/// Helpers for mapping depot extraction failures to HTTP errors.
pub(crate) trait DepotExt {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError>;

    fn insert_user_uuid(&mut self, user: UserUuid);

    /// The signed-in user, if the auth hoop found one.
    fn user_uuid(&self) -> Option<UserUuid>;

    fn user_uuid_or_401(&self) -> Result<UserUuid, StatusError>;

    fn insert_customer_uuid(&mut self, customer: CustomerUuid);

    /// Set by the customer hoop; missing means the route was mounted
    /// without it.
    fn customer_uuid_or_500(&self) -> Result<CustomerUuid, StatusError>;
}

impl DepotExt for Depot {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError> {
        self.obtain::<T>()
            .map_err(|_ignored| StatusError::internal_server_error())
    }

    fn insert_user_uuid(&mut self, user: UserUuid) {
        self.insert(USER_UUID_KEY, user);
    }

    fn user_uuid(&self) -> Option<UserUuid> {
        self.get::<UserUuid>(USER_UUID_KEY).ok().copied()
    }

    fn user_uuid_or_401(&self) -> Result<UserUuid, StatusError> {
        self.user_uuid()
            .ok_or_else(|| StatusError::unauthorized().brief("Sign in required"))
    }

    fn insert_customer_uuid(&mut self, customer: CustomerUuid) {
        self.insert(CUSTOMER_UUID_KEY, customer);
    }

    fn customer_uuid_or_500(&self) -> Result<CustomerUuid, StatusError> {
        self.get::<CustomerUuid>(CUSTOMER_UUID_KEY)
            .ok()
            .copied()
            .ok_or_else(StatusError::internal_server_error)
    }
}
