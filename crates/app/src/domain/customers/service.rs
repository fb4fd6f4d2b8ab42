//! Customers service.

use async_trait::async_trait;
use mockall::automock;
use tracing::debug;

use crate::{
    database::Db,
    domain::customers::{
        errors::CustomersServiceError,
        models::{CustomerIdentity, CustomerUuid},
        repository::PgCustomersRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgCustomersService {
    db: Db,
    repository: PgCustomersRepository,
}

impl PgCustomersService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgCustomersRepository::new(),
        }
    }
}

#[async_trait]
impl CustomersService for PgCustomersService {
    #[tracing::instrument(
        name = "customers.service.resolve_customer",
        skip(self, identity),
        fields(
            identity_kind = tracing::field::Empty,
            customer_uuid = tracing::field::Empty
        ),
        err
    )]
    async fn resolve_customer(
        &self,
        identity: CustomerIdentity,
    ) -> Result<CustomerUuid, CustomersServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let customer = match &identity {
            CustomerIdentity::User(user) => {
                tracing::Span::current().record("identity_kind", "user");

                self.repository
                    .resolve_user_customer(&mut tx, CustomerUuid::new(), *user)
                    .await?
            }
            CustomerIdentity::Guest(guest_key) => {
                tracing::Span::current().record("identity_kind", "guest");

                self.repository
                    .resolve_guest_customer(&mut tx, CustomerUuid::new(), guest_key)
                    .await?
            }
        };

        tx.commit().await?;

        tracing::Span::current().record("customer_uuid", tracing::field::display(customer.uuid));

        debug!(customer_uuid = %customer.uuid, "resolved customer");

        Ok(customer.uuid)
    }
}

#[automock]
#[async_trait]
pub trait CustomersService: Send + Sync {
    /// Find or create the customer owning this identity.
    async fn resolve_customer(
        &self,
        identity: CustomerIdentity,
    ) -> Result<CustomerUuid, CustomersServiceError>;
}
