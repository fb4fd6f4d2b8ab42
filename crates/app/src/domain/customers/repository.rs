//! Customers Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};
use uuid::Uuid;

use crate::domain::{
    customers::models::{Customer, CustomerUuid, GuestKey},
    users::models::UserUuid,
};

const RESOLVE_USER_CUSTOMER_SQL: &str = include_str!("sql/resolve_user_customer.sql");
const RESOLVE_GUEST_CUSTOMER_SQL: &str = include_str!("sql/resolve_guest_customer.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCustomersRepository;

impl PgCustomersRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn resolve_user_customer(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        uuid: CustomerUuid,
        user: UserUuid,
    ) -> Result<Customer, sqlx::Error> {
        query_as::<Postgres, Customer>(RESOLVE_USER_CUSTOMER_SQL)
            .bind(uuid.into_uuid())
            .bind(user.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn resolve_guest_customer(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        uuid: CustomerUuid,
        guest_key: &GuestKey,
    ) -> Result<Customer, sqlx::Error> {
        query_as::<Postgres, Customer>(RESOLVE_GUEST_CUSTOMER_SQL)
            .bind(uuid.into_uuid())
            .bind(guest_key.as_str())
            .fetch_one(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for Customer {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: CustomerUuid::from_uuid(row.try_get("uuid")?),
            user_uuid: row
                .try_get::<Option<Uuid>, _>("user_uuid")?
                .map(UserUuid::from_uuid),
            guest_key: row.try_get("guest_key")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
        })
    }
}
