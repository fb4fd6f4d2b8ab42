//! Delivery Settings Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};

use crate::{
    database::{amount_to_i64, try_get_amount, try_get_optional_amount},
    domain::delivery::models::{DeliverySettings, DeliverySettingsUpdate, DeliveryType},
};

const GET_SETTINGS_SQL: &str = include_str!("sql/get_settings.sql");
const UPSERT_SETTINGS_SQL: &str = include_str!("sql/upsert_settings.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgDeliveryRepository;

impl PgDeliveryRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn get_settings(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        delivery_type: DeliveryType,
    ) -> Result<Option<DeliverySettings>, sqlx::Error> {
        query_as::<Postgres, DeliverySettings>(GET_SETTINGS_SQL)
            .bind(delivery_type.as_str())
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn upsert_settings(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        update: &DeliverySettingsUpdate,
    ) -> Result<DeliverySettings, sqlx::Error> {
        query_as::<Postgres, DeliverySettings>(UPSERT_SETTINGS_SQL)
            .bind(update.delivery_type.as_str())
            .bind(amount_to_i64(update.fee)?)
            .bind(update.free_threshold.map(amount_to_i64).transpose()?)
            .fetch_one(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for DeliverySettings {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let delivery_type: String = row.try_get("delivery_type")?;

        Ok(Self {
            delivery_type: delivery_type
                .parse()
                .map_err(|e| sqlx::Error::ColumnDecode {
                    index: "delivery_type".to_string(),
                    source: Box::new(e),
                })?,
            fee: try_get_amount(row, "fee")?,
            free_threshold: try_get_optional_amount(row, "free_threshold")?,
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
