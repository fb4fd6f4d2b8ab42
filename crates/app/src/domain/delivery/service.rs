//! Delivery settings service.

use async_trait::async_trait;
use mockall::automock;
use tracing::info;

use crate::{
    database::Db,
    domain::delivery::{
        PgDeliveryRepository,
        errors::DeliveryServiceError,
        models::{DeliverySettings, DeliverySettingsUpdate, DeliveryType},
    },
};

#[derive(Debug, Clone)]
pub struct PgDeliveryService {
    db: Db,
    repository: PgDeliveryRepository,
}

impl PgDeliveryService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgDeliveryRepository::new(),
        }
    }
}

#[async_trait]
impl DeliveryService for PgDeliveryService {
    async fn get_settings(
        &self,
        delivery_type: DeliveryType,
    ) -> Result<Option<DeliverySettings>, DeliveryServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let settings = self.repository.get_settings(&mut tx, delivery_type).await?;

        tx.commit().await?;

        Ok(settings)
    }

    #[tracing::instrument(
        name = "delivery.service.upsert_settings",
        skip(self, update),
        fields(delivery_type = %update.delivery_type),
        err
    )]
    async fn upsert_settings(
        &self,
        update: DeliverySettingsUpdate,
    ) -> Result<DeliverySettings, DeliveryServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let settings = self.repository.upsert_settings(&mut tx, &update).await?;

        tx.commit().await?;

        info!(
            fee = settings.fee,
            free_threshold = ?settings.free_threshold,
            "updated delivery settings"
        );

        Ok(settings)
    }
}

#[automock]
#[async_trait]
pub trait DeliveryService: Send + Sync {
    /// Fee table row for a delivery type, when one is configured.
    async fn get_settings(
        &self,
        delivery_type: DeliveryType,
    ) -> Result<Option<DeliverySettings>, DeliveryServiceError>;

    /// Create or replace the fee table row for a delivery type.
    async fn upsert_settings(
        &self,
        update: DeliverySettingsUpdate,
    ) -> Result<DeliverySettings, DeliveryServiceError>;
}
